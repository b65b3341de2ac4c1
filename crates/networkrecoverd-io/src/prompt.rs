//! Operator confirmation dialog.
//!
//! Uses `zenity --question` on Linux and an `osascript` dialog on macOS.
//! Exit status 0 means the operator accepted; any other status is a decline.

use std::process::{Command, Stdio};

use crate::error::PromptError;

pub const DEFAULT_TITLE: &str = "Internet connection lost";
pub const DEFAULT_TEXT: &str = "Run recovery script?";

/// Asks a yes/no question and blocks until answered. Enables fake injection.
pub trait Confirmer: Send + Sync {
    /// `Ok(true)` if accepted, `Ok(false)` if declined, `Err` if the dialog
    /// could not be shown at all.
    fn confirm(&self) -> Result<bool, PromptError>;
}

impl<T: Confirmer + ?Sized> Confirmer for &T {
    fn confirm(&self) -> Result<bool, PromptError> {
        (**self).confirm()
    }
}

/// Which desktop dialog tool to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogBackend {
    Zenity,
    Osascript,
}

impl DialogBackend {
    /// Backend for the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(target_os = "macos") {
            Self::Osascript
        } else {
            Self::Zenity
        }
    }
}

/// Real confirmation dialog backed by a desktop dialog tool.
#[derive(Debug, Clone)]
pub struct DialogConfirmer {
    backend: DialogBackend,
    program: Option<String>,
    title: String,
    text: String,
}

impl DialogConfirmer {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            backend: DialogBackend::native(),
            program: None,
            title: title.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: DialogBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Use a specific executable (e.g. an absolute path) instead of looking
    /// the backend's tool up on `PATH`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    fn program(&self) -> &str {
        match (&self.program, self.backend) {
            (Some(program), _) => program,
            (None, DialogBackend::Zenity) => "zenity",
            (None, DialogBackend::Osascript) => "osascript",
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        match self.backend {
            DialogBackend::Zenity => {
                cmd.arg("--question")
                    .arg(format!("--title={}", self.title))
                    .arg(format!("--text={}", self.text));
            }
            DialogBackend::Osascript => {
                let script = format!(
                    r#"display dialog "{}" with title "{}" buttons {{"No", "Yes"}} default button "Yes" cancel button "No""#,
                    escape_applescript(&self.text),
                    escape_applescript(&self.title),
                );
                cmd.arg("-e").arg(script);
            }
        }
        cmd
    }
}

impl Default for DialogConfirmer {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_TEXT)
    }
}

impl Confirmer for DialogConfirmer {
    fn confirm(&self) -> Result<bool, PromptError> {
        let status = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| PromptError::Launch {
                program: self.program().to_string(),
                source,
            })?;
        Ok(status.success())
    }
}

fn escape_applescript(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}
