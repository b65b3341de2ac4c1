//! Recovery script runner.
//!
//! Runs an external program with a hard timeout, draining stdout/stderr
//! concurrently so a chatty script cannot block on a full pipe. The result is
//! informational only: the caller logs it and carries on.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

use crate::error::RecoveryError;

/// Default upper bound on a single recovery run.
pub const DEFAULT_RECOVERY_TIMEOUT: Duration = Duration::from_secs(60);

/// Grace period for the reader threads after the child has exited.
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-stream cap on captured output; the rest is drained and discarded.
const MAX_OUTPUT_BYTES: usize = 64 * 1024;

/// Performs a recovery attempt. Enables fake injection.
pub trait RecoveryAction: Send + Sync {
    fn run(&self) -> Result<RecoveryReport, RecoveryError>;
}

impl<T: RecoveryAction + ?Sized> RecoveryAction for &T {
    fn run(&self) -> Result<RecoveryReport, RecoveryError> {
        (**self).run()
    }
}

/// Captured result of one recovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryReport {
    /// `None` when the process was killed (timeout or signal).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    pub duration: Duration,
}

impl RecoveryReport {
    #[must_use]
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Runs a script (or any executable) directly, without a shell.
#[derive(Debug, Clone)]
pub struct ScriptRecovery {
    path: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ScriptRecovery {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            timeout: DEFAULT_RECOVERY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl RecoveryAction for ScriptRecovery {
    fn run(&self) -> Result<RecoveryReport, RecoveryError> {
        let start = Instant::now();

        let mut child = Command::new(&self.path)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RecoveryError::Launch {
                path: self.path.clone(),
                source,
            })?;

        // Readers must run while we wait, or the child can block on a full pipe.
        let stdout_rx = spawn_reader(child.stdout.take());
        let stderr_rx = spawn_reader(child.stderr.take());

        let (exit_code, timed_out) = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => (status.code(), false),
            Ok(None) => {
                kill_child(&mut child);
                (None, true)
            }
            Err(e) => {
                kill_child(&mut child);
                return Err(RecoveryError::Wait(e));
            }
        };

        let stdout = collect(stdout_rx);
        let stderr = collect(stderr_rx);

        Ok(RecoveryReport {
            exit_code,
            stdout,
            stderr,
            timed_out,
            duration: start.elapsed(),
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(stream) => {
            thread::spawn(move || {
                let _ = tx.send(read_capped(stream));
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

fn read_capped<R: Read>(mut stream: R) -> String {
    let mut captured = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let room = MAX_OUTPUT_BYTES.saturating_sub(captured.len());
                captured.extend_from_slice(&buf[..n.min(room)]);
            }
        }
    }
    String::from_utf8_lossy(&captured).into_owned()
}

fn collect(rx: mpsc::Receiver<String>) -> String {
    rx.recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_else(|_| "[output collection timed out]".to_string())
}

fn kill_child(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!("failed to kill recovery script: {e}");
    }
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> ScriptRecovery {
        ScriptRecovery::new("sh").with_args(["-c", script])
    }

    #[test]
    fn defaults() {
        let recovery = ScriptRecovery::new("recovery-scripts/dummy.sh");
        assert_eq!(recovery.path(), Path::new("recovery-scripts/dummy.sh"));
        assert_eq!(recovery.timeout(), DEFAULT_RECOVERY_TIMEOUT);
    }

    #[cfg(unix)]
    #[test]
    fn successful_script_captures_stdout() {
        let report = sh("echo restarting network").run().expect("runs");
        assert!(report.success());
        assert_eq!(report.exit_code, Some(0));
        assert_eq!(report.stdout.trim(), "restarting network");
        assert!(report.stderr.is_empty());
        assert!(!report.timed_out);
    }

    #[cfg(unix)]
    #[test]
    fn failing_script_reports_exit_code_and_stderr() {
        let report = sh("echo partial; echo 'nmcli: not found' >&2; exit 3")
            .run()
            .expect("runs");
        assert!(!report.success());
        assert_eq!(report.exit_code, Some(3));
        assert_eq!(report.stdout.trim(), "partial");
        assert_eq!(report.stderr.trim(), "nmcli: not found");
    }

    #[cfg(unix)]
    #[test]
    fn hung_script_is_killed_after_timeout() {
        let report = ScriptRecovery::new("sleep")
            .with_args(["30"])
            .with_timeout(Duration::from_millis(200))
            .run()
            .expect("runs");
        assert!(report.timed_out);
        assert!(!report.success());
        assert_eq!(report.exit_code, None);
        assert!(report.duration < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn large_output_is_capped() {
        let report = sh("head -c 200000 /dev/zero | tr '\\0' 'x'")
            .run()
            .expect("runs");
        assert!(report.success());
        assert_eq!(report.stdout.len(), MAX_OUTPUT_BYTES);
    }

    #[test]
    fn missing_script_is_launch_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.sh");
        let err = ScriptRecovery::new(&missing).run().expect_err("must fail");
        assert!(matches!(err, RecoveryError::Launch { .. }));
        assert!(err.to_string().contains("absent.sh"));
    }

    #[test]
    fn blanket_ref_impl() {
        struct Noop;
        impl RecoveryAction for Noop {
            fn run(&self) -> Result<RecoveryReport, RecoveryError> {
                Ok(RecoveryReport {
                    exit_code: Some(0),
                    stdout: String::new(),
                    stderr: String::new(),
                    timed_out: false,
                    duration: Duration::ZERO,
                })
            }
        }
        let noop = Noop;
        let r: &Noop = &noop;
        assert!(r.run().expect("ok").success());
    }
}
