//! CLI definition using clap derive. Every option can also come from the
//! environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use networkrecoverd_core::DEFAULT_FAILURE_THRESHOLD;

use crate::config::MonitorConfig;

#[derive(Parser, Debug)]
#[command(
    name = "networkrecoverd",
    version,
    about = "Internet connectivity watchdog with operator-confirmed recovery"
)]
pub struct Cli {
    /// Run a single connectivity check, print the resulting state as JSON and exit
    #[arg(long)]
    pub once: bool,

    /// Host used for the reachability probe
    #[arg(long, env = "NETWORKRECOVERD_HOST", default_value = "8.8.8.8")]
    pub host: String,

    /// TCP port used for the reachability probe
    #[arg(
        long,
        env = "NETWORKRECOVERD_PORT",
        default_value_t = 53,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// Probe connect timeout in seconds
    #[arg(long, env = "NETWORKRECOVERD_TIMEOUT", default_value = "3", value_parser = parse_secs)]
    pub timeout: Duration,

    /// Delay between checks in seconds
    #[arg(long, env = "NETWORKRECOVERD_INTERVAL", default_value = "10", value_parser = parse_secs)]
    pub interval: Duration,

    /// Consecutive failed checks before asking the operator
    #[arg(
        long,
        env = "NETWORKRECOVERD_THRESHOLD",
        default_value_t = DEFAULT_FAILURE_THRESHOLD,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub threshold: u32,

    /// Executable run when the operator accepts recovery
    #[arg(
        long,
        env = "NETWORKRECOVERD_RECOVERY_SCRIPT",
        default_value = "recovery-scripts/dummy.sh"
    )]
    pub recovery_script: PathBuf,

    /// Upper bound on a recovery run in seconds; the script is killed after it
    #[arg(
        long,
        env = "NETWORKRECOVERD_RECOVERY_TIMEOUT",
        default_value = "60",
        value_parser = parse_secs
    )]
    pub recovery_timeout: Duration,

    /// Dialog executable to use instead of zenity/osascript from PATH
    #[arg(long, env = "NETWORKRECOVERD_DIALOG")]
    pub dialog: Option<String>,
}

impl Cli {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            host: self.host.clone(),
            port: self.port,
            probe_timeout: self.timeout,
            interval: self.interval,
            threshold: self.threshold,
        }
    }
}

/// Load `.env` from the working directory (or the nearest parent that has
/// one) into the process environment, so `env =` options pick it up.
/// Variables already set in the environment win. Returns the file loaded.
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Same as [`load_env_file`] for an explicit file.
pub fn load_env_file_from(path: &Path) -> Option<PathBuf> {
    dotenvy::from_path(path).ok().map(|()| path.to_path_buf())
}

/// Parse a positive, finite number of seconds (fractions allowed).
fn parse_secs(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("`{value}` is not a number of seconds: {e}"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("`{value}` must be a positive number of seconds"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("`{value}`: {e}"))
}
