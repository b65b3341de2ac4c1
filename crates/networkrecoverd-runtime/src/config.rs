//! Resolved monitor settings used by the driver loop.

use std::time::Duration;

use networkrecoverd_core::DEFAULT_FAILURE_THRESHOLD;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Probe target host (name or IP literal).
    pub host: String,
    pub port: u16,
    /// Connect timeout for a single probe.
    pub probe_timeout: Duration,
    /// Sleep between the end of one cycle and the start of the next.
    pub interval: Duration,
    /// Consecutive failures before the operator is asked.
    pub threshold: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: "8.8.8.8".to_string(),
            port: 53,
            probe_timeout: Duration::from_secs(3),
            interval: Duration::from_secs(10),
            threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}
