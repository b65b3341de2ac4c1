//! Monitor state carried between cycles and its phase classification.

use serde::{Deserialize, Serialize};

/// Default number of consecutive failed checks before the operator is asked.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// State carried from one monitoring cycle to the next.
///
/// Each cycle consumes a snapshot and returns a fresh value; there is no
/// in-place mutation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonitorState {
    /// Consecutive failed checks since the last success or recovery attempt.
    pub failure_count: u32,
    /// The operator has already been asked during the current outage episode.
    pub prompt_shown: bool,
}

impl MonitorState {
    /// Initial state at process start.
    #[must_use]
    pub const fn healthy() -> Self {
        Self {
            failure_count: 0,
            prompt_shown: false,
        }
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.failure_count == 0 && !self.prompt_shown
    }

    /// Classify this state against `threshold` (clamped to at least 1).
    #[must_use]
    pub fn phase(&self, threshold: u32) -> Phase {
        let threshold = threshold.max(1);
        match (self.prompt_shown, self.failure_count) {
            (false, 0) => Phase::Healthy,
            (false, _) => Phase::Degrading,
            (true, n) if n >= threshold => Phase::PromptedDeclined,
            (true, _) => Phase::PromptedAccepted,
        }
    }
}

/// Coarse phase of the monitor, derived from [`MonitorState`].
///
/// The "awaiting response" step only exists inside the cycle that crosses the
/// threshold and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Last check succeeded.
    Healthy,
    /// Failing, below threshold, not yet prompted.
    Degrading,
    /// Prompt spent and recovery attempted; also covers failures that follow
    /// an accepted recovery before the next success.
    PromptedAccepted,
    /// Prompt spent and declined; failures keep accumulating silently.
    PromptedDeclined,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Healthy => "healthy",
            Phase::Degrading => "degrading",
            Phase::PromptedAccepted => "prompted-accepted",
            Phase::PromptedDeclined => "prompted-declined",
        };
        f.write_str(s)
    }
}
