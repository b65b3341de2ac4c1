//! Debounce/escalation state machine.
//!
//! One call per monitoring cycle:
//!
//! - **Online**: reset to `{0, false}` unconditionally.
//! - **Offline**: increment the failure counter by one. When the counter first
//!   reaches the threshold and the operator has not been asked yet, ask once.
//!   Accepted: run recovery once and reset the counter (the prompt stays
//!   marked as shown). Declined: keep counting, never ask again until the next
//!   online observation.
//!
//! The confirmation and recovery capabilities are the only side effects.

use serde::{Deserialize, Serialize};

use crate::state::MonitorState;

/// What a single cycle did, for logging by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Online, and the previous state was already healthy.
    StillHealthy,
    /// Online after failures or a prompt; state reset.
    Recovered,
    /// Offline, below threshold.
    Degrading,
    /// Threshold reached, operator accepted, recovery invoked.
    RecoveryAttempted,
    /// Threshold reached, operator declined.
    RecoveryDeclined,
    /// Offline with the prompt already spent for this episode.
    Suppressed,
}

/// Result of [`transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: MonitorState,
    pub outcome: Outcome,
}

/// Advance the monitor by one observation and return the next state.
///
/// `confirm` is called at most once and only on the cycle where the failure
/// counter first reaches `threshold`; `recover` is called at most once and
/// only when `confirm` returned `true`. A `threshold` of 0 is treated as 1.
pub fn advance<C, R>(
    state: MonitorState,
    is_online: bool,
    confirm: C,
    recover: R,
    threshold: u32,
) -> MonitorState
where
    C: FnOnce() -> bool,
    R: FnOnce(),
{
    transition(state, is_online, confirm, recover, threshold).state
}

/// Same as [`advance`], also reporting the [`Outcome`] of the cycle.
pub fn transition<C, R>(
    state: MonitorState,
    is_online: bool,
    confirm: C,
    recover: R,
    threshold: u32,
) -> Transition
where
    C: FnOnce() -> bool,
    R: FnOnce(),
{
    let threshold = threshold.max(1);

    if is_online {
        let outcome = if state.is_healthy() {
            Outcome::StillHealthy
        } else {
            Outcome::Recovered
        };
        return Transition {
            state: MonitorState::healthy(),
            outcome,
        };
    }

    let failure_count = state.failure_count.saturating_add(1);

    if state.prompt_shown {
        return Transition {
            state: MonitorState {
                failure_count,
                prompt_shown: true,
            },
            outcome: Outcome::Suppressed,
        };
    }

    if failure_count < threshold {
        return Transition {
            state: MonitorState {
                failure_count,
                prompt_shown: false,
            },
            outcome: Outcome::Degrading,
        };
    }

    if confirm() {
        recover();
        // The prompt stays marked as shown even though the counter resets:
        // a second outage reaching the threshold before any success will not
        // ask again.
        Transition {
            state: MonitorState {
                failure_count: 0,
                prompt_shown: true,
            },
            outcome: Outcome::RecoveryAttempted,
        }
    } else {
        Transition {
            state: MonitorState {
                failure_count,
                prompt_shown: true,
            },
            outcome: Outcome::RecoveryDeclined,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
