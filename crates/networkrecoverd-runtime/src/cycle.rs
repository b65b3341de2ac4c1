//! One monitoring cycle: probe → state machine → (prompt) → (recovery).
//!
//! Adapts the IO collaborators to the closures the core expects and absorbs
//! their failures: a dialog that cannot be shown counts as a decline, and a
//! failed or panicking recovery run is only logged.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;

use networkrecoverd_core::{MonitorState, Outcome, Phase, transition};
use networkrecoverd_io::{Confirmer, ReachabilityProbe, RecoveryAction};

use crate::config::MonitorConfig;

/// The three injected capabilities, owned by the driver.
pub struct Collaborators<P, C, R> {
    pub probe: P,
    pub confirmer: C,
    pub recovery: R,
}

/// Result of one cycle. Printed as JSON in one-shot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub online: bool,
    #[serde(flatten)]
    pub state: MonitorState,
    pub phase: Phase,
    pub outcome: Outcome,
}

/// Run one full cycle. Blocking: the probe, the dialog and the recovery
/// script all run on the calling thread.
pub fn run_cycle<P, C, R>(
    state: MonitorState,
    config: &MonitorConfig,
    collab: &Collaborators<P, C, R>,
) -> CycleReport
where
    P: ReachabilityProbe,
    C: Confirmer,
    R: RecoveryAction,
{
    let online = collab
        .probe
        .is_reachable(&config.host, config.port, config.probe_timeout);

    let t = transition(
        state,
        online,
        || ask_operator(&collab.confirmer, config.threshold),
        || run_recovery(&collab.recovery),
        config.threshold,
    );

    log_outcome(t.outcome, t.state);

    CycleReport {
        online,
        state: t.state,
        phase: t.state.phase(config.threshold),
        outcome: t.outcome,
    }
}

fn ask_operator<C: Confirmer>(confirmer: &C, threshold: u32) -> bool {
    tracing::info!("failure threshold reached ({threshold}); prompting user");
    match confirmer.confirm() {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!("confirmation dialog unavailable, treating as declined: {e}");
            false
        }
    }
}

/// Runs the recovery action. Never unwinds: a panic inside the action is
/// logged and the cycle still commits the accepted-recovery state.
fn run_recovery<R: RecoveryAction>(recovery: &R) {
    tracing::info!("user chose to run recovery");
    let result = match catch_unwind(AssertUnwindSafe(|| recovery.run())) {
        Ok(result) => result,
        Err(payload) => {
            tracing::error!(
                "unexpected error while running recovery script: {}",
                panic_message(payload.as_ref())
            );
            return;
        }
    };
    match result {
        Ok(report) if report.success() => {
            tracing::info!(
                "recovery script completed successfully in {:.1}s",
                report.duration.as_secs_f64()
            );
        }
        Ok(report) => {
            if report.timed_out {
                tracing::warn!(
                    "recovery script timed out after {:.1}s and was killed",
                    report.duration.as_secs_f64()
                );
            } else {
                match report.exit_code {
                    Some(code) => tracing::warn!("recovery script failed (exit code {code})"),
                    None => tracing::warn!("recovery script terminated by signal"),
                }
            }
            tracing::warn!("stdout: {}", report.stdout.trim());
            tracing::warn!("stderr: {}", report.stderr.trim());
        }
        Err(e) => tracing::warn!("recovery script could not be run: {e}"),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "panic with non-string payload"
    }
}

fn log_outcome(outcome: Outcome, state: MonitorState) {
    match outcome {
        Outcome::StillHealthy => tracing::debug!("internet reachable"),
        Outcome::Recovered => tracing::info!("internet recovered; resetting state"),
        Outcome::Degrading | Outcome::Suppressed => {
            tracing::info!("internet down (failure {})", state.failure_count);
        }
        Outcome::RecoveryAttempted => {
            tracing::info!("recovery attempted; failure counter reset");
        }
        Outcome::RecoveryDeclined => {
            tracing::info!(
                "user declined recovery (failure {}); not asking again until back online",
                state.failure_count
            );
        }
    }
}
