//! Driver loop: owns the monitor state and the poll interval.
//!
//! Cycles run strictly one after another. Each cycle is handed to the
//! blocking pool and awaited before the next sleep, so the probe, dialog and
//! recovery script never overlap and the state has a single owner.

use std::future::Future;
use std::sync::Arc;

use networkrecoverd_core::MonitorState;
use networkrecoverd_io::{Confirmer, ReachabilityProbe, RecoveryAction};

use crate::config::MonitorConfig;
use crate::cycle::{Collaborators, CycleReport, run_cycle};

/// Run cycles until `shutdown` resolves. Returns the last state.
///
/// `shutdown` is only observed between cycles; a signal that arrives while a
/// cycle is running ends the loop as soon as that cycle completes.
pub async fn run_monitor<P, C, R, S>(
    config: MonitorConfig,
    collab: Arc<Collaborators<P, C, R>>,
    shutdown: S,
) -> MonitorState
where
    P: ReachabilityProbe + 'static,
    C: Confirmer + 'static,
    R: RecoveryAction + 'static,
    S: Future<Output = ()>,
{
    let config = Arc::new(config);
    let mut state = MonitorState::healthy();
    tokio::pin!(shutdown);

    tracing::info!(
        "monitoring {}:{} every {:.1}s (threshold {})",
        config.host,
        config.port,
        config.interval.as_secs_f64(),
        config.threshold
    );

    loop {
        if let Some(report) = cycle_blocking(state, &config, &collab).await {
            state = report.state;
        }

        tokio::select! {
            biased;
            () = &mut shutdown => break,
            () = tokio::time::sleep(config.interval) => {}
        }
    }

    tracing::info!("monitor stopped");
    state
}

/// Run exactly one cycle from the initial state.
pub async fn run_once<P, C, R>(
    config: MonitorConfig,
    collab: Arc<Collaborators<P, C, R>>,
) -> anyhow::Result<CycleReport>
where
    P: ReachabilityProbe + 'static,
    C: Confirmer + 'static,
    R: RecoveryAction + 'static,
{
    cycle_blocking(MonitorState::healthy(), &Arc::new(config), &collab)
        .await
        .ok_or_else(|| anyhow::anyhow!("monitoring cycle failed"))
}

/// Run one cycle on the blocking pool. `None` if the cycle panicked outside
/// the recovery adapter (e.g. in the probe); the caller then keeps its
/// previous state.
async fn cycle_blocking<P, C, R>(
    state: MonitorState,
    config: &Arc<MonitorConfig>,
    collab: &Arc<Collaborators<P, C, R>>,
) -> Option<CycleReport>
where
    P: ReachabilityProbe + 'static,
    C: Confirmer + 'static,
    R: RecoveryAction + 'static,
{
    let cfg = Arc::clone(config);
    let c = Arc::clone(collab);
    match tokio::task::spawn_blocking(move || run_cycle(state, &cfg, &c)).await {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::error!(
                "monitoring cycle failed, keeping previous state \
                 (failure_count={}, prompt_shown={}): {e}",
                state.failure_count,
                state.prompt_shown
            );
            None
        }
    }
}

/// Resolves on SIGINT or SIGTERM.
///
/// Handlers are installed when this is called, not when first polled, so an
/// interrupt during the first cycle is not lost.
#[cfg(unix)]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => tracing::info!("interrupted by user, exiting"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, exiting"),
        }
    })
}

/// Resolves on ctrl-c.
#[cfg(not(unix))]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("interrupted by user, exiting");
    })
}

// ─── Tests ───────────────────────────────────────────────────────────
