//! networkrecoverd: internet connectivity watchdog.
//! Probes reachability on a fixed interval, debounces failures and, after a
//! sustained outage, asks the operator before running a recovery script.

use std::sync::Arc;

use clap::Parser;

use networkrecoverd_io::{DialogConfirmer, ScriptRecovery, TcpProbe};

mod cli;
mod config;
mod cycle;
mod driver;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let env_file = cli::load_env_file();
    let args = cli::Cli::parse();

    let filter = std::env::var("NETWORKRECOVERD_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("networkrecoverd starting (once={})", args.once);
    if let Some(path) = env_file {
        tracing::debug!("loaded environment from {}", path.display());
    }

    if !args.recovery_script.exists() {
        tracing::warn!(
            "recovery script {} not found; accepted recoveries will fail",
            args.recovery_script.display()
        );
    }

    let mut confirmer = DialogConfirmer::default();
    if let Some(ref program) = args.dialog {
        confirmer = confirmer.with_program(program.clone());
    }

    let collab = Arc::new(cycle::Collaborators {
        probe: TcpProbe,
        confirmer,
        recovery: ScriptRecovery::new(args.recovery_script.clone())
            .with_timeout(args.recovery_timeout),
    });
    let config = args.monitor_config();

    if args.once {
        let report = driver::run_once(config, collab).await?;
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    let shutdown = driver::shutdown_signal()?;
    driver::run_monitor(config, collab, shutdown).await;

    Ok(())
}
