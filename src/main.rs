//! update-watcher - request a reboot when a newer OS release is published
//!
//! Reads the installed version from the release file once at startup, then
//! polls the configured URL until interrupted.

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use update_watcher::cli::CliArgs;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_directive())),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let monitor = args.build_monitor()?;

    if args.once {
        let outcome = monitor.check_once().await;
        return Ok(if outcome.is_failure() {
            ExitCode::from(2)
        } else {
            ExitCode::SUCCESS
        });
    }

    info!("Checking every {:?}", args.delay);
    monitor.run(args.delay, shutdown_signal()).await;

    Ok(ExitCode::SUCCESS)
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Interrupt received"),
        _ = terminate => info!("SIGTERM received"),
    }
}
