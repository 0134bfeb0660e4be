// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_settings;
use crate::engine::{CoreDispatcher, Runtime, RuntimeEvent};
use crate::exec::{RealRunBackend, RunController, TerminalConsole};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings (flags + optional file)
/// - the file watcher
/// - the dispatcher and the run backend
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(&args).context("loading settings")?;

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let _watcher = crate::watch::spawn_watcher(
        settings.root.clone(),
        settings.recursive,
        settings.exclude.clone(),
        rt_tx.clone(),
    )
    .with_context(|| format!("watching {}", settings.root.display()))?;

    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            request_shutdown(&tx).await;
        });
    }

    let controller = RunController::new(
        settings.template.clone(),
        Arc::new(TerminalConsole),
        settings.run,
    );
    let backend = RealRunBackend::new(controller, rt_tx);

    info!(
        root = %settings.root.display(),
        command = %settings.template,
        "waiting for changes"
    );

    let runtime = Runtime::new(CoreDispatcher::new(), rt_rx, backend);
    runtime.run().await?;
    Ok(())
}

/// Ask the dispatcher to stop. Returns false if it is already gone.
async fn request_shutdown(tx: &mpsc::Sender<RuntimeEvent>) -> bool {
    if tx.send(RuntimeEvent::ShutdownRequested).await.is_err() {
        debug!("runtime already stopped; shutdown request not delivered");
        return false;
    }
    true
}
