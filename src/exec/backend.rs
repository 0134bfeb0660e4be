// src/exec/backend.rs

//! Pluggable run backend.
//!
//! The dispatcher talks to a `RunBackend` instead of spawning processes
//! itself. Production uses [`RealRunBackend`], which drives a
//! [`RunController`] on its own Tokio task; tests can plug in a backend that
//! records events and reports completion without touching the OS.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::exec::run_controller::RunController;
use crate::types::ChangeEvent;

/// Starts one run per accepted change event.
///
/// Implementations must eventually send exactly one
/// [`RuntimeEvent::RunCompleted`] (or [`RuntimeEvent::RunAborted`]) back to
/// the dispatcher for every call, otherwise the execution slot stays busy.
pub trait RunBackend: Send {
    fn start_run(
        &mut self,
        event: ChangeEvent,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Backend that executes the configured command for real.
#[derive(Debug)]
pub struct RealRunBackend {
    controller: Arc<RunController>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl RealRunBackend {
    pub fn new(controller: RunController, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            controller: Arc::new(controller),
            runtime_tx,
        }
    }
}

impl RunBackend for RealRunBackend {
    fn start_run(
        &mut self,
        event: ChangeEvent,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let controller = Arc::clone(&self.controller);
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                let signal = match controller.run(&event).await {
                    Ok(outcome) => RuntimeEvent::RunCompleted { outcome },
                    Err(error) => RuntimeEvent::RunAborted { error },
                };
                if tx.send(signal).await.is_err() {
                    warn!("dispatcher gone; dropping run completion");
                } else {
                    debug!("run completion delivered");
                }
            });
            Ok(())
        })
    }
}
