use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use runwatch::engine::RuntimeEvent;
use runwatch::errors::Result;
use runwatch::exec::RunBackend;
use runwatch::types::{ChangeEvent, RunOutcome};

/// A fake run backend that:
/// - records which change events started a run
/// - "runs" for a fixed duration, then reports `RunCompleted(Success)`
/// - tracks how many runs were in flight at once
pub struct FakeBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    run_duration: Duration,
    started: Arc<Mutex<Vec<ChangeEvent>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, run_duration: Duration) -> Self {
        Self {
            runtime_tx,
            run_duration,
            started: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared view of the events that started runs.
    pub fn started(&self) -> Arc<Mutex<Vec<ChangeEvent>>> {
        Arc::clone(&self.started)
    }

    /// Shared view of the highest number of simultaneous runs seen.
    pub fn max_in_flight(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.max_in_flight)
    }
}

impl RunBackend for FakeBackend {
    fn start_run(
        &mut self,
        event: ChangeEvent,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let duration = self.run_duration;
        let in_flight = Arc::clone(&self.in_flight);
        let max_in_flight = Arc::clone(&self.max_in_flight);

        self.started.lock().unwrap().push(event);

        Box::pin(async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                let _ = tx
                    .send(RuntimeEvent::RunCompleted {
                        outcome: RunOutcome::Success,
                    })
                    .await;
            });
            Ok(())
        })
    }
}
