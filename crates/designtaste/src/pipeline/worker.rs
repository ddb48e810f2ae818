use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::broadcast::{AnalysisPhase, AnalysisProgressBroadcaster};

use super::error::IngestError;
use super::progress::{BroadcastProgress, NoopProgress, ProgressEvent, ProgressReporter};
use super::runner::Analyzer;

/// Background task that analyses submitted elements one at a time.
pub struct AnalysisWorker {
    sender: Mutex<Option<mpsc::UnboundedSender<String>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    shutdown: Arc<AtomicBool>,
}

impl AnalysisWorker {
    /// Spawns the worker on the current tokio runtime.
    pub fn start(analyzer: Arc<Analyzer>, broadcaster: Option<AnalysisProgressBroadcaster>) -> Self {
        // Unbounded so a backlog never holds up the caller.
        let (sender, receiver) = mpsc::unbounded_channel::<String>();
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(run_worker(
            receiver,
            Arc::clone(&shutdown),
            analyzer,
            broadcaster,
        ));

        info!("Started analysis worker");

        Self {
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
            shutdown,
        }
    }

    /// Queues an element id for analysis. Never waits on the worker.
    pub fn submit(&self, element_id: &str) -> Result<(), IngestError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(IngestError::WorkerClosed);
        }

        let sender = self
            .sender
            .lock()
            .map_err(|_| IngestError::WorkerClosed)?
            .clone()
            .ok_or(IngestError::WorkerClosed)?;

        sender
            .send(element_id.to_string())
            .map_err(|_| IngestError::WorkerClosed)
    }

    /// Stops accepting new elements. Already queued ids are skipped.
    pub fn shutdown(&self) {
        info!("Shutting down analysis worker...");
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Closes the channel and waits for the worker task to finish.
    pub async fn wait(&self) {
        // Drop sender so the receive loop ends once the queue is empty
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }

        let handle = self.handle.lock().ok().and_then(|mut h| h.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Analysis worker panicked: {:?}", e);
            }
        }

        info!("Analysis worker has stopped");
    }
}

async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<String>,
    shutdown: Arc<AtomicBool>,
    analyzer: Arc<Analyzer>,
    broadcaster: Option<AnalysisProgressBroadcaster>,
) {
    debug!("Analysis worker started");

    while let Some(element_id) = receiver.recv().await {
        if shutdown.load(Ordering::Relaxed) {
            debug!("Analysis worker received shutdown signal");
            break;
        }

        debug!("Analysing element {}", element_id);

        let outcome = match &broadcaster {
            Some(broadcaster) => {
                let progress = BroadcastProgress::new(&element_id, broadcaster.sender());
                progress.report(ProgressEvent::Phase {
                    phase: AnalysisPhase::Queued,
                    message: "Element queued for processing".to_string(),
                });
                analyzer.process(&element_id, &progress).await
            }
            None => analyzer.process(&element_id, &NoopProgress).await,
        };

        // Failures are already recorded on the element row
        if let Err(e) = outcome {
            debug!("Element {} finished with error: {}", element_id, e);
        }
    }

    debug!("Analysis worker stopped");
}
