use std::sync::Arc;

use tokio::sync::broadcast;

use crate::broadcast::{AnalysisPhase, AnalysisProgressEvent, AnalysisProgressTracker};

/// Events emitted while an element is analysed.
pub enum ProgressEvent {
    Phase {
        phase: AnalysisPhase,
        message: String,
    },
    Classified {
        component_type: String,
    },
    Completed {
        component_type: String,
        inspirations_count: usize,
    },
    Failed {
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests and callers without subscribers.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Bridges analysis events to the broadcast channel.
pub struct BroadcastProgress {
    tracker: AnalysisProgressTracker,
}

impl BroadcastProgress {
    pub fn new(element_id: &str, sender: Arc<broadcast::Sender<AnalysisProgressEvent>>) -> Self {
        Self {
            tracker: AnalysisProgressTracker::new(element_id, sender),
        }
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { phase, message } => {
                self.tracker.update_phase(phase, &message);
            }
            ProgressEvent::Classified { component_type } => {
                self.tracker.classified(&component_type);
            }
            ProgressEvent::Completed {
                component_type,
                inspirations_count,
            } => {
                self.tracker.completed(&component_type, inspirations_count);
            }
            ProgressEvent::Failed { error } => {
                self.tracker.failed(&error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::{AnalysisProgressBroadcaster, AnalysisStatus};

    #[test]
    fn test_broadcast_progress_forwards_events() {
        let broadcaster = AnalysisProgressBroadcaster::new(8);
        let mut rx = broadcaster.subscribe();
        let progress = BroadcastProgress::new("e1", broadcaster.sender());

        progress.report(ProgressEvent::Phase {
            phase: AnalysisPhase::Critiquing,
            message: "Critiquing design".to_string(),
        });
        progress.report(ProgressEvent::Failed {
            error: "boom".to_string(),
        });

        let first = rx.try_recv().unwrap();
        assert_eq!(first.phase, AnalysisPhase::Critiquing);
        let second = rx.try_recv().unwrap();
        assert_eq!(second.status, AnalysisStatus::Failed);
        assert_eq!(second.error.as_deref(), Some("boom"));
    }
}
