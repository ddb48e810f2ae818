//! Analysis progress broadcaster for real-time status streaming.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Phase of the background analysis of one element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    Queued,
    Loading,
    Classifying,
    Critiquing,
    SearchingInspiration,
    StoringInspiration,
    Completed,
    Failed,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisPhase::Queued => write!(f, "Queued"),
            AnalysisPhase::Loading => write!(f, "Loading element"),
            AnalysisPhase::Classifying => write!(f, "Detecting component type"),
            AnalysisPhase::Critiquing => write!(f, "Critiquing design"),
            AnalysisPhase::SearchingInspiration => write!(f, "Searching inspiration"),
            AnalysisPhase::StoringInspiration => write!(f, "Storing inspiration"),
            AnalysisPhase::Completed => write!(f, "Completed"),
            AnalysisPhase::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisProgressEvent {
    pub element_id: String,
    pub phase: AnalysisPhase,
    pub status: AnalysisStatus,
    /// Human-readable message describing current activity.
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Detected component type (set once classified).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    /// Stored inspiration count (set on completion).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspirations_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisProgressEvent {
    pub fn new(element_id: &str, phase: AnalysisPhase, message: &str) -> Self {
        let status = match phase {
            AnalysisPhase::Completed => AnalysisStatus::Completed,
            AnalysisPhase::Failed => AnalysisStatus::Failed,
            _ => AnalysisStatus::Processing,
        };

        Self {
            element_id: element_id.to_string(),
            phase,
            status,
            message: message.to_string(),
            timestamp: Utc::now(),
            component_type: None,
            inspirations_count: None,
            error: None,
        }
    }

    pub fn completed(element_id: &str, component_type: &str, inspirations_count: usize) -> Self {
        Self {
            component_type: Some(component_type.to_string()),
            inspirations_count: Some(inspirations_count),
            ..Self::new(element_id, AnalysisPhase::Completed, "Processing completed successfully")
        }
    }

    pub fn failed(element_id: &str, error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(element_id, AnalysisPhase::Failed, "Processing failed")
        }
    }
}

/// Fans progress events out to every subscriber.
#[derive(Clone)]
pub struct AnalysisProgressBroadcaster {
    sender: Arc<broadcast::Sender<AnalysisProgressEvent>>,
}

impl AnalysisProgressBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: AnalysisProgressEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisProgressEvent> {
        self.sender.subscribe()
    }

    /// Creates a tracker for one element and announces it as queued.
    pub fn start(&self, element_id: &str) -> AnalysisProgressTracker {
        let tracker = AnalysisProgressTracker::new(element_id, Arc::clone(&self.sender));
        tracker.update_phase(AnalysisPhase::Queued, "Element queued for processing");
        tracker
    }

    pub fn sender(&self) -> Arc<broadcast::Sender<AnalysisProgressEvent>> {
        Arc::clone(&self.sender)
    }
}

impl Default for AnalysisProgressBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Sends the events of a single element.
pub struct AnalysisProgressTracker {
    element_id: String,
    sender: Arc<broadcast::Sender<AnalysisProgressEvent>>,
}

impl AnalysisProgressTracker {
    pub fn new(element_id: &str, sender: Arc<broadcast::Sender<AnalysisProgressEvent>>) -> Self {
        Self {
            element_id: element_id.to_string(),
            sender,
        }
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn update_phase(&self, phase: AnalysisPhase, message: &str) {
        let _ = self
            .sender
            .send(AnalysisProgressEvent::new(&self.element_id, phase, message));
    }

    pub fn classified(&self, component_type: &str) {
        let mut event = AnalysisProgressEvent::new(
            &self.element_id,
            AnalysisPhase::Classifying,
            &format!("Detected {}", component_type),
        );
        event.component_type = Some(component_type.to_string());
        let _ = self.sender.send(event);
    }

    pub fn completed(&self, component_type: &str, inspirations_count: usize) {
        let _ = self.sender.send(AnalysisProgressEvent::completed(
            &self.element_id,
            component_type,
            inspirations_count,
        ));
    }

    pub fn failed(&self, error: &str) {
        let _ = self
            .sender
            .send(AnalysisProgressEvent::failed(&self.element_id, error));
    }
}
