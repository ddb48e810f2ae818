use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::element::ElementSnapshot;

use super::QueueError;

/// Priority of a normal capture.
pub const PRIORITY_NORMAL: i64 = 1;
/// Priority of an inspiration request.
pub const PRIORITY_INSPIRATION: i64 = 2;
/// Priority of a "process now" capture.
pub const PRIORITY_IMMEDIATE: i64 = 10;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Lifecycle of a job. Only `queued -> processing -> {completed | error}`
/// is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Queued,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Error)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid status '{}'", s))
    }
}

/// Generates `<prefix>_<unix millis>_<9 random base36 chars>`.
pub fn generate_job_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}

/// An element capture held in the local queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedJob {
    pub id: String,
    pub url: String,
    pub element_data: ElementSnapshot,
    /// Viewport screenshot as a data URI; empty when capture failed.
    pub screenshot: String,
    pub status: JobStatus,
    pub priority: i64,
    /// Creation time in unix milliseconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Body of `POST /api/elements/process`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestPayload {
    pub id: String,
    pub element_data: serde_json::Value,
    pub screenshot: String,
    pub url: String,
}

impl QueuedJob {
    pub fn new(
        id_prefix: &str,
        element_data: ElementSnapshot,
        screenshot: String,
        url: String,
        priority: i64,
        status: JobStatus,
    ) -> Self {
        Self {
            id: generate_job_id(id_prefix),
            url,
            element_data,
            screenshot,
            status,
            priority,
            timestamp: Utc::now().timestamp_millis(),
            error_message: None,
        }
    }

    /// Moves the job to `next`, rejecting transitions outside the lifecycle.
    pub fn transition(&mut self, next: JobStatus) -> Result<(), QueueError> {
        if !self.status.can_transition_to(next) {
            return Err(QueueError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn payload(&self) -> Result<IngestPayload, QueueError> {
        Ok(IngestPayload {
            id: self.id.clone(),
            element_data: serde_json::to_value(&self.element_data)?,
            screenshot: self.screenshot.clone(),
            url: self.url.clone(),
        })
    }
}
