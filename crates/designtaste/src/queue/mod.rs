//! Client-side processing queue.
//!
//! Captured elements are held locally, persisted after every change and
//! submitted to the ingestion endpoint at most three at a time.

pub mod client;
pub mod job;
pub mod local;
pub mod storage;

use std::path::PathBuf;

use thiserror::Error;

pub use client::{HttpIngestClient, IngestClient};
pub use job::{
    generate_job_id, IngestPayload, JobStatus, QueuedJob, PRIORITY_IMMEDIATE,
    PRIORITY_INSPIRATION, PRIORITY_NORMAL,
};
pub use local::{DrainReport, LocalQueue, QueueState, DEFAULT_CONCURRENCY, DEFAULT_RETRY_DELAY};
pub use storage::{JsonFileStorage, MemoryStorage, QueueStorage};

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Queue storage error for '{path}': {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Queue serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed: {status}")]
    Rejected { status: u16 },

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: JobStatus,
        to: JobStatus,
    },
}
