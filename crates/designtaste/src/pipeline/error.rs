use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Invalid element data: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Element not found in database")]
    NotFound,

    #[error("Analysis worker is not accepting jobs")]
    WorkerClosed,
}
