use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DesignTasteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Queue error: {0}")]
    Queue(#[from] crate::queue::QueueError),

    #[error("Screenshot error: {0}")]
    Screenshot(#[from] crate::screenshot::ScreenshotError),

    #[error("Inspiration error: {0}")]
    Inspiration(#[from] crate::inspiration::InspirationError),

    #[error("AI error: {0}")]
    Ai(#[from] crate::ai::AiError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] crate::pipeline::IngestError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),

    #[error("Extraction error: {0}")]
    Extract(#[from] crate::element::ExtractError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] crate::telemetry::TelemetryError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

pub type Result<T> = std::result::Result<T, DesignTasteError>;
