pub mod ai;
pub mod analysis;
pub mod broadcast;
pub mod config;
pub mod db;
pub mod element;
pub mod error;
pub mod inspiration;
pub mod pipeline;
pub mod progress;
pub mod queue;
pub mod quick_fix;
pub mod screenshot;
pub mod secrets;
pub mod telemetry;

pub use ai::{AiError, AiProvider, AiService, HttpCompletionClient, ProviderRegistry};
pub use analysis::{critique, detect_component_type, ComponentType, Critique};
pub use broadcast::{AnalysisProgressBroadcaster, AnalysisProgressEvent};
pub use config::{load_config, load_config_or_default, Config};
pub use db::{Database, DatabaseError};
pub use element::{ElementSnapshot, ExtractError};
pub use error::{ConfigError, DesignTasteError, Result};
pub use inspiration::{Inspiration, InspirationError, InspirationSearch, InspirationSource};
pub use pipeline::{ingest, AnalysisWorker, Analyzer, IngestError, IngestRequest};
pub use queue::{JobStatus, LocalQueue, QueueError};
pub use screenshot::ScreenshotError;
pub use secrets::{resolve_api_key, SecretError};
pub use telemetry::{init_logging, TelemetryError};
