//! Shared application state.

use std::sync::Arc;

use designtaste::ai::{AiService, CompletionClient, HttpCompletionClient, ProviderRegistry};
use designtaste::broadcast::AnalysisProgressBroadcaster;
use designtaste::pipeline::{AnalysisWorker, Analyzer};
use designtaste::{Config, ConfigError, Database, DesignTasteError, InspirationSearch};
use log::info;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub db: Database,
    pub ai: AiService,
    /// Background analysis of ingested elements.
    pub worker: AnalysisWorker,
    /// Progress events of the analysis worker.
    pub broadcaster: AnalysisProgressBroadcaster,
}

impl AppState {
    /// Wires the collaborators and starts the analysis worker.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(db: Database, ai: AiService, search: Arc<InspirationSearch>) -> Self {
        let broadcaster = AnalysisProgressBroadcaster::default();
        let analyzer = Arc::new(Analyzer::new(db.clone(), search));
        let worker = AnalysisWorker::start(analyzer, Some(broadcaster.clone()));

        Self {
            db,
            ai,
            worker,
            broadcaster,
        }
    }

    /// Production constructor: file database, environment credentials,
    /// HTTP providers and the default inspiration sources.
    pub fn from_config(config: &Config) -> Result<Self, DesignTasteError> {
        let db_path = config
            .database
            .resolved_path()
            .ok_or_else(|| ConfigError::Validation {
                message: "Could not determine database path".to_string(),
            })?;
        let db = Database::open(&db_path)?;

        let registry = Arc::new(ProviderRegistry::from_config(&config.ai)?);
        info!(
            "AI providers configured: {:?}, default {}",
            registry.configured(),
            registry.current_provider()
        );
        let client: Arc<dyn CompletionClient> = Arc::new(HttpCompletionClient::new(
            Arc::clone(&registry),
            config.ai.request_timeout(),
        )?);
        let ai = AiService::new(registry, client);

        Ok(Self::new(db, ai, Arc::new(InspirationSearch::default())))
    }

    /// Stops the worker and waits for the element in flight.
    pub async fn shutdown(&self) {
        self.worker.shutdown();
        self.worker.wait().await;
    }
}
