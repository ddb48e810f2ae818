//! Test harness for isolated pipeline runs.
//!
//! Each harness owns a temporary directory holding a file-backed database,
//! an analysis worker and a progress broadcaster subscribed before any
//! element is submitted.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::broadcast;

use designtaste::broadcast::AnalysisProgressEvent;
use designtaste::db::analysis_repo::{self, AnalysisRow};
use designtaste::db::element_repo::{self, ElementRow};
use designtaste::db::inspiration_repo::{self, InspirationRow};
use designtaste::pipeline::IngestAck;
use designtaste::{
    ingest, AnalysisProgressBroadcaster, AnalysisWorker, Analyzer, Database, IngestError,
    IngestRequest, InspirationSearch,
};

/// Everything stored for one element after the pipeline ran.
#[derive(Debug)]
pub struct StoredElement {
    pub element: ElementRow,
    pub analysis: Option<AnalysisRow>,
    pub inspirations: Vec<InspirationRow>,
}

pub struct TestHarness {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub db: Database,
    worker: AnalysisWorker,
    events: broadcast::Receiver<AnalysisProgressEvent>,
}

impl TestHarness {
    /// Must be called inside a tokio runtime; the worker is spawned on it.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("designtaste.db");
        let db = Database::open(&db_path).expect("Failed to open database");

        let analyzer = Arc::new(Analyzer::new(
            db.clone(),
            Arc::new(InspirationSearch::new(Vec::new())),
        ));
        let broadcaster = AnalysisProgressBroadcaster::new(256);
        let events = broadcaster.subscribe();
        let worker = AnalysisWorker::start(analyzer, Some(broadcaster));

        Self {
            temp_dir,
            db_path,
            db,
            worker,
            events,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Submits a capture the way the HTTP endpoint does.
    pub async fn ingest(
        &self,
        id: &str,
        element_data: Value,
    ) -> Result<IngestAck, IngestError> {
        let request = IngestRequest {
            id: Some(id.to_string()),
            element_data: Some(element_data),
            screenshot: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
            url: Some("https://example.com/pricing".to_string()),
        };
        ingest(&self.db, &self.worker, &request).await
    }

    pub async fn ingest_request(&self, request: &IngestRequest) -> Result<IngestAck, IngestError> {
        ingest(&self.db, &self.worker, request).await
    }

    /// Stops accepting elements and waits until every submitted one is done.
    pub async fn finish(&self) {
        self.worker.wait().await;
    }

    pub fn stored(&self, id: &str) -> Option<StoredElement> {
        let element = element_repo::find_by_id(&self.db, id).expect("Failed to read element")?;
        let analysis =
            analysis_repo::find_by_element(&self.db, id).expect("Failed to read analysis");
        let inspirations =
            inspiration_repo::list_for_element(&self.db, id).expect("Failed to read inspirations");
        Some(StoredElement {
            element,
            analysis,
            inspirations,
        })
    }

    /// Progress events received so far.
    pub fn drain_events(&mut self) -> Vec<AnalysisProgressEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
