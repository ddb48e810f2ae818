use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::element_repo::{self, ElementRow};
use crate::db::{now_timestamp, Database};
use crate::queue::{JobStatus, PRIORITY_NORMAL};

use super::error::IngestError;
use super::worker::AnalysisWorker;

/// Body of an ingestion request. Every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub id: Option<String>,
    pub element_data: Option<Value>,
    pub screenshot: Option<String>,
    pub url: Option<String>,
}

struct ValidRequest<'a> {
    id: &'a str,
    element_data: &'a Value,
    screenshot: &'a str,
    url: &'a str,
}

impl IngestRequest {
    fn validate(&self) -> Result<ValidRequest<'_>, IngestError> {
        fn non_empty(field: &Option<String>) -> Result<&str, IngestError> {
            field
                .as_deref()
                .filter(|s| !s.is_empty())
                .ok_or(IngestError::MissingFields)
        }

        let element_data = self
            .element_data
            .as_ref()
            .filter(|v| !is_blank(v))
            .ok_or(IngestError::MissingFields)?;

        Ok(ValidRequest {
            id: non_empty(&self.id)?,
            element_data,
            screenshot: non_empty(&self.screenshot)?,
            url: non_empty(&self.url)?,
        })
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Acknowledgement returned as soon as the element is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestAck {
    pub success: bool,
    pub element_id: String,
    pub message: String,
}

/// Stores the element as `processing` and hands it to the analysis worker.
///
/// Returns without waiting for the analysis. Invalid requests create no row.
pub async fn ingest(
    db: &Database,
    worker: &AnalysisWorker,
    request: &IngestRequest,
) -> Result<IngestAck, IngestError> {
    let valid = request.validate()?;

    let row = ElementRow {
        id: valid.id.to_string(),
        element_data: serde_json::to_string(valid.element_data)?,
        screenshot_url: valid.screenshot.to_string(),
        source_url: valid.url.to_string(),
        status: JobStatus::Processing.as_str().to_string(),
        priority: PRIORITY_NORMAL,
        created_at: now_timestamp(),
        processed_at: None,
        error_message: None,
    };
    element_repo::insert(db, &row)?;
    log::info!("Element {} stored from {}", row.id, row.source_url);

    worker.submit(&row.id)?;

    Ok(IngestAck {
        success: true,
        element_id: row.id,
        message: "Element queued for processing".to_string(),
    })
}
