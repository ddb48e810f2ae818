//! Element ingestion, status, details and queue routes.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::Json;
use designtaste::db::element_repo::{self, ElementRow, ElementUpdate};
use designtaste::db::{analysis_repo, inspiration_repo};
use designtaste::pipeline::{self, IngestAck, IngestError, IngestRequest};
use designtaste::progress::{self, ProcessingStep};
use designtaste::JobStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info_span, Instrument};

use super::millis;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::SharedState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStatusResponse {
    pub id: String,
    pub url: String,
    pub element_data: Value,
    pub status: String,
    pub priority: i64,
    pub timestamp: Option<i64>,
    pub processed_at: Option<i64>,
    pub error_message: Option<String>,
    pub progress: u8,
    pub current_step: &'static str,
    pub ai_provider: &'static str,
    pub steps: [ProcessingStep; 4],
    pub analysis: bool,
    pub inspirations_count: u64,
    pub is_processing: bool,
}

/// Element as shown on the details page and returned by updates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementView {
    pub id: String,
    pub url: String,
    pub element_data: Value,
    pub status: String,
    pub priority: i64,
    pub created_at: String,
    pub processed_at: Option<String>,
    pub error_message: Option<String>,
}

impl From<ElementRow> for ElementView {
    fn from(row: ElementRow) -> Self {
        Self {
            element_data: row.element_json(),
            id: row.id,
            url: row.source_url,
            status: row.status,
            priority: row.priority,
            created_at: row.created_at,
            processed_at: row.processed_at,
            error_message: row.error_message,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub component_type: String,
    pub design_issues: Vec<String>,
    pub style_characteristics: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence_score: f64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspirationView {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub source: String,
    pub category: String,
    pub tags: Vec<String>,
    pub similarity_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ElementDetailsResponse {
    pub element: ElementView,
    pub analysis: Option<AnalysisView>,
    pub inspirations: Vec<InspirationView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: String,
    pub url: String,
    pub element_data: Value,
    pub status: String,
    pub priority: i64,
    pub timestamp: Option<i64>,
    pub analysis: Option<AnalysisView>,
    pub inspirations: Vec<InspirationView>,
    pub processed_at: Option<i64>,
    pub error_message: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct QueueStats {
    pub total: u64,
    pub queued: u64,
    pub processing: u64,
    pub completed: u64,
    pub error: u64,
}

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    pub queue: Vec<QueueItem>,
    pub stats: QueueStats,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub element: ElementView,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub status: Option<String>,
    pub priority: Option<i64>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/elements/process
pub async fn process_element(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<IngestRequest>,
) -> ApiResult<Json<IngestAck>> {
    let span = info_span!(
        "ingest_request",
        element_id = request.id.as_deref().unwrap_or_default()
    );
    let outcome = pipeline::ingest(&state.db, &state.worker, &request)
        .instrument(span)
        .await;

    match outcome {
        Ok(ack) => Ok(Json(ack)),
        Err(IngestError::MissingFields) => Err(ApiError::bad_request("Missing required fields")),
        Err(e) => {
            log::error!("Failed to ingest element: {}", e);
            Err(ApiError::internal("Internal server error"))
        }
    }
}

/// GET /api/elements/{id}/status
pub async fn element_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ElementStatusResponse>> {
    let fetch_failed = |e: designtaste::DatabaseError| {
        log::error!("Failed to fetch status of {}: {}", id, e);
        ApiError::internal("Failed to fetch element status")
    };

    let row = element_repo::find_by_id(&state.db, &id)
        .map_err(fetch_failed)?
        .ok_or_else(|| ApiError::not_found("Element not found"))?;
    let has_analysis = analysis_repo::exists_for(&state.db, &id).map_err(fetch_failed)?;
    let inspirations_count =
        inspiration_repo::count_for_element(&state.db, &id).map_err(fetch_failed)?;

    let status = JobStatus::from_str(&row.status).map_err(|e| {
        log::error!("Element {} has {}", id, e);
        ApiError::internal("Failed to fetch element status")
    })?;

    Ok(Json(ElementStatusResponse {
        timestamp: millis(&row.created_at),
        processed_at: row.processed_at.as_deref().and_then(millis),
        element_data: row.element_json(),
        progress: progress::progress(status, has_analysis, inspirations_count),
        current_step: progress::current_step(status, has_analysis, inspirations_count),
        ai_provider: progress::ai_provider_label(has_analysis, inspirations_count),
        steps: progress::steps(status, has_analysis, inspirations_count),
        analysis: has_analysis,
        inspirations_count,
        is_processing: status == JobStatus::Processing,
        id: row.id,
        url: row.source_url,
        status: row.status,
        priority: row.priority,
        error_message: row.error_message,
    }))
}

/// PATCH /api/elements/{id}/status
pub async fn update_element(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateRequest>,
) -> ApiResult<Json<UpdateResponse>> {
    let update = ElementUpdate {
        status: request.status.filter(|s| !s.is_empty()),
        priority: request.priority,
    };
    if update.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }

    if let Some(status) = &update.status {
        JobStatus::from_str(status).map_err(|_| ApiError::bad_request("Invalid status"))?;
    }

    let updated = element_repo::update_fields(&state.db, &id, &update)
        .map_err(|e| {
            log::error!("Failed to update element {}: {}", id, e);
            ApiError::internal("Failed to update element")
        })?
        .ok_or_else(|| ApiError::not_found("Element not found"))?;

    Ok(Json(UpdateResponse {
        success: true,
        element: updated.into(),
    }))
}

/// DELETE /api/elements/{id}/status
pub async fn delete_element(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    element_repo::delete(&state.db, &id).map_err(|e| {
        log::error!("Failed to delete element {}: {}", id, e);
        ApiError::internal("Failed to delete element")
    })?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Element deleted successfully",
    }))
}

/// GET /api/elements/{id}/details
pub async fn element_details(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ElementDetailsResponse>> {
    let row = element_repo::find_by_id(&state.db, &id)
        .map_err(|e| {
            log::error!("Failed to fetch element {}: {}", id, e);
            ApiError::internal("Internal server error")
        })?
        .ok_or_else(|| ApiError::not_found("Element not found"))?;

    let analysis = match analysis_repo::find_by_element(&state.db, &id) {
        Ok(found) => found,
        Err(e) => {
            log::info!("No analysis found for {}: {}", id, e);
            None
        }
    };
    let inspirations = inspiration_repo::list_for_element(&state.db, &id).unwrap_or_else(|e| {
        log::info!("No inspirations found for {}: {}", id, e);
        Vec::new()
    });

    Ok(Json(ElementDetailsResponse {
        element: row.into(),
        analysis: analysis.map(|a| AnalysisView {
            component_type: a.component_type,
            design_issues: a.design_issues,
            style_characteristics: a.style_characteristics,
            recommendations: a.recommendations,
            confidence_score: a.confidence_score,
            created_at: a.created_at,
        }),
        inspirations: inspirations
            .into_iter()
            .map(|i| InspirationView {
                id: i.id,
                title: i.title,
                image_url: i.image_url,
                source: i.source,
                category: i.category,
                tags: i.tags,
                similarity_score: i.similarity_score,
                description: i.description,
                source_url: i.source_url,
                created_at: i.created_at,
            })
            .collect(),
    }))
}

/// GET /api/elements/queue
///
/// A store failure degrades to an empty queue.
pub async fn list_queue(State(state): State<SharedState>) -> Json<QueueResponse> {
    let rows = element_repo::list_recent(&state.db).unwrap_or_else(|e| {
        log::error!("Failed to list queue: {}", e);
        Vec::new()
    });

    let mut stats = QueueStats::default();
    let queue = rows
        .into_iter()
        .map(|row| {
            stats.total += 1;
            match row.status.as_str() {
                "queued" => stats.queued += 1,
                "processing" => stats.processing += 1,
                "completed" => stats.completed += 1,
                "error" => stats.error += 1,
                _ => {}
            }
            QueueItem {
                timestamp: millis(&row.created_at),
                processed_at: row.processed_at.as_deref().and_then(millis),
                element_data: row.element_json(),
                analysis: None,
                inspirations: Vec::new(),
                id: row.id,
                url: row.source_url,
                status: row.status,
                priority: row.priority,
                error_message: row.error_message,
            }
        })
        .collect();

    Json(QueueResponse { queue, stats })
}

/// DELETE /api/elements/queue
pub async fn clear_queue(State(state): State<SharedState>) -> ApiResult<Json<MessageResponse>> {
    let removed = element_repo::delete_all(&state.db).map_err(|e| {
        log::error!("Failed to clear queue: {}", e);
        ApiError::internal("Failed to clear queue")
    })?;
    log::info!("Cleared {} elements", removed);

    Ok(Json(MessageResponse {
        success: true,
        message: "Queue cleared successfully",
    }))
}
