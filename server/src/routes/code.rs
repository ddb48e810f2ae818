//! Improved code generation for a stored element.

use axum::extract::State;
use axum::Json;
use designtaste::db::code_repo::{self, GeneratedCodeRow};
use designtaste::db::{analysis_repo, element_repo, inspiration_repo, now_timestamp};
use designtaste::ElementSnapshot;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use super::millis;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::SharedState;

const DEFAULT_FRAMEWORK: &str = "nextjs";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateElementCodeRequest {
    pub element_id: Option<String>,
    #[serde(default)]
    pub inspiration_ids: Vec<String>,
    pub framework: Option<String>,
    #[serde(default)]
    pub style_preferences: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCodeView {
    pub id: String,
    pub framework: String,
    pub code: String,
    pub description: String,
    pub improvements: Vec<String>,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateElementCodeResponse {
    pub success: bool,
    pub generated_code: GeneratedCodeView,
}

/// POST /api/generate-code
pub async fn generate_element_code(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<GenerateElementCodeRequest>,
) -> ApiResult<Json<GenerateElementCodeResponse>> {
    let element_id = request
        .element_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Element ID is required"))?;
    let framework = request
        .framework
        .as_deref()
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FRAMEWORK);

    let failed = |e: designtaste::DatabaseError| {
        log::error!("Code generation for {} failed: {}", element_id, e);
        ApiError::internal("Failed to generate code")
    };

    let element = element_repo::find_by_id(&state.db, element_id)
        .map_err(failed)?
        .ok_or_else(|| ApiError::not_found("Element not found"))?;
    let analysis = analysis_repo::find_by_element(&state.db, element_id).map_err(failed)?;
    let inspirations = if request.inspiration_ids.is_empty() {
        Vec::new()
    } else {
        inspiration_repo::find_by_ids(&state.db, &request.inspiration_ids).map_err(failed)?
    };

    let snapshot = ElementSnapshot::from_json(&element.element_json()).unwrap_or_else(|e| {
        log::warn!("Element {} has unreadable data: {}", element_id, e);
        ElementSnapshot::default()
    });

    let generated = state
        .ai
        .generate_element_code(
            &snapshot,
            analysis.as_ref(),
            &inspirations,
            framework,
            &request.style_preferences,
        )
        .instrument(tracing::info_span!("element_code_request", element_id))
        .await
        .value;

    let row = GeneratedCodeRow {
        id: uuid::Uuid::new_v4().to_string(),
        element_id: element_id.to_string(),
        framework: framework.to_string(),
        code: generated.code,
        description: generated.description,
        improvements: generated.improvements,
        created_at: now_timestamp(),
    };
    code_repo::insert(&state.db, &row).map_err(|e| {
        log::error!("Failed to store generated code for {}: {}", element_id, e);
        ApiError::internal("Failed to store generated code")
    })?;

    Ok(Json(GenerateElementCodeResponse {
        success: true,
        generated_code: GeneratedCodeView {
            timestamp: millis(&row.created_at),
            id: row.id,
            framework: row.framework,
            code: row.code,
            description: row.description,
            improvements: row.improvements,
        },
    }))
}
