use axum::Json;
use designtaste::quick_fix;
use designtaste::ElementSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickFixRequest {
    pub element_data: Option<Value>,
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuickFixResponse {
    pub success: bool,
    pub suggestion: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// POST /api/quick-fix
pub async fn quick_fix(
    ApiJson(request): ApiJson<QuickFixRequest>,
) -> ApiResult<Json<QuickFixResponse>> {
    let (Some(element_data), Some(prompt)) = (
        request.element_data.filter(|v| !v.is_null()),
        request.prompt.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Missing element data or prompt"));
    };

    let element = ElementSnapshot::from_json(&element_data).map_err(|e| {
        log::warn!("Unreadable element data for quick fix: {}", e);
        ApiError::bad_request("Missing element data or prompt")
    })?;

    Ok(Json(QuickFixResponse {
        success: true,
        suggestion: quick_fix::suggest(&element, &prompt),
        kind: "quick_fix",
    }))
}
