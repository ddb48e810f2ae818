//! AI generation routes. Provider failures never surface as errors: the
//! service answers with fixed templates and the response says so.

use axum::extract::State;
use axum::Json;
use designtaste::ai::{AiProvider, ComponentCode, ProviderStatus, Variation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::SharedState;

fn is_false(value: &bool) -> bool {
    !*value
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeRequest {
    pub image_url: Option<String>,
    pub component_type: Option<String>,
    pub user_prompt: Option<String>,
    pub original_element_data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GenerateCodeResponse {
    pub success: bool,
    pub code: ComponentCode,
    #[serde(skip_serializing_if = "is_false")]
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePromptRequest {
    pub image_url: Option<String>,
    pub component_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratePromptResponse {
    pub success: bool,
    pub prompt: String,
    #[serde(skip_serializing_if = "is_false")]
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationsRequest {
    pub image_url: Option<String>,
    pub component_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VariationsResponse {
    pub success: bool,
    pub variations: Vec<Variation>,
    #[serde(skip_serializing_if = "is_false")]
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeElementRequest {
    pub image_url: Option<String>,
    pub element_data: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeElementResponse {
    pub success: bool,
    pub suggested_prompt: String,
    pub component_type: String,
    #[serde(skip_serializing_if = "is_false")]
    pub fallback: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersResponse {
    pub success: bool,
    pub current_provider: AiProvider,
    pub providers: Vec<ProviderStatus>,
    pub recommendation: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/ai/generate-code
pub async fn generate_code(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<GenerateCodeRequest>,
) -> ApiResult<Json<GenerateCodeResponse>> {
    let (Some(image_url), Some(component_type)) = (
        required(request.image_url.as_deref()),
        required(request.component_type.as_deref()),
    ) else {
        return Err(ApiError::bad_request(
            "Missing required fields: imageUrl and componentType",
        ));
    };

    let result = state
        .ai
        .generate_code_from_inspiration(
            image_url,
            component_type,
            request.user_prompt.as_deref(),
            request.original_element_data.as_ref(),
        )
        .await;

    Ok(Json(GenerateCodeResponse {
        success: true,
        code: result.value,
        fallback: result.fallback,
    }))
}

/// POST /api/ai/generate-prompt
pub async fn generate_prompt(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<GeneratePromptRequest>,
) -> ApiResult<Json<GeneratePromptResponse>> {
    let (Some(image_url), Some(component_type)) = (
        required(request.image_url.as_deref()),
        required(request.component_type.as_deref()),
    ) else {
        return Err(ApiError::bad_request(
            "Missing required fields: imageUrl and componentType",
        ));
    };

    let result = state
        .ai
        .generate_prompt_from_inspiration(image_url, component_type)
        .await;

    Ok(Json(GeneratePromptResponse {
        success: true,
        prompt: result.value,
        fallback: result.fallback,
    }))
}

/// POST /api/ai/generate-variations
pub async fn generate_variations(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<VariationsRequest>,
) -> ApiResult<Json<VariationsResponse>> {
    let image_url = required(request.image_url.as_deref())
        .ok_or_else(|| ApiError::bad_request("Image URL is required"))?;

    let result = state
        .ai
        .generate_variations(image_url, required(request.component_type.as_deref()))
        .await;

    Ok(Json(VariationsResponse {
        success: true,
        variations: result.value,
        fallback: result.fallback,
    }))
}

/// POST /api/ai/analyze-element
pub async fn analyze_element(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<AnalyzeElementRequest>,
) -> ApiResult<Json<AnalyzeElementResponse>> {
    let image_url = required(request.image_url.as_deref())
        .ok_or_else(|| ApiError::bad_request("Image URL is required"))?;
    let tag_name = request
        .element_data
        .as_ref()
        .and_then(|data| data.get("tagName"))
        .and_then(Value::as_str);

    let result = state.ai.analyze_element(image_url, tag_name).await;

    Ok(Json(AnalyzeElementResponse {
        success: true,
        suggested_prompt: result.value.suggested_prompt,
        component_type: result.value.component_type,
        fallback: result.fallback,
    }))
}

/// GET /api/ai/providers
pub async fn providers(State(state): State<SharedState>) -> Json<ProvidersResponse> {
    let registry = state.ai.registry();
    Json(ProvidersResponse {
        success: true,
        current_provider: registry.current_provider(),
        providers: registry.providers(),
        recommendation: registry.recommendation(),
    })
}
