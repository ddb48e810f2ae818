use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use super::{AiError, AiProvider, ModelKind, ProviderRegistry};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Anthropic requires an explicit output budget.
const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 4096;

/// One chat turn: optional system prompt, a user prompt and optionally an
/// image the model should look at.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub image_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub model: ModelKind,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            image_url: None,
            temperature: None,
            max_tokens: None,
            model: ModelKind::Text,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Attaches an image and switches to the provider's vision model.
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self.model = ModelKind::Vision;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the request to the provider and returns the reply text.
    async fn complete(
        &self,
        provider: AiProvider,
        request: &CompletionRequest,
    ) -> Result<String, AiError>;
}

/// Talks to the vendors' HTTP chat APIs.
pub struct HttpCompletionClient {
    client: Client,
    registry: Arc<ProviderRegistry>,
}

impl HttpCompletionClient {
    pub fn new(registry: Arc<ProviderRegistry>, timeout: Duration) -> Result<Self, AiError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, registry })
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        provider: AiProvider,
        request: &CompletionRequest,
    ) -> Result<String, AiError> {
        let api_key = self
            .registry
            .api_key(provider)
            .ok_or(AiError::MissingApiKey { provider })?;
        let endpoint = self.registry.endpoint(provider);
        let model = provider.model(request.model);

        log::debug!("Sending {} request to {} ({})", provider, endpoint, model);

        let builder = self.client.post(endpoint).header(CONTENT_TYPE, "application/json");
        let builder = match provider {
            AiProvider::Anthropic => builder
                .header("x-api-key", api_key.expose_secret())
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&anthropic_body(model, request)),
            AiProvider::OpenAi | AiProvider::Mistral => builder
                .bearer_auth(api_key.expose_secret())
                .json(&chat_completions_body(provider, model, request)),
        };

        let response = builder.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("{} API error: {} {}", provider.display_name(), status, body);
            return Err(AiError::Api {
                provider,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Value = response.json().await?;
        match extract_text(provider, &parsed) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AiError::EmptyResponse { provider }),
        }
    }
}

/// Request body for the OpenAI-compatible chat completions API.
pub fn chat_completions_body(provider: AiProvider, model: &str, request: &CompletionRequest) -> Value {
    let mut messages = Vec::new();
    if let Some(system) = &request.system {
        messages.push(json!({ "role": "system", "content": system }));
    }

    let user_content = match &request.image_url {
        Some(url) => {
            let image = match provider {
                AiProvider::Mistral => json!({ "type": "image_url", "image_url": url }),
                _ => json!({ "type": "image_url", "image_url": { "url": url } }),
            };
            json!([{ "type": "text", "text": request.prompt }, image])
        }
        None => json!(request.prompt),
    };
    messages.push(json!({ "role": "user", "content": user_content }));

    let mut body = json!({ "model": model, "messages": messages });
    if let Some(temperature) = request.temperature {
        body["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    body
}

/// Request body for the Anthropic messages API.
pub fn anthropic_body(model: &str, request: &CompletionRequest) -> Value {
    let mut content = vec![json!({ "type": "text", "text": request.prompt })];
    if let Some(url) = &request.image_url {
        let source = match split_data_uri(url) {
            Some((media_type, data)) => {
                json!({ "type": "base64", "media_type": media_type, "data": data })
            }
            None => json!({ "type": "url", "url": url }),
        };
        content.push(json!({ "type": "image", "source": source }));
    }

    let mut body = json!({
        "model": model,
        "max_tokens": request.max_tokens.unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
        "messages": [{ "role": "user", "content": content }],
    });
    if let Some(system) = &request.system {
        body["system"] = json!(system);
    }
    if let Some(temperature) = request.temperature {
        body["temperature"] = json!(temperature);
    }
    body
}

fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (media_type, data) = rest.split_once(";base64,")?;
    Some((media_type, data))
}

/// Pulls the reply text out of a provider response.
pub fn extract_text(provider: AiProvider, response: &Value) -> Option<String> {
    match provider {
        AiProvider::Anthropic => {
            let parts: Vec<&str> = response
                .get("content")?
                .as_array()?
                .iter()
                .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("\n"))
            }
        }
        AiProvider::OpenAi | AiProvider::Mistral => response
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()
            .map(str::to_string),
    }
}
