//! Provider catalogue and task routing.
//!
//! Every AI call names an [`AiTask`]. The registry routes it to the task's
//! preferred provider when that provider has a usable API key, otherwise to
//! the first provider that has one, otherwise to the default provider (the
//! call will then fail and the caller falls back to templates).

use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::AiError;
use crate::config::AiConfig;
use crate::secrets::resolve_api_key;

/// Environment variable that overrides the default provider.
pub const DEFAULT_PROVIDER_ENV: &str = "DEFAULT_AI_PROVIDER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Mistral,
}

/// Which of a provider's models a request should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Text,
    Vision,
    Fast,
}

impl AiProvider {
    /// Declaration order; also the order used when falling back.
    pub const ALL: [AiProvider; 3] = [AiProvider::OpenAi, AiProvider::Anthropic, AiProvider::Mistral];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Anthropic => "anthropic",
            AiProvider::Mistral => "mistral",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "OpenAI",
            AiProvider::Anthropic => "Anthropic Claude",
            AiProvider::Mistral => "Mistral AI",
        }
    }

    pub fn model(&self, kind: ModelKind) -> &'static str {
        match (self, kind) {
            (AiProvider::OpenAi, ModelKind::Text) => "gpt-4-turbo-preview",
            (AiProvider::OpenAi, ModelKind::Vision) => "gpt-4-vision-preview",
            (AiProvider::OpenAi, ModelKind::Fast) => "gpt-3.5-turbo",
            (AiProvider::Anthropic, ModelKind::Text | ModelKind::Vision) => {
                "claude-3-5-sonnet-20241022"
            }
            (AiProvider::Anthropic, ModelKind::Fast) => "claude-3-haiku-20240307",
            (AiProvider::Mistral, ModelKind::Text) => "mistral-large-latest",
            (AiProvider::Mistral, ModelKind::Vision) => "pixtral-12b-2409",
            (AiProvider::Mistral, ModelKind::Fast) => "mistral-small-latest",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "OPENAI_API_KEY",
            AiProvider::Anthropic => "ANTHROPIC_API_KEY",
            AiProvider::Mistral => "MISTRAL_API_KEY",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "https://api.openai.com/v1/chat/completions",
            AiProvider::Anthropic => "https://api.anthropic.com/v1/messages",
            AiProvider::Mistral => "https://api.mistral.ai/v1/chat/completions",
        }
    }

    pub fn supports_vision(&self) -> bool {
        true
    }

    pub fn supports_json_mode(&self) -> bool {
        true
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "anthropic" => Ok(AiProvider::Anthropic),
            "mistral" => Ok(AiProvider::Mistral),
            other => Err(AiError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTask {
    UiAnalysis,
    CodeGeneration,
    PromptGeneration,
    ImageAnalysis,
    CodeImprovement,
}

impl AiTask {
    pub fn preferred_provider(&self) -> AiProvider {
        match self {
            AiTask::UiAnalysis => AiProvider::Mistral,
            AiTask::CodeGeneration => AiProvider::Anthropic,
            AiTask::PromptGeneration => AiProvider::OpenAi,
            AiTask::ImageAnalysis => AiProvider::Mistral,
            AiTask::CodeImprovement => AiProvider::Anthropic,
        }
    }
}

impl fmt::Display for AiTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AiTask::UiAnalysis => "UI_ANALYSIS",
            AiTask::CodeGeneration => "CODE_GENERATION",
            AiTask::PromptGeneration => "PROMPT_GENERATION",
            AiTask::ImageAnalysis => "IMAGE_ANALYSIS",
            AiTask::CodeImprovement => "CODE_IMPROVEMENT",
        };
        f.write_str(name)
    }
}

/// Capability and credential status of one provider, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub id: AiProvider,
    pub name: String,
    pub supports_vision: bool,
    #[serde(rename = "supportsJSONMode")]
    pub supports_json_mode: bool,
    pub has_api_key: bool,
}

struct ProviderEntry {
    provider: AiProvider,
    api_key: Option<SecretString>,
    endpoint: String,
}

/// Credentials and endpoints for every provider.
pub struct ProviderRegistry {
    entries: Vec<ProviderEntry>,
    default_provider: AiProvider,
}

impl ProviderRegistry {
    /// A registry with no credentials and default endpoints.
    pub fn new(default_provider: AiProvider) -> Self {
        Self {
            entries: AiProvider::ALL
                .iter()
                .map(|&provider| ProviderEntry {
                    provider,
                    api_key: None,
                    endpoint: provider.default_endpoint().to_string(),
                })
                .collect(),
            default_provider,
        }
    }

    /// Resolves each provider's key from its configured file or environment
    /// variable. `DEFAULT_AI_PROVIDER` takes precedence over the configured
    /// default; unknown values are ignored.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let default_provider = std::env::var(DEFAULT_PROVIDER_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .or(config.default_provider)
            .unwrap_or(AiProvider::OpenAi);

        let mut registry = Self::new(default_provider);
        for entry in &mut registry.entries {
            let settings = config.providers.get(entry.provider);
            let env_var = settings
                .api_key_env
                .as_deref()
                .unwrap_or(entry.provider.api_key_env());
            entry.api_key = resolve_api_key(None, settings.api_key_file.as_deref(), Some(env_var))?;
            if let Some(url) = &settings.base_url {
                entry.endpoint = url.clone();
            }
            log::debug!(
                "AI provider {}: api key {}",
                entry.provider,
                if entry.api_key.is_some() { "configured" } else { "missing" }
            );
        }
        Ok(registry)
    }

    pub fn with_api_key(mut self, provider: AiProvider, key: &str) -> Self {
        if let Some(entry) = self.entry_mut(provider) {
            entry.api_key = resolve_api_key(Some(key), None, None).ok().flatten();
        }
        self
    }

    pub fn with_endpoint(mut self, provider: AiProvider, endpoint: impl Into<String>) -> Self {
        if let Some(entry) = self.entry_mut(provider) {
            entry.endpoint = endpoint.into();
        }
        self
    }

    fn entry(&self, provider: AiProvider) -> Option<&ProviderEntry> {
        self.entries.iter().find(|e| e.provider == provider)
    }

    fn entry_mut(&mut self, provider: AiProvider) -> Option<&mut ProviderEntry> {
        self.entries.iter_mut().find(|e| e.provider == provider)
    }

    pub fn api_key(&self, provider: AiProvider) -> Option<&SecretString> {
        self.entry(provider).and_then(|e| e.api_key.as_ref())
    }

    pub fn has_api_key(&self, provider: AiProvider) -> bool {
        self.api_key(provider).is_some()
    }

    pub fn endpoint(&self, provider: AiProvider) -> &str {
        self.entry(provider)
            .map(|e| e.endpoint.as_str())
            .unwrap_or(provider.default_endpoint())
    }

    /// The provider reported as current to clients.
    pub fn current_provider(&self) -> AiProvider {
        self.default_provider
    }

    /// Picks the provider for a task.
    pub fn select(&self, task: AiTask) -> AiProvider {
        let preferred = task.preferred_provider();
        if self.has_api_key(preferred) {
            return preferred;
        }

        if let Some(available) = self.configured().first() {
            log::warn!(
                "Recommended provider {} not available for {}. Using {}",
                preferred,
                task,
                available
            );
            return *available;
        }

        log::warn!(
            "No AI providers available for {}. Using {} as fallback.",
            task,
            self.default_provider.display_name()
        );
        self.default_provider
    }

    /// Providers with a usable key, in declaration order.
    pub fn configured(&self) -> Vec<AiProvider> {
        self.entries
            .iter()
            .filter(|e| e.api_key.is_some())
            .map(|e| e.provider)
            .collect()
    }

    pub fn providers(&self) -> Vec<ProviderStatus> {
        self.entries
            .iter()
            .map(|e| ProviderStatus {
                id: e.provider,
                name: e.provider.display_name().to_string(),
                supports_vision: e.provider.supports_vision(),
                supports_json_mode: e.provider.supports_json_mode(),
                has_api_key: e.api_key.is_some(),
            })
            .collect()
    }

    pub fn recommendation(&self) -> String {
        let configured = self.configured();
        match configured.as_slice() {
            [] => "No AI providers are configured. Please add API keys to your environment variables."
                .to_string(),
            [only] => format!(
                "Using {}. Consider adding additional providers for redundancy.",
                only.display_name()
            ),
            _ if configured.contains(&AiProvider::Anthropic) => {
                "Anthropic Claude is recommended for best code generation quality.".to_string()
            }
            _ if configured.contains(&AiProvider::OpenAi) => {
                "OpenAI GPT-4 provides excellent vision and code generation capabilities."
                    .to_string()
            }
            _ if configured.contains(&AiProvider::Mistral) => {
                "Mistral provides good performance for code generation tasks.".to_string()
            }
            _ => "Multiple providers available - consider testing to find your preference."
                .to_string(),
        }
    }
}

/// User-facing summary of a provider failure.
pub fn describe_error(provider: AiProvider, error: &AiError) -> String {
    let name = provider.display_name();
    let message = error.to_string();

    let bad_key = matches!(error, AiError::MissingApiKey { .. })
        || matches!(error, AiError::Api { status: 401 | 403, .. })
        || message.contains("API key");
    let rate_limited =
        matches!(error, AiError::Api { status: 429, .. }) || message.contains("rate limit");
    let model_missing = message.contains("model not found");

    if bad_key {
        format!("{name} API key is invalid or missing. Please check your environment variables.")
    } else if rate_limited {
        format!("{name} rate limit exceeded. Please try again later.")
    } else if model_missing {
        format!("{name} model not available. The service may be experiencing issues.")
    } else {
        format!("{name} request failed: {message}")
    }
}
