//! AI-backed code and prompt generation.
//!
//! Three hosted providers are supported. Each operation is routed to the
//! provider best suited to its task and falls back to fixed templates when
//! the call fails, so callers always get an answer.

pub mod client;
pub mod fallback;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod service;

use thiserror::Error;

pub use client::{CompletionClient, CompletionRequest, HttpCompletionClient};
pub use parser::{JsonObjectParser, ParsedCode, ResponseParser, SectionParser};
pub use provider::{
    describe_error, AiProvider, AiTask, ModelKind, ProviderRegistry, ProviderStatus,
    DEFAULT_PROVIDER_ENV,
};
pub use service::{AiService, ComponentCode, ElementSuggestion, Variation, WithFallback};

#[derive(Error, Debug)]
pub enum AiError {
    #[error("{provider} API key is not configured")]
    MissingApiKey { provider: AiProvider },

    #[error("Unknown AI provider: {0}")]
    UnknownProvider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: AiProvider,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: AiProvider },

    #[error("Failed to parse AI response: {0}")]
    Parse(String),

    #[error("Credential error: {0}")]
    Secret(#[from] crate::secrets::SecretError),
}
