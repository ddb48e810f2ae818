//! Design inspiration search.
//!
//! Several sources are queried concurrently for a component type and a set
//! of keywords. Results get a jittered similarity score, thin result sets are
//! padded with curated examples, and the best twelve are returned.

pub mod curated;
pub mod search;
pub mod sources;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use search::{rank_results, InspirationSearch, MAX_RESULTS, MIN_RESULTS};
pub use sources::{default_sources, TemplateSource};

#[derive(Error, Debug)]
pub enum InspirationError {
    #[error("Inspiration source '{source_name}' failed: {reason}")]
    Source { source_name: String, reason: String },
}

/// A single inspiration result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspiration {
    pub title: String,
    pub image_url: String,
    pub source: String,
    pub tags: Vec<String>,
    pub similarity_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link back to the site the inspiration came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// A provider of inspiration results.
#[async_trait]
pub trait InspirationSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(
        &self,
        component: &str,
        keywords: &[String],
    ) -> Result<Vec<Inspiration>, InspirationError>;
}

/// Upper-cases the first character.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Unsplash image URL for a photo id.
pub(crate) fn unsplash_url(photo: &str) -> String {
    format!(
        "https://images.unsplash.com/{}?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80",
        photo
    )
}
