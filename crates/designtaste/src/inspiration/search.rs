use std::collections::HashSet;

use futures_util::future::join_all;
use rand::Rng;

use super::curated::{curated_examples, extra_examples};
use super::sources::default_sources;
use super::{Inspiration, InspirationSource};

/// Result sets smaller than this are padded with curated examples.
pub const MIN_RESULTS: usize = 6;
/// Maximum number of results returned.
pub const MAX_RESULTS: usize = 12;
/// Source scores are moved by up to this amount in either direction.
pub const SCORE_JITTER: f64 = 0.1;

/// Queries every source concurrently and ranks the combined results.
pub struct InspirationSearch {
    sources: Vec<Box<dyn InspirationSource>>,
}

impl Default for InspirationSearch {
    fn default() -> Self {
        Self::new(default_sources())
    }
}

impl InspirationSearch {
    pub fn new(sources: Vec<Box<dyn InspirationSource>>) -> Self {
        Self { sources }
    }

    /// Collects results from all sources. Failed sources are logged and skipped.
    pub async fn gather(&self, component: &str, keywords: &[String]) -> Vec<Inspiration> {
        let results = join_all(self.sources.iter().map(|s| s.fetch(component, keywords))).await;

        let mut found = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(entries) => found.extend(entries),
                Err(e) => log::warn!("Inspiration source {} skipped: {}", source.name(), e),
            }
        }
        found
    }

    pub async fn search(&self, component: &str, keywords: &[String]) -> Vec<Inspiration> {
        let found = self.gather(component, keywords).await;
        let mut rng = rand::thread_rng();
        rank_results(found, component, &mut rng)
    }
}

/// Jitters source scores, pads thin results with curated examples, sorts by
/// score descending and keeps the top [`MAX_RESULTS`].
pub fn rank_results<R: Rng + ?Sized>(
    found: Vec<Inspiration>,
    component: &str,
    rng: &mut R,
) -> Vec<Inspiration> {
    let mut results: Vec<Inspiration> = found
        .into_iter()
        .map(|mut entry| {
            let jitter = rng.gen_range(-SCORE_JITTER..=SCORE_JITTER);
            entry.similarity_score = (entry.similarity_score + jitter).clamp(0.0, 1.0);
            entry
        })
        .collect();

    if results.len() < MIN_RESULTS {
        results.extend(curated_examples(component));

        let mut titles: HashSet<String> = results.iter().map(|r| r.title.clone()).collect();
        for extra in extra_examples(component) {
            if results.len() >= MIN_RESULTS {
                break;
            }
            if titles.insert(extra.title.clone()) {
                results.push(extra);
            }
        }
    }

    results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    results.truncate(MAX_RESULTS);
    results
}
