use std::sync::Arc;

use tracing::{info_span, Instrument};

use crate::analysis::{critique, search_keywords, Critique, CONFIDENCE_SCORE};
use crate::broadcast::AnalysisPhase;
use crate::db::analysis_repo::{self, NewAnalysis};
use crate::db::inspiration_repo::{self, InspirationRow};
use crate::db::{element_repo, now_timestamp, Database};
use crate::element::ElementSnapshot;
use crate::inspiration::{Inspiration, InspirationSearch};

use super::error::IngestError;
use super::progress::{ProgressEvent, ProgressReporter};

/// What a successful analysis produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub component_type: String,
    pub analysis_id: i64,
    pub inspirations_stored: usize,
}

/// Runs the heuristic analysis chain for stored elements.
pub struct Analyzer {
    db: Database,
    search: Arc<InspirationSearch>,
}

impl Analyzer {
    pub fn new(db: Database, search: Arc<InspirationSearch>) -> Self {
        Self { db, search }
    }

    /// Analyses one element and records the result on its row.
    ///
    /// Errors are written to the element (`status = error`) and reported as
    /// a failed progress event; they are never retried.
    pub async fn process(
        &self,
        element_id: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<AnalysisOutcome, IngestError> {
        let span = info_span!("analysis", element_id = %element_id);
        let result = self.run(element_id, progress).instrument(span).await;

        let processed_at = now_timestamp();
        match &result {
            Ok(outcome) => {
                if !element_repo::mark_completed(&self.db, element_id, &processed_at)? {
                    log::warn!("Element {} was no longer processing", element_id);
                }
                log::info!(
                    "Element {} analysed as {} with {} inspirations",
                    element_id,
                    outcome.component_type,
                    outcome.inspirations_stored
                );
                progress.report(ProgressEvent::Completed {
                    component_type: outcome.component_type.clone(),
                    inspirations_count: outcome.inspirations_stored,
                });
            }
            Err(e) => {
                let message = e.to_string();
                log::error!("Processing error for element {}: {}", element_id, message);
                if let Err(db_err) =
                    element_repo::mark_error(&self.db, element_id, &message, &processed_at)
                {
                    log::error!("Failed to record error for {}: {}", element_id, db_err);
                }
                progress.report(ProgressEvent::Failed { error: message });
            }
        }

        result
    }

    async fn run(
        &self,
        element_id: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<AnalysisOutcome, IngestError> {
        // Step 1: Load element
        let snapshot = {
            let _step = info_span!("load_element").entered();
            progress.report(ProgressEvent::Phase {
                phase: AnalysisPhase::Loading,
                message: "Loading element...".to_string(),
            });
            let row = element_repo::find_by_id(&self.db, element_id)?
                .ok_or(IngestError::NotFound)?;
            ElementSnapshot::from_json(&row.element_json())?
        };

        // Step 2: Critique
        let critique = {
            let _step = info_span!("critique").entered();
            progress.report(ProgressEvent::Phase {
                phase: AnalysisPhase::Critiquing,
                message: "Critiquing design...".to_string(),
            });
            let critique = critique(&snapshot);
            progress.report(ProgressEvent::Classified {
                component_type: critique.component_type.to_string(),
            });
            critique
        };

        // Step 3: Store analysis
        let analysis_id = {
            let _step = info_span!("store_analysis").entered();
            self.store_analysis(element_id, &critique)?
        };

        // Step 4: Search inspiration
        let component = critique.component_type.as_str();
        progress.report(ProgressEvent::Phase {
            phase: AnalysisPhase::SearchingInspiration,
            message: format!("Searching {} inspiration...", component),
        });
        let keywords = search_keywords(
            component,
            snapshot.user_prompt.as_deref().unwrap_or_default(),
            &critique.style_characteristics,
        );
        let results = self
            .search
            .search(component, &keywords)
            .instrument(info_span!("search_inspiration", component = %component))
            .await;

        // Step 5: Store inspiration
        let inspirations_stored = {
            let _step = info_span!("store_inspiration").entered();
            progress.report(ProgressEvent::Phase {
                phase: AnalysisPhase::StoringInspiration,
                message: format!("Storing {} inspirations...", results.len()),
            });
            self.store_inspirations(element_id, component, results)
        };

        Ok(AnalysisOutcome {
            component_type: component.to_string(),
            analysis_id,
            inspirations_stored,
        })
    }

    fn store_analysis(&self, element_id: &str, critique: &Critique) -> Result<i64, IngestError> {
        let id = analysis_repo::insert(
            &self.db,
            &NewAnalysis {
                element_id: element_id.to_string(),
                component_type: critique.component_type.to_string(),
                design_issues: critique.design_issues.clone(),
                style_characteristics: critique.style_characteristics.clone(),
                recommendations: critique.recommendations.clone(),
                confidence_score: CONFIDENCE_SCORE,
                created_at: now_timestamp(),
            },
        )?;
        Ok(id)
    }

    /// Inserts each result; rows that fail are logged and skipped.
    fn store_inspirations(
        &self,
        element_id: &str,
        component: &str,
        results: Vec<Inspiration>,
    ) -> usize {
        let mut stored = 0;
        for inspiration in results {
            let row = InspirationRow {
                id: uuid::Uuid::new_v4().to_string(),
                element_id: element_id.to_string(),
                title: inspiration.title,
                image_url: inspiration.image_url,
                source: inspiration.source,
                category: component.to_string(),
                tags: inspiration.tags,
                similarity_score: inspiration.similarity_score,
                description: inspiration.description,
                source_url: inspiration.source_url,
                created_at: now_timestamp(),
            };
            match inspiration_repo::insert(&self.db, &row) {
                Ok(()) => stored += 1,
                Err(e) => log::warn!("Failed to store inspiration '{}': {}", row.title, e),
            }
        }
        stored
    }
}
