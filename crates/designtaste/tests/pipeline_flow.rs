//! End-to-end tests for ingestion and background analysis.
//!
//! Each test ingests captures into a temp database, waits for the worker
//! to finish and checks what was stored.

mod common;

use common::{SnapshotBuilder, TestHarness};
use designtaste::analysis::heuristics::{
    ISSUE_MARGIN, ISSUE_PADDING, ISSUE_SHARP_CORNERS, ISSUE_TYPOGRAPHY, NO_ISSUES,
};
use designtaste::broadcast::{AnalysisPhase, AnalysisStatus};
use designtaste::db::code_repo::{self, GeneratedCodeRow};
use designtaste::db::{element_repo, now_timestamp};
use designtaste::{IngestError, IngestRequest};
use serde_json::json;

/// A capture and the component type it must be classified as.
struct ClassificationCase {
    name: &'static str,
    snapshot: fn() -> SnapshotBuilder,
    expected_component: &'static str,
}

const CLASSIFICATION_CASES: &[ClassificationCase] = &[
    ClassificationCase {
        name: "nav_tag",
        snapshot: || SnapshotBuilder::new("NAV"),
        expected_component: "navigation",
    },
    ClassificationCase {
        name: "menu_text",
        snapshot: || SnapshotBuilder::new("DIV").text("Open menu"),
        expected_component: "navigation",
    },
    ClassificationCase {
        name: "hero_class",
        snapshot: || SnapshotBuilder::new("DIV").class("hero-banner"),
        expected_component: "hero",
    },
    ClassificationCase {
        name: "footer_tag",
        snapshot: || SnapshotBuilder::new("FOOTER"),
        expected_component: "footer",
    },
    ClassificationCase {
        name: "form_tag",
        snapshot: || SnapshotBuilder::new("FORM"),
        expected_component: "form",
    },
    ClassificationCase {
        name: "button_tag",
        snapshot: || SnapshotBuilder::new("BUTTON").text("Buy"),
        expected_component: "button",
    },
    ClassificationCase {
        name: "card_class",
        snapshot: || SnapshotBuilder::new("DIV").class("card-wrapper"),
        expected_component: "card",
    },
    ClassificationCase {
        name: "sidebar_tag",
        snapshot: || SnapshotBuilder::new("ASIDE"),
        expected_component: "sidebar",
    },
    ClassificationCase {
        name: "plain_div",
        snapshot: || SnapshotBuilder::new("DIV").text("Lorem ipsum"),
        expected_component: "layout",
    },
];

#[tokio::test]
async fn test_component_classification() {
    let harness = TestHarness::new();

    for case in CLASSIFICATION_CASES {
        harness
            .ingest(case.name, (case.snapshot)().build())
            .await
            .unwrap_or_else(|e| panic!("Case '{}' failed to ingest: {}", case.name, e));
    }
    harness.finish().await;

    for case in CLASSIFICATION_CASES {
        let stored = harness
            .stored(case.name)
            .unwrap_or_else(|| panic!("Case '{}' was not stored", case.name));
        assert_eq!(
            stored.element.status, "completed",
            "Case '{}': unexpected status",
            case.name
        );
        let analysis = stored
            .analysis
            .unwrap_or_else(|| panic!("Case '{}' has no analysis", case.name));
        assert_eq!(
            analysis.component_type, case.expected_component,
            "Case '{}': wrong component type",
            case.name
        );
        assert!(
            stored.inspirations.len() >= 6,
            "Case '{}': expected at least 6 inspirations, got {}",
            case.name,
            stored.inspirations.len()
        );
    }
}

#[tokio::test]
async fn test_critique_of_bare_and_polished_buttons() {
    let harness = TestHarness::new();
    harness
        .ingest("bare", SnapshotBuilder::new("BUTTON").build())
        .await
        .unwrap();
    harness
        .ingest("polished", SnapshotBuilder::polished_button().build())
        .await
        .unwrap();
    harness.finish().await;

    let bare = harness.stored("bare").unwrap().analysis.unwrap();
    assert_eq!(
        bare.design_issues,
        vec![ISSUE_PADDING, ISSUE_MARGIN, ISSUE_SHARP_CORNERS, ISSUE_TYPOGRAPHY]
    );
    assert_eq!(bare.style_characteristics, vec!["minimal"]);
    assert!((bare.confidence_score - 0.8).abs() < f64::EPSILON);

    let polished = harness.stored("polished").unwrap().analysis.unwrap();
    assert_eq!(polished.design_issues, vec![NO_ISSUES]);
    assert_eq!(polished.style_characteristics, vec!["rounded"]);
    assert_eq!(polished.recommendations.len(), 3);
}

#[tokio::test]
async fn test_inspirations_are_scored_and_sorted() {
    let harness = TestHarness::new();
    harness
        .ingest("card", SnapshotBuilder::new("ARTICLE").build())
        .await
        .unwrap();
    harness.finish().await;

    let stored = harness.stored("card").unwrap();
    assert!(stored.element.processed_at.is_some());
    assert!(stored.inspirations.len() <= 12);
    for inspiration in &stored.inspirations {
        assert!((0.0..=1.0).contains(&inspiration.similarity_score));
        assert_eq!(inspiration.category, "card");
    }
    assert!(stored
        .inspirations
        .windows(2)
        .all(|w| w[0].similarity_score >= w[1].similarity_score));
}

#[tokio::test]
async fn test_missing_fields_store_nothing() {
    let harness = TestHarness::new();

    let request = IngestRequest {
        id: Some("no-url".to_string()),
        element_data: Some(json!({ "tagName": "BUTTON" })),
        screenshot: Some("data:image/png;base64,AAAA".to_string()),
        url: None,
    };
    let err = harness.ingest_request(&request).await.unwrap_err();
    assert!(matches!(err, IngestError::MissingFields));

    harness.finish().await;
    assert!(harness.stored("no-url").is_none());
}

#[tokio::test]
async fn test_malformed_snapshot_marks_error() {
    let harness = TestHarness::new();
    harness
        .ingest("broken", json!({ "tagName": 42 }))
        .await
        .unwrap();
    harness.finish().await;

    let stored = harness.stored("broken").unwrap();
    assert_eq!(stored.element.status, "error");
    assert!(stored.element.error_message.is_some());
    assert!(stored.element.processed_at.is_some());
    assert!(stored.analysis.is_none());
    assert!(stored.inspirations.is_empty());
}

#[tokio::test]
async fn test_progress_events_for_one_element() {
    let mut harness = TestHarness::new();
    harness
        .ingest("nav", SnapshotBuilder::new("NAV").build())
        .await
        .unwrap();
    harness.finish().await;

    let events = harness.drain_events();
    assert!(events.iter().all(|e| e.element_id == "nav"));

    let phases: Vec<AnalysisPhase> = events.iter().map(|e| e.phase).collect();
    let position = |phase: AnalysisPhase| {
        phases
            .iter()
            .position(|p| *p == phase)
            .unwrap_or_else(|| panic!("Phase {:?} was not reported", phase))
    };
    assert_eq!(position(AnalysisPhase::Queued), 0);
    assert!(position(AnalysisPhase::Loading) < position(AnalysisPhase::Critiquing));
    assert!(
        position(AnalysisPhase::Critiquing) < position(AnalysisPhase::SearchingInspiration)
    );
    assert!(
        position(AnalysisPhase::SearchingInspiration)
            < position(AnalysisPhase::StoringInspiration)
    );

    let last = events.last().unwrap();
    assert_eq!(last.phase, AnalysisPhase::Completed);
    assert_eq!(last.status, AnalysisStatus::Completed);
    assert_eq!(last.component_type.as_deref(), Some("navigation"));
    assert!(last.inspirations_count.unwrap_or_default() >= 6);
}

#[tokio::test]
async fn test_clearing_queue_cascades() {
    let harness = TestHarness::new();
    for id in ["a", "b", "c"] {
        harness
            .ingest(id, SnapshotBuilder::new("BUTTON").build())
            .await
            .unwrap();
    }
    harness.finish().await;

    let counts = element_repo::status_counts(&harness.db).unwrap();
    assert_eq!(counts.completed, 3);

    code_repo::insert(
        &harness.db,
        &GeneratedCodeRow {
            id: "code-a".to_string(),
            element_id: "a".to_string(),
            framework: "nextjs".to_string(),
            code: "export function ImprovedButton() {}".to_string(),
            description: "Improved button".to_string(),
            improvements: vec!["Rounded corners".to_string()],
            created_at: now_timestamp(),
        },
    )
    .unwrap();
    assert_eq!(code_repo::count(&harness.db).unwrap(), 1);

    let removed = element_repo::delete_all(&harness.db).unwrap();
    assert_eq!(removed, 3);
    for id in ["a", "b", "c"] {
        assert!(harness.stored(id).is_none());
    }
    assert_eq!(designtaste::db::analysis_repo::count(&harness.db).unwrap(), 0);
    assert_eq!(
        designtaste::db::inspiration_repo::count(&harness.db).unwrap(),
        0
    );
    assert_eq!(code_repo::count(&harness.db).unwrap(), 0);
}

#[tokio::test]
async fn test_database_survives_reopen() {
    let harness = TestHarness::new();
    harness
        .ingest("kept", SnapshotBuilder::new("FOOTER").build())
        .await
        .unwrap();
    harness.finish().await;

    let reopened = designtaste::Database::open(&harness.db_path).unwrap();
    let row = element_repo::find_by_id(&reopened, "kept").unwrap().unwrap();
    assert_eq!(row.status, "completed");
    assert_eq!(row.source_url, "https://example.com/pricing");
}
