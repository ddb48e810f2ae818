//! Local queue tests against a mock ingestion backend.
//!
//! Jobs are persisted to a JSON file in a temp directory and submitted over
//! HTTP, so these cover storage, the client and the drain policy together.

use std::sync::Arc;
use std::time::Duration;

use designtaste::queue::{HttpIngestClient, JobStatus, JsonFileStorage, LocalQueue};
use designtaste::queue::client::INGEST_PATH;
use designtaste::ElementSnapshot;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE_URL: &str = "http://localhost:3000";

fn element(tag: &str) -> ElementSnapshot {
    ElementSnapshot {
        tag_name: tag.to_string(),
        text_content: format!("{} text", tag.to_lowercase()),
        ..Default::default()
    }
}

async fn backend(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INGEST_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "success": status == 200 })))
        .mount(&server)
        .await;
    server
}

fn local_queue(dir: &TempDir, server: &MockServer) -> LocalQueue {
    let storage = Arc::new(JsonFileStorage::new(dir.path().join("queue.json")));
    let client = Arc::new(HttpIngestClient::new(&server.uri()).unwrap());
    LocalQueue::new(storage, client, BASE_URL).with_retry_delay(Duration::from_millis(10))
}

async fn submitted_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_drain_submits_at_most_three() {
    let dir = TempDir::new().unwrap();
    let server = backend(200).await;
    let queue = local_queue(&dir, &server);

    for i in 0..5 {
        queue
            .enqueue(element("BUTTON"), format!("shot-{}", i), "https://example.com".to_string(), 1)
            .await
            .unwrap();
    }
    assert_eq!(queue.queued_count().await, 5);

    let first = queue.drain().await.unwrap();
    assert_eq!(first.submitted, 3);
    assert_eq!(first.remaining, 2);
    assert_eq!(submitted_bodies(&server).await.len(), 3);

    let second = queue.drain().await.unwrap();
    assert_eq!(second.submitted, 2);
    assert_eq!(second.remaining, 0);
    assert!(!queue.is_draining().await);

    let bodies = submitted_bodies(&server).await;
    assert_eq!(bodies.len(), 5);
    for body in &bodies {
        assert!(body["id"].as_str().unwrap().starts_with("element_"));
        assert_eq!(body["elementData"]["tagName"], "BUTTON");
        assert_eq!(body["url"], "https://example.com");
    }
    assert!(queue
        .jobs()
        .await
        .iter()
        .all(|j| j.status == JobStatus::Completed));
}

#[tokio::test]
async fn test_inspiration_requests_go_first() {
    let dir = TempDir::new().unwrap();
    let server = backend(200).await;
    let queue = local_queue(&dir, &server).with_concurrency(1);

    queue
        .enqueue(element("DIV"), "viewport".to_string(), "https://example.com".to_string(), 1)
        .await
        .unwrap();
    let inspiration_id = queue
        .enqueue_inspiration(
            element("BUTTON"),
            "glassmorphism buttons",
            Some("data:image/png;base64,AAAA".to_string()),
            "viewport".to_string(),
            "https://example.com".to_string(),
        )
        .await
        .unwrap();
    assert!(inspiration_id.starts_with("inspiration_"));

    let report = queue.drain().await.unwrap();
    assert_eq!(report.submitted, 1);
    assert_eq!(report.remaining, 1);

    let bodies = submitted_bodies(&server).await;
    assert_eq!(bodies[0]["id"], inspiration_id.as_str());
    assert_eq!(bodies[0]["elementData"]["userPrompt"], "glassmorphism buttons");
    assert_eq!(bodies[0]["elementData"]["requestType"], "inspiration");
}

#[tokio::test]
async fn test_rejected_jobs_are_terminal_and_persisted() {
    let dir = TempDir::new().unwrap();
    let server = backend(500).await;
    let queue = local_queue(&dir, &server);

    let id = queue
        .enqueue(element("FORM"), "shot".to_string(), "https://example.com".to_string(), 1)
        .await
        .unwrap();
    queue.drain_until_idle().await.unwrap();

    let jobs = queue.jobs().await;
    assert_eq!(jobs[0].status, JobStatus::Error);
    assert_eq!(jobs[0].error_message.as_deref(), Some("API request failed: 500"));

    // Nothing queued, so no retry
    assert_eq!(queue.drain().await.unwrap().submitted, 0);
    assert_eq!(submitted_bodies(&server).await.len(), 1);

    let reloaded = local_queue(&dir, &server);
    assert_eq!(reloaded.load().await.unwrap(), 1);
    let job = reloaded.jobs().await.remove(0);
    assert_eq!(job.id, id);
    assert_eq!(job.status, JobStatus::Error);

    let raw: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("queue.json")).unwrap())
            .unwrap();
    assert_eq!(raw["processingQueue"][0]["status"], "error");
}

#[tokio::test]
async fn test_drain_until_idle_empties_queue() {
    let dir = TempDir::new().unwrap();
    let server = backend(200).await;
    let queue = local_queue(&dir, &server);

    for tag in ["NAV", "HEADER", "FOOTER", "FORM", "BUTTON", "ARTICLE", "ASIDE"] {
        queue
            .enqueue(element(tag), "shot".to_string(), "https://example.com".to_string(), 1)
            .await
            .unwrap();
    }
    queue.drain_until_idle().await.unwrap();

    assert_eq!(queue.queued_count().await, 0);
    assert_eq!(submitted_bodies(&server).await.len(), 7);
}

#[tokio::test]
async fn test_process_now_bypasses_drain() {
    let dir = TempDir::new().unwrap();
    let server = backend(200).await;
    let queue = local_queue(&dir, &server);

    queue
        .enqueue(element("DIV"), "shot".to_string(), "https://example.com".to_string(), 1)
        .await
        .unwrap();
    let dashboard = queue
        .process_now(element("NAV"), "shot".to_string(), "https://example.com".to_string())
        .await
        .unwrap();

    let jobs = queue.jobs().await;
    assert_eq!(jobs[0].status, JobStatus::Processing);
    assert_eq!(jobs[0].priority, 10);
    assert_eq!(
        dashboard,
        format!("{}/dashboard?elementId={}", BASE_URL, jobs[0].id)
    );

    let report = queue.drain().await.unwrap();
    assert_eq!(report.submitted, 1);
    let bodies = submitted_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["elementData"]["tagName"], "DIV");
}

#[tokio::test]
async fn test_clear_empties_storage() {
    let dir = TempDir::new().unwrap();
    let server = backend(200).await;
    let queue = local_queue(&dir, &server);

    queue
        .enqueue(element("DIV"), "shot".to_string(), "https://example.com".to_string(), 1)
        .await
        .unwrap();
    queue.clear().await.unwrap();

    let reloaded = local_queue(&dir, &server);
    assert_eq!(reloaded.load().await.unwrap(), 0);
}
