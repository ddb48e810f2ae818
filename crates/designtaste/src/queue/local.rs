use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::element::{ElementSnapshot, RequestType};

use super::{
    HttpIngestClient, IngestClient, JobStatus, JsonFileStorage, MemoryStorage, QueueError,
    QueueStorage, QueuedJob, PRIORITY_IMMEDIATE, PRIORITY_INSPIRATION,
};

/// Maximum jobs submitted by one drain.
pub const DEFAULT_CONCURRENCY: usize = 3;
/// Pause between drains while queued jobs remain.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Everything the queue owns.
#[derive(Debug, Default)]
pub struct QueueState {
    pub jobs: Vec<QueuedJob>,
    pub draining: bool,
}

/// Outcome of one drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Jobs submitted by this drain.
    pub submitted: usize,
    /// Jobs still `queued` afterwards.
    pub remaining: usize,
}

/// Local processing queue. State changes are persisted while the state lock
/// is held, so saves never interleave.
pub struct LocalQueue {
    state: Mutex<QueueState>,
    storage: Arc<dyn QueueStorage>,
    client: Arc<dyn IngestClient>,
    base_url: String,
    concurrency: usize,
    retry_delay: Duration,
}

impl LocalQueue {
    pub fn new(
        storage: Arc<dyn QueueStorage>,
        client: Arc<dyn IngestClient>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            storage,
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Queue submitting to `server.public_url`, persisted at
    /// `queue.storage_path` or kept in memory when none is configured.
    pub fn from_config(config: &Config) -> Result<Self, QueueError> {
        let storage: Arc<dyn QueueStorage> = match config.queue.resolved_storage_path() {
            Some(path) => Arc::new(JsonFileStorage::new(path)),
            None => Arc::new(MemoryStorage::new()),
        };
        let client = Arc::new(HttpIngestClient::new(&config.server.public_url)?);

        Ok(Self::new(storage, client, config.server.public_url.as_str())
            .with_concurrency(config.queue.concurrency)
            .with_retry_delay(config.queue.retry_delay()))
    }

    /// Restores the persisted list, replacing the in-memory one.
    pub async fn load(&self) -> Result<usize, QueueError> {
        let jobs = self.storage.load().await?;
        let mut state = self.state.lock().await;
        state.jobs = jobs;
        log::info!("Loaded {} queued elements", state.jobs.len());
        Ok(state.jobs.len())
    }

    async fn persist(&self, state: &QueueState) -> Result<(), QueueError> {
        self.storage.save(&state.jobs).await
    }

    /// Appends a capture with status `queued` and returns its id.
    pub async fn enqueue(
        &self,
        element: ElementSnapshot,
        screenshot: String,
        url: String,
        priority: i64,
    ) -> Result<String, QueueError> {
        let job = QueuedJob::new("element", element, screenshot, url, priority, JobStatus::Queued);
        let id = job.id.clone();

        let mut state = self.state.lock().await;
        state.jobs.push(job);
        self.persist(&state).await?;
        log::info!("Element added to queue. {} total.", state.jobs.len());
        Ok(id)
    }

    /// Appends an inspiration request. The element screenshot is stored on the
    /// snapshot; the viewport screenshot goes with the job for context.
    pub async fn enqueue_inspiration(
        &self,
        mut element: ElementSnapshot,
        prompt: &str,
        element_screenshot: Option<String>,
        viewport_screenshot: String,
        url: String,
    ) -> Result<String, QueueError> {
        element.user_prompt = Some(prompt.to_string());
        element.request_type = Some(RequestType::Inspiration);
        element.element_screenshot = element_screenshot.filter(|s| !s.is_empty());

        let job = QueuedJob::new(
            "inspiration",
            element,
            viewport_screenshot,
            url,
            PRIORITY_INSPIRATION,
            JobStatus::Queued,
        );
        let id = job.id.clone();

        let mut state = self.state.lock().await;
        state.jobs.push(job);
        self.persist(&state).await?;
        log::info!("Added \"{}\" to inspiration queue", prompt);
        Ok(id)
    }

    /// Puts a capture at the front of the list as `processing` and returns the
    /// dashboard URL that shows it. Drains never submit it.
    pub async fn process_now(
        &self,
        element: ElementSnapshot,
        screenshot: String,
        url: String,
    ) -> Result<String, QueueError> {
        let job = QueuedJob::new(
            "element",
            element,
            screenshot,
            url,
            PRIORITY_IMMEDIATE,
            JobStatus::Processing,
        );
        let dashboard = self.dashboard_url(&job.id);

        let mut state = self.state.lock().await;
        state.jobs.insert(0, job);
        self.persist(&state).await?;
        Ok(dashboard)
    }

    pub fn dashboard_url(&self, id: &str) -> String {
        format!("{}/dashboard?elementId={}", self.base_url, id)
    }

    /// Submits up to `concurrency` queued jobs, highest priority first, and
    /// waits for all of them. Returns immediately if a drain is running.
    pub async fn drain(&self) -> Result<DrainReport, QueueError> {
        let ids: Vec<String> = {
            let mut state = self.state.lock().await;
            if state.draining {
                return Ok(DrainReport {
                    submitted: 0,
                    remaining: queued_in(&state),
                });
            }
            if queued_in(&state) == 0 {
                return Ok(DrainReport {
                    submitted: 0,
                    remaining: 0,
                });
            }
            state.draining = true;
            // Stable sort: equal priorities keep insertion order.
            state.jobs.sort_by(|a, b| b.priority.cmp(&a.priority));
            state
                .jobs
                .iter()
                .filter(|j| j.status == JobStatus::Queued)
                .take(self.concurrency)
                .map(|j| j.id.clone())
                .collect()
        };

        let results = join_all(ids.iter().map(|id| self.process_one(id))).await;
        for (id, result) in ids.iter().zip(results) {
            if let Err(e) = result {
                log::warn!("Failed to process queued element {}: {}", id, e);
            }
        }

        let mut state = self.state.lock().await;
        state.draining = false;
        Ok(DrainReport {
            submitted: ids.len(),
            remaining: queued_in(&state),
        })
    }

    /// Drains repeatedly, pausing between rounds, until nothing is queued.
    pub async fn drain_until_idle(&self) -> Result<(), QueueError> {
        loop {
            let report = self.drain().await?;
            if report.remaining == 0 {
                return Ok(());
            }
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    /// Submits one queued job and records the outcome. Submission failures
    /// are terminal for the job and are not retried.
    pub async fn process_one(&self, id: &str) -> Result<JobStatus, QueueError> {
        let payload = {
            let mut state = self.state.lock().await;
            let job = find_mut(&mut state, id)?;
            job.transition(JobStatus::Processing)?;
            let payload = job.payload()?;
            self.persist(&state).await?;
            payload
        };

        let outcome = self.client.submit(&payload).await;

        let mut state = self.state.lock().await;
        let job = find_mut(&mut state, id)?;
        let tag = job.element_data.tag_name.clone();
        match outcome {
            Ok(()) => {
                job.transition(JobStatus::Completed)?;
                log::info!("Analysis complete for {}", tag);
            }
            Err(e) => {
                job.transition(JobStatus::Error)?;
                job.error_message = Some(e.to_string());
                log::error!("Failed to process {}: {}", tag, e);
            }
        }
        let status = job.status;
        self.persist(&state).await?;
        Ok(status)
    }

    /// Empties the queue.
    pub async fn clear(&self) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;
        state.jobs.clear();
        self.persist(&state).await?;
        log::info!("Queue cleared");
        Ok(())
    }

    /// Number of `queued` jobs, shown as the badge count.
    pub async fn queued_count(&self) -> usize {
        queued_in(&*self.state.lock().await)
    }

    pub async fn jobs(&self) -> Vec<QueuedJob> {
        self.state.lock().await.jobs.clone()
    }

    pub async fn is_draining(&self) -> bool {
        self.state.lock().await.draining
    }
}

fn queued_in(state: &QueueState) -> usize {
    state
        .jobs
        .iter()
        .filter(|j| j.status == JobStatus::Queued)
        .count()
}

fn find_mut<'a>(state: &'a mut QueueState, id: &str) -> Result<&'a mut QueuedJob, QueueError> {
    state
        .jobs
        .iter_mut()
        .find(|j| j.id == id)
        .ok_or_else(|| QueueError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{IngestPayload, MemoryStorage, PRIORITY_NORMAL};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records concurrency and rejects elements whose tag is `fail_tag`.
    #[derive(Default)]
    struct RecordingClient {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: std::sync::Mutex<Vec<String>>,
        fail_tag: Option<String>,
    }

    #[async_trait]
    impl IngestClient for RecordingClient {
        async fn submit(&self, payload: &IngestPayload) -> Result<(), QueueError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(payload.id.clone());

            if self.fail_tag.as_deref() == payload.element_data["tagName"].as_str() {
                return Err(QueueError::Rejected { status: 500 });
            }
            Ok(())
        }
    }

    fn snapshot(tag: &str) -> ElementSnapshot {
        ElementSnapshot {
            tag_name: tag.to_string(),
            ..Default::default()
        }
    }

    fn queue(client: Arc<RecordingClient>) -> (LocalQueue, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let queue = LocalQueue::new(storage.clone(), client, "http://localhost:3000/")
            .with_retry_delay(Duration::from_millis(5));
        (queue, storage)
    }

    async fn add(queue: &LocalQueue, tag: &str, priority: i64) -> String {
        queue
            .enqueue(snapshot(tag), String::new(), "https://example.com".to_string(), priority)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_enqueue_persists() {
        let (queue, storage) = queue(Arc::new(RecordingClient::default()));
        let id = add(&queue, "DIV", PRIORITY_NORMAL).await;

        assert!(id.starts_with("element_"));
        assert_eq!(queue.queued_count().await, 1);
        assert_eq!(storage.snapshot().len(), 1);
        assert_eq!(storage.snapshot()[0].status, JobStatus::Queued);
    }

    #[tokio::test]
    async fn test_drain_takes_at_most_three() {
        let client = Arc::new(RecordingClient::default());
        let (queue, _) = queue(client.clone());
        for _ in 0..10 {
            add(&queue, "DIV", PRIORITY_NORMAL).await;
        }

        let report = queue.drain().await.unwrap();
        assert_eq!(report, DrainReport { submitted: 3, remaining: 7 });
        assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 3);
        assert_eq!(queue.queued_count().await, 7);
    }

    #[tokio::test]
    async fn test_drain_respects_priority_and_insertion_order() {
        let client = Arc::new(RecordingClient::default());
        let (queue, _) = queue(client.clone());
        let low1 = add(&queue, "P", 1).await;
        let high = add(&queue, "H", 5).await;
        let low2 = add(&queue, "P", 1).await;
        let _low3 = add(&queue, "P", 1).await;

        queue.drain().await.unwrap();

        let mut called = client.calls.lock().unwrap().clone();
        called.sort();
        let mut expected = vec![high, low1, low2];
        expected.sort();
        assert_eq!(called, expected);
    }

    #[tokio::test]
    async fn test_failure_is_terminal() {
        let client = Arc::new(RecordingClient {
            fail_tag: Some("BAD".to_string()),
            ..Default::default()
        });
        let (queue, storage) = queue(client.clone());
        let bad = add(&queue, "BAD", PRIORITY_NORMAL).await;
        let good = add(&queue, "GOOD", PRIORITY_NORMAL).await;

        queue.drain_until_idle().await.unwrap();

        let jobs = storage.snapshot();
        let bad_job = jobs.iter().find(|j| j.id == bad).unwrap();
        let good_job = jobs.iter().find(|j| j.id == good).unwrap();
        assert_eq!(bad_job.status, JobStatus::Error);
        assert_eq!(bad_job.error_message.as_deref(), Some("API request failed: 500"));
        assert_eq!(good_job.status, JobStatus::Completed);

        // No retry on a second drain.
        queue.drain().await.unwrap();
        assert_eq!(client.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_drain_until_idle_empties_queue() {
        let client = Arc::new(RecordingClient::default());
        let (queue, _) = queue(client.clone());
        for _ in 0..7 {
            add(&queue, "DIV", PRIORITY_NORMAL).await;
        }

        queue.drain_until_idle().await.unwrap();
        assert_eq!(queue.queued_count().await, 0);
        assert_eq!(client.calls.lock().unwrap().len(), 7);
        assert!(client.max_in_flight.load(Ordering::SeqCst) <= 3);
        assert!(!queue.is_draining().await);
    }

    #[tokio::test]
    async fn test_process_now_is_not_drained() {
        let client = Arc::new(RecordingClient::default());
        let (queue, _) = queue(client.clone());
        add(&queue, "DIV", PRIORITY_NORMAL).await;

        let url = queue
            .process_now(snapshot("BUTTON"), String::new(), "https://example.com".to_string())
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:3000/dashboard?elementId=element_"));

        let jobs = queue.jobs().await;
        assert_eq!(jobs[0].status, JobStatus::Processing);
        assert_eq!(jobs[0].priority, PRIORITY_IMMEDIATE);

        queue.drain().await.unwrap();
        assert_eq!(client.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_inspiration_request() {
        let (queue, _) = queue(Arc::new(RecordingClient::default()));
        let id = queue
            .enqueue_inspiration(
                snapshot("SECTION"),
                "more playful",
                Some("data:image/png;base64,EL".to_string()),
                "data:image/png;base64,VP".to_string(),
                "https://example.com".to_string(),
            )
            .await
            .unwrap();

        assert!(id.starts_with("inspiration_"));
        let job = queue.jobs().await.remove(0);
        assert_eq!(job.priority, PRIORITY_INSPIRATION);
        assert!(job.element_data.is_inspiration_request());
        assert_eq!(job.element_data.user_prompt.as_deref(), Some("more playful"));
        assert_eq!(job.element_data.element_screenshot.as_deref(), Some("data:image/png;base64,EL"));
        assert_eq!(job.screenshot, "data:image/png;base64,VP");
    }

    #[tokio::test]
    async fn test_clear_and_load() {
        let (queue, storage) = queue(Arc::new(RecordingClient::default()));
        add(&queue, "DIV", PRIORITY_NORMAL).await;
        queue.clear().await.unwrap();
        assert!(storage.snapshot().is_empty());

        let restored = LocalQueue::new(
            Arc::new(MemoryStorage::with_jobs(vec![QueuedJob::new(
                "element",
                snapshot("NAV"),
                String::new(),
                "https://example.com".to_string(),
                PRIORITY_NORMAL,
                JobStatus::Queued,
            )])),
            Arc::new(RecordingClient::default()),
            "http://localhost:3000",
        );
        assert_eq!(restored.load().await.unwrap(), 1);
        assert_eq!(restored.queued_count().await, 1);
    }

    #[tokio::test]
    async fn test_process_one_rejects_non_queued() {
        let (queue, _) = queue(Arc::new(RecordingClient::default()));
        assert!(matches!(
            queue.process_one("missing").await,
            Err(QueueError::NotFound(_))
        ));

        let id = add(&queue, "DIV", PRIORITY_NORMAL).await;
        queue.process_one(&id).await.unwrap();
        assert!(matches!(
            queue.process_one(&id).await,
            Err(QueueError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_from_config_persists_to_storage_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage_path = dir.path().join("queue.json");
        let config = crate::config::load_config_from_str(&format!(
            r#"{{ "server": {{ "public_url": "https://taste.example.com/" }},
                 "queue": {{ "concurrency": 2, "storage_path": "{}" }} }}"#,
            storage_path.display()
        ))
        .unwrap();

        let queue = LocalQueue::from_config(&config).unwrap();
        assert_eq!(queue.concurrency, 2);
        assert_eq!(
            queue.dashboard_url("element_1"),
            "https://taste.example.com/dashboard?elementId=element_1"
        );

        queue
            .enqueue(snapshot("BUTTON"), String::new(), "https://example.com".to_string(), PRIORITY_NORMAL)
            .await
            .unwrap();
        assert!(storage_path.exists());
    }
}
