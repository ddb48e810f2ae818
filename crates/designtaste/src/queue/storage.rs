use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{QueueError, QueuedJob};

/// Where the queue is kept between runs.
#[async_trait]
pub trait QueueStorage: Send + Sync {
    async fn load(&self) -> Result<Vec<QueuedJob>, QueueError>;
    async fn save(&self, jobs: &[QueuedJob]) -> Result<(), QueueError>;
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StoredQueue {
    #[serde(default)]
    processing_queue: Vec<QueuedJob>,
}

/// Persists the queue as a JSON document `{"processingQueue": [...]}`.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> QueueError {
        QueueError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl QueueStorage for JsonFileStorage {
    async fn load(&self) -> Result<Vec<QueuedJob>, QueueError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        let stored: StoredQueue = serde_json::from_str(&raw)?;
        Ok(stored.processing_queue)
    }

    async fn save(&self, jobs: &[QueuedJob]) -> Result<(), QueueError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let body = serde_json::to_string(&StoredQueue {
            processing_queue: jobs.to_vec(),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

/// In-memory storage, used in tests and when no storage path is configured.
#[derive(Default)]
pub struct MemoryStorage {
    jobs: Mutex<Vec<QueuedJob>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(jobs: Vec<QueuedJob>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
        }
    }

    /// The last saved list.
    pub fn snapshot(&self) -> Vec<QueuedJob> {
        self.jobs.lock().map(|j| j.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QueueStorage for MemoryStorage {
    async fn load(&self) -> Result<Vec<QueuedJob>, QueueError> {
        Ok(self.snapshot())
    }

    async fn save(&self, jobs: &[QueuedJob]) -> Result<(), QueueError> {
        if let Ok(mut stored) = self.jobs.lock() {
            *stored = jobs.to_vec();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementSnapshot;
    use crate::queue::{JobStatus, PRIORITY_NORMAL};

    fn sample() -> QueuedJob {
        QueuedJob::new(
            "element",
            ElementSnapshot {
                tag_name: "DIV".to_string(),
                ..Default::default()
            },
            "data:image/png;base64,AAAA".to_string(),
            "https://example.com".to_string(),
            PRIORITY_NORMAL,
            JobStatus::Queued,
        )
    }

    #[tokio::test]
    async fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("state").join("queue.json"));

        assert!(storage.load().await.unwrap().is_empty());

        let job = sample();
        storage.save(&[job.clone()]).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), vec![job]);

        let raw = std::fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("\"processingQueue\""));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = JsonFileStorage::new(path);
        assert!(matches!(storage.load().await, Err(QueueError::Serialize(_))));
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.save(&[sample(), sample()]).await.unwrap();
        assert_eq!(storage.load().await.unwrap().len(), 2);
    }
}
