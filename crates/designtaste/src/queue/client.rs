use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{IngestPayload, QueueError};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the ingestion endpoint relative to the backend base URL.
pub const INGEST_PATH: &str = "/api/elements/process";

/// Sends a captured element to the backend.
#[async_trait]
pub trait IngestClient: Send + Sync {
    async fn submit(&self, payload: &IngestPayload) -> Result<(), QueueError>;
}

/// Posts jobs to `{base_url}/api/elements/process`.
pub struct HttpIngestClient {
    client: Client,
    endpoint: String,
}

impl HttpIngestClient {
    pub fn new(base_url: &str) -> Result<Self, QueueError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), INGEST_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl IngestClient for HttpIngestClient {
    async fn submit(&self, payload: &IngestPayload) -> Result<(), QueueError> {
        let response = self.client.post(&self.endpoint).json(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("API response error: {} {}", status, body);
            return Err(QueueError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> IngestPayload {
        IngestPayload {
            id: "element_1_abc".to_string(),
            element_data: json!({ "tagName": "BUTTON" }),
            screenshot: "data:image/png;base64,AAAA".to_string(),
            url: "https://example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(INGEST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpIngestClient::new(&format!("{}/", server.uri())).unwrap();
        client.submit(&payload()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["id"], "element_1_abc");
        assert_eq!(body["elementData"]["tagName"], "BUTTON");
    }

    #[tokio::test]
    async fn test_non_success_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(INGEST_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "Missing required fields"
            })))
            .mount(&server)
            .await;

        let client = HttpIngestClient::new(&server.uri()).unwrap();
        let err = client.submit(&payload()).await.unwrap_err();
        assert!(matches!(err, QueueError::Rejected { status: 400 }));
        assert_eq!(err.to_string(), "API request failed: 400");
    }
}
