//! HTTP client for the dashboard backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::api::client::JobApi;
use crate::domain::{JobHandle, JobRequest};
use crate::error::{DeskError, Result};

/// Default backend address for local development
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the backend API
#[derive(Debug, Clone, PartialEq)]
pub struct HttpApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// `JobApi` implementation speaking the backend's JSON-over-HTTP protocol
#[derive(Debug, Clone)]
pub struct HttpJobApi {
    client: Client,
    config: HttpApiConfig,
}

impl HttpJobApi {
    pub fn new(config: HttpApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Turn a response into a job detail, mapping non-2xx statuses onto
    /// `DeskError::Api` with whatever body text the backend sent
    async fn read_job(&self, response: reqwest::Response) -> Result<JobHandle> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable response body".to_string());
            return Err(DeskError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl JobApi for HttpJobApi {
    async fn create_job(&self, request: &JobRequest) -> Result<JobHandle> {
        debug!(kind = ?request.kind, name = %request.name, "creating job");
        let response = self
            .client
            .post(self.url("api/jobs"))
            .json(request)
            .send()
            .await?;
        self.read_job(response).await
    }

    async fn fetch_job(&self, job_id: &str) -> Result<JobHandle> {
        let response = self
            .client
            .get(self.url(&format!("api/jobs/{}", job_id)))
            .send()
            .await?;
        self.read_job(response).await
    }

    async fn cancel_job(&self, job_id: &str) -> Result<JobHandle> {
        debug!(job_id = %job_id, "requesting cancellation");
        let response = self
            .client
            .post(self.url(&format!("api/jobs/{}/cancel", job_id)))
            .send()
            .await?;
        self.read_job(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HttpApiConfig::default();

        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_with_base_url_keeps_default_timeout() {
        let config = HttpApiConfig::with_base_url("https://desk.example.com");

        assert_eq!(config.base_url, "https://desk.example.com");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_url_joins_without_doubled_slashes() {
        let api = HttpJobApi::new(HttpApiConfig::with_base_url("http://localhost:8000/")).unwrap();

        assert_eq!(api.url("api/jobs"), "http://localhost:8000/api/jobs");
        assert_eq!(api.url("/api/jobs/abc"), "http://localhost:8000/api/jobs/abc");
        assert_eq!(
            api.url("api/jobs/abc/cancel"),
            "http://localhost:8000/api/jobs/abc/cancel"
        );
    }

    #[test]
    fn test_api_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpJobApi>();
    }
}
