//! HTTP client for the external analysis backend.
//!
//! One POST per call, no retries. The response body is relayed as raw bytes
//! after a well-formedness check so callers can pass it through untouched.

use async_trait::async_trait;
use bytes::Bytes;
use finguard_core::{
    analysis::AnalysisRequest, config::BackendConfig, error::FinguardError,
    traits::AnalysisBackend,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Analysis backend reached over HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpBackend {
    /// Create from config values.
    pub fn from_config(cfg: &BackendConfig) -> Result<Self, FinguardError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| FinguardError::Backend(format!("failed to build http client: {e}")))?;
        Ok(Self::with_client(client, cfg.url.clone()))
    }

    /// Create around an existing client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<Bytes, FinguardError> {
        let start = Instant::now();
        debug!("backend: POST {} language={}", self.url, request.language);

        let resp = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| FinguardError::Backend(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FinguardError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FinguardError::Backend(format!("failed to read response: {e}")))?;

        serde_json::from_slice::<serde::de::IgnoredAny>(&body)
            .map_err(|e| FinguardError::Backend(format!("response is not JSON: {e}")))?;

        info!(
            "backend: {} in {}ms ({} bytes)",
            status,
            start.elapsed().as_millis(),
            body.len()
        );
        Ok(body)
    }
}
