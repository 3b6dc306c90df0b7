//! Client for the analysis proxy, used by the `check` and `chat` surfaces.

use finguard_core::{
    analysis::{AnalysisRequest, AnalysisResponse, ImageUpload},
    error::FinguardError,
};
use tracing::debug;

/// Talks to `POST /api/analyze` on a running proxy.
#[derive(Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    url: String,
}

impl ProxyClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submit pasted text as JSON.
    pub async fn analyze_text(
        &self,
        message: &str,
        language: &str,
    ) -> Result<AnalysisResponse, FinguardError> {
        debug!("proxy: text submission ({} chars)", message.chars().count());
        let req = self
            .client
            .post(&self.url)
            .json(&AnalysisRequest::new(message, language));
        Self::send(req).await
    }

    /// Submit an image as multipart form data.
    pub async fn analyze_image(
        &self,
        image: ImageUpload,
        language: &str,
    ) -> Result<AnalysisResponse, FinguardError> {
        debug!("proxy: image submission ({} bytes)", image.len());
        let file_name = image
            .file_name
            .clone()
            .unwrap_or_else(|| "upload".to_string());
        let part = reqwest::multipart::Part::bytes(image.bytes.to_vec())
            .file_name(file_name)
            .mime_str(&image.content_type)
            .map_err(|e| FinguardError::Backend(format!("invalid image mime type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("image", part)
            .text("language", language.to_string());

        let req = self.client.post(&self.url).multipart(form);
        Self::send(req).await
    }

    async fn send(req: reqwest::RequestBuilder) -> Result<AnalysisResponse, FinguardError> {
        let resp = req
            .send()
            .await
            .map_err(|e| FinguardError::Backend(format!("proxy request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FinguardError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FinguardError::Backend(format!("failed to read proxy response: {e}")))?;
        Ok(serde_json::from_slice(&body)?)
    }
}
