//! OCR.space HTTP API engine.
//!
//! Sends the image as a base64 data URL in the `base64Image` form field.

use async_trait::async_trait;
use finguard_core::{analysis::ImageUpload, error::FinguardError, traits::OcrEngine};
use serde::Deserialize;

/// OCR.space parse response (only the fields we read).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParseResponse {
    #[serde(default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

/// Engine backed by the OCR.space parse endpoint.
pub struct OcrSpaceEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OcrSpaceEngine {
    pub fn new(client: reqwest::Client, endpoint: String, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

/// Join the text of every parsed page.
fn collect_text(resp: ParseResponse) -> Result<String, FinguardError> {
    if resp.is_errored_on_processing {
        let detail = match resp.error_message {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            _ => "unknown error".to_string(),
        };
        return Err(FinguardError::Ocr(format!("ocr.space: {detail}")));
    }
    Ok(resp
        .parsed_results
        .into_iter()
        .map(|r| r.parsed_text)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[async_trait]
impl OcrEngine for OcrSpaceEngine {
    fn name(&self) -> &str {
        "ocr_space"
    }

    async fn recognize(
        &self,
        image: &ImageUpload,
        language: &str,
    ) -> Result<String, FinguardError> {
        if self.api_key.is_empty() {
            return Err(FinguardError::Ocr("ocr.space api_key is not set".into()));
        }

        let form = reqwest::multipart::Form::new()
            .text("base64Image", image.data_url())
            .text("language", language.to_string());

        let resp = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| FinguardError::Ocr(format!("ocr.space request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(FinguardError::Ocr(format!(
                "ocr.space API error {status}: {body}"
            )));
        }

        let parsed: ParseResponse = resp
            .json()
            .await
            .map_err(|e| FinguardError::Ocr(format!("ocr.space response parse failed: {e}")))?;

        collect_text(parsed)
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Multipart, http::HeaderMap, routing::post, Json, Router};
    use serde_json::json;

    #[test]
    fn test_collect_text_joins_pages() {
        let resp: ParseResponse = serde_json::from_value(json!({
            "ParsedResults": [{"ParsedText": "page one"}, {"ParsedText": "page two"}],
            "OCRExitCode": 1,
            "IsErroredOnProcessing": false
        }))
        .unwrap();
        assert_eq!(collect_text(resp).unwrap(), "page one\npage two");
    }

    #[test]
    fn test_collect_text_reports_error_list() {
        let resp: ParseResponse = serde_json::from_value(json!({
            "IsErroredOnProcessing": true,
            "ErrorMessage": ["Unable to recognize the file type", "E216"]
        }))
        .unwrap();
        let err = collect_text(resp).unwrap_err();
        assert!(err.to_string().contains("Unable to recognize the file type; E216"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_error() {
        let engine = OcrSpaceEngine::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/parse/image".into(),
            String::new(),
        );
        let img = ImageUpload::new(vec![1], "image/png");
        assert!(engine.recognize(&img, "eng").await.is_err());
        assert!(!engine.is_available().await);
    }

    #[tokio::test]
    async fn test_recognize_posts_data_url() {
        let app = Router::new().route(
            "/parse/image",
            post(|headers: HeaderMap, mut form: Multipart| async move {
                assert_eq!(headers.get("apikey").unwrap(), "k-1");
                let mut image = String::new();
                let mut language = String::new();
                while let Some(field) = form.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let value = field.text().await.unwrap();
                    match name.as_str() {
                        "base64Image" => image = value,
                        "language" => language = value,
                        _ => {}
                    }
                }
                let ok = image == "data:image/png;base64,AQID" && language == "eng";
                Json(json!({
                    "ParsedResults": [{"ParsedText": if ok { "  Claim your prize\n" } else { "" }}],
                    "IsErroredOnProcessing": false
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let engine = OcrSpaceEngine::new(
            reqwest::Client::new(),
            format!("http://{addr}/parse/image"),
            "k-1".into(),
        );
        let img = ImageUpload::new(vec![1, 2, 3], "image/png");
        let text = engine.recognize(&img, "eng").await.unwrap();
        assert_eq!(text, "  Claim your prize\n");
    }
}
