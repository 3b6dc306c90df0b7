//! HTTP API server for the analysis proxy.
//!
//! `POST /api/analyze` accepts pasted text as JSON or a photographed message
//! as multipart form data, forwards one request to the analysis backend and
//! relays its JSON verbatim. Every failure is mapped to a response in one
//! place ([`AnalyzeError`]), so internal detail never reaches the client.

use axum::{
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use finguard_core::{
    analysis::{mime_from_extension, AnalysisRequest, ImageUpload, DEFAULT_LANGUAGE, MAX_IMAGE_BYTES},
    config::ServerConfig,
    error::FinguardError,
    traits::AnalysisBackend,
};
use finguard_providers::ocr::OcrAdapter;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::i18n::{detect_initial_locale, parse_accept_language, LANGUAGES};

/// Request body cap: a 10 MB image plus multipart framing.
const BODY_LIMIT: usize = MAX_IMAGE_BYTES + 2 * 1024 * 1024;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    backend: Arc<dyn AnalysisBackend>,
    ocr: OcrAdapter,
    uptime: Instant,
}

impl ApiState {
    pub fn new(backend: Arc<dyn AnalysisBackend>, ocr: OcrAdapter) -> Self {
        Self {
            backend,
            ocr,
            uptime: Instant::now(),
        }
    }
}

/// Client-facing failure of `POST /api/analyze`.
#[derive(Debug)]
pub enum AnalyzeError {
    /// Message was empty after trimming (400).
    EmptyMessage,
    /// Backend answered with a non-success status (502).
    Upstream(u16),
    /// Anything else (500). The detail is logged, never returned.
    Internal(String),
}

impl From<FinguardError> for AnalyzeError {
    fn from(e: FinguardError) -> Self {
        match e {
            FinguardError::Upstream { status } => Self::Upstream(status),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::EmptyMessage => (StatusCode::BAD_REQUEST, "Empty message".to_string()),
            Self::Upstream(code) => (StatusCode::BAD_GATEWAY, format!("Upstream error {code}")),
            Self::Internal(detail) => {
                error!("analyze: internal fault: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Where the message came from, for logging.
#[derive(Debug, Clone, Copy)]
enum Source {
    Text,
    Image,
}

/// Normalized inbound submission.
struct Submission {
    request: AnalysisRequest,
    source: Source,
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("multipart/form-data"))
        .unwrap_or(false)
}

/// Read `{message, language}` leniently: unparsable bodies and missing or
/// non-string fields fall back to `""` and `"en"`.
fn text_submission(body: &[u8]) -> AnalysisRequest {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let language = value
        .get("language")
        .and_then(Value::as_str)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE);
    AnalysisRequest::new(message, language)
}

/// Pull the `image` file and `language` text out of a multipart form and
/// run OCR on the image. A missing image leaves the message empty.
async fn image_submission(
    mut form: Multipart,
    ocr: &OcrAdapter,
) -> Result<AnalysisRequest, AnalyzeError> {
    let mut language = DEFAULT_LANGUAGE.to_string();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = form
        .next_field()
        .await
        .map_err(|e| AnalyzeError::Internal(format!("malformed multipart: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("language") => {
                language = field
                    .text()
                    .await
                    .map_err(|e| AnalyzeError::Internal(format!("bad language field: {e}")))?;
            }
            Some("image") => {
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    // A plain text field named `image` is not a file.
                    continue;
                };
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        let ext = file_name.rsplit('.').next().unwrap_or_default();
                        mime_from_extension(ext).to_string()
                    });
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AnalyzeError::Internal(format!("bad image field: {e}")))?;
                image = Some(ImageUpload::new(bytes, content_type).with_file_name(file_name));
            }
            _ => {}
        }
    }

    let message = match image {
        Some(img) if !img.is_empty() => ocr.extract_text(&img).await,
        _ => String::new(),
    };
    Ok(AnalysisRequest::new(message, language))
}

/// Turn either request shape into one [`AnalysisRequest`].
async fn normalize(state: &ApiState, req: Request) -> Result<Submission, AnalyzeError> {
    if is_multipart(req.headers()) {
        let form = Multipart::from_request(req, state)
            .await
            .map_err(|e| AnalyzeError::Internal(format!("multipart rejected: {e}")))?;
        let request = image_submission(form, &state.ocr).await?;
        Ok(Submission {
            request,
            source: Source::Image,
        })
    } else {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AnalyzeError::Internal(format!("failed to read body: {e}")))?;
        Ok(Submission {
            request: text_submission(&body),
            source: Source::Text,
        })
    }
}

async fn relay(state: &ApiState, req: Request) -> Result<Bytes, AnalyzeError> {
    let submission = normalize(state, req).await?;
    if !submission.request.has_message() {
        return Err(AnalyzeError::EmptyMessage);
    }
    info!(
        "analyze: {:?} submission, language={}, {} chars",
        submission.source,
        submission.request.language,
        submission.request.message.chars().count()
    );
    Ok(state.backend.analyze(&submission.request).await?)
}

/// `POST /api/analyze`: check a suspicious message.
async fn analyze(State(state): State<ApiState>, req: Request) -> Result<Response, AnalyzeError> {
    let start = Instant::now();
    let result = relay(&state, req).await;
    let elapsed = start.elapsed().as_millis();

    match result {
        Ok(body) => {
            info!("analyze: 200 via {} in {elapsed}ms", state.backend.name());
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response())
        }
        Err(e) => {
            if matches!(e, AnalyzeError::Upstream(_)) {
                warn!("analyze: backend rejected request after {elapsed}ms: {e:?}");
            }
            Err(e)
        }
    }
}

/// `GET /api/health`: liveness with uptime.
async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
    }))
}

/// `GET /api/languages`: supported locales plus the one the caller's
/// `Accept-Language` header points at.
async fn languages(headers: HeaderMap) -> Json<Value> {
    let preferred = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(parse_accept_language)
        .unwrap_or_default();
    let detected = detect_initial_locale(&preferred);
    let list: Vec<Value> = LANGUAGES
        .iter()
        .map(|(locale, label)| json!({ "code": locale.as_str(), "label": label }))
        .collect();
    Json(json!({
        "detected": detected.as_str(),
        "languages": list,
    }))
}

/// Build the axum router with shared state.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/health", get(health))
        .route("/api/languages", get(languages))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the proxy until the process is stopped.
pub async fn serve(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("API server failed to bind to {addr}: {e}"))?;

    info!("API server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
