use super::*;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use finguard_core::traits::OcrEngine;
use http_body_util::BodyExt;
use std::sync::Mutex;
use tower::ServiceExt;

// -----------------------------------------------------------------------
// Mocks
// -----------------------------------------------------------------------

/// What the mock backend answers with.
#[derive(Clone)]
enum Reply {
    Body(&'static str),
    Status(u16),
    Transport,
}

/// A backend that records every request it receives.
struct MockBackend {
    reply: Reply,
    calls: Arc<Mutex<Vec<AnalysisRequest>>>,
}

impl MockBackend {
    fn new(reply: Reply) -> (Self, Arc<Mutex<Vec<AnalysisRequest>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                reply,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<Bytes, FinguardError> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Body(body) => Ok(Bytes::from_static(body.as_bytes())),
            Reply::Status(status) => Err(FinguardError::Upstream { status: *status }),
            Reply::Transport => Err(FinguardError::Backend(
                "request failed: connection refused (10.0.0.7:443)".into(),
            )),
        }
    }
}

/// An OCR engine that returns fixed text, or fails.
struct MockOcr {
    text: Option<&'static str>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl OcrEngine for MockOcr {
    fn name(&self) -> &str {
        "mock-ocr"
    }

    async fn recognize(
        &self,
        image: &ImageUpload,
        language: &str,
    ) -> Result<String, FinguardError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", image.content_type, language));
        self.text
            .map(str::to_string)
            .ok_or_else(|| FinguardError::Ocr("engine crashed".into()))
    }
}

// -----------------------------------------------------------------------
// Test helpers
// -----------------------------------------------------------------------

const PRIZE_BODY: &str = r#"{"risk_score":"High","scam_type":"Prize scam","explanation":"...","steps":["Do not click","Report it","Block sender"]}"#;

struct Harness {
    app: Router,
    calls: Arc<Mutex<Vec<AnalysisRequest>>>,
    ocr_calls: Arc<Mutex<Vec<String>>>,
}

fn harness(reply: Reply, ocr_text: Option<&'static str>) -> Harness {
    let (backend, calls) = MockBackend::new(reply);
    let ocr_calls = Arc::new(Mutex::new(Vec::new()));
    let engine = MockOcr {
        text: ocr_text,
        calls: Arc::clone(&ocr_calls),
    };
    let state = ApiState::new(
        Arc::new(backend),
        OcrAdapter::new(Arc::new(engine), "eng"),
    );
    Harness {
        app: build_router(state),
        calls,
        ocr_calls,
    }
}

/// Helper to POST JSON to /api/analyze.
fn json_request(body: &str) -> Request<Body> {
    Request::post("/api/analyze")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const BOUNDARY: &str = "finguard-test-boundary";

/// Helper to POST a multipart form with optional image and language.
fn multipart_request(image: Option<&[u8]>, language: Option<&str>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    if let Some(bytes) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"shot.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(lang) = language {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\n{lang}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/analyze")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(resp: Response) -> Bytes {
    resp.into_body().collect().await.unwrap().to_bytes()
}

/// Parse response body as JSON.
async fn body_json(resp: Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

// -----------------------------------------------------------------------
// JSON submissions
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_prize_scam_relayed_verbatim() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let req = json_request(r#"{"message": "You won $1000! Click http://bit.ly/x", "language": "en"}"#);
    let resp = h.app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(&body_bytes(resp).await[..], PRIZE_BODY.as_bytes());

    let calls = h.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        AnalysisRequest::new("You won $1000! Click http://bit.ly/x", "en")
    );
}

#[tokio::test]
async fn test_empty_message_returns_400_without_backend_call() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let resp = h
        .app
        .oneshot(json_request(r#"{"message": "", "language": "en"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({"error": "Empty message"}));
    assert!(h.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_whitespace_only_message_returns_400() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let resp = h
        .app
        .oneshot(json_request(r#"{"message": "  \n\t ", "language": "th"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(h.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unparsable_body_is_empty_message() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let resp = h.app.oneshot(json_request("not json {")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(h.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_string_message_is_empty_message() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let resp = h
        .app
        .oneshot(json_request(r#"{"message": 42, "language": "en"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_language_defaults_to_en() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let resp = h
        .app
        .oneshot(json_request(r#"{"message": "Pay the fee now", "language": 7}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(h.calls.lock().unwrap()[0].language, "en");
}

#[tokio::test]
async fn test_message_forwarded_untrimmed() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    h.app
        .oneshot(json_request(r#"{"message": "  hello  ", "language": "vi"}"#))
        .await
        .unwrap();
    let calls = h.calls.lock().unwrap();
    assert_eq!(calls[0].message, "  hello  ");
    assert_eq!(calls[0].language, "vi");
}

#[tokio::test]
async fn test_missing_content_type_is_read_as_json() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let req = Request::post("/api/analyze")
        .body(Body::from(r#"{"message": "hi there"}"#))
        .unwrap();
    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// -----------------------------------------------------------------------
// Backend failures
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_backend_500_returns_502() {
    let h = harness(Reply::Status(500), None);
    let resp = h
        .app
        .oneshot(json_request(r#"{"message": "hello", "language": "en"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "Upstream error 500");
    assert_eq!(h.calls.lock().unwrap().len(), 1, "no retry");
}

#[tokio::test]
async fn test_backend_404_status_embedded() {
    let h = harness(Reply::Status(404), None);
    let resp = h
        .app
        .oneshot(json_request(r#"{"message": "hello"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(resp).await, json!({"error": "Upstream error 404"}));
}

#[tokio::test]
async fn test_transport_failure_returns_generic_500() {
    let h = harness(Reply::Transport, None);
    let resp = h
        .app
        .oneshot(json_request(r#"{"message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let raw = body_bytes(resp).await;
    assert_eq!(&raw[..], br#"{"error":"Server error"}"#);
    assert!(!String::from_utf8_lossy(&raw).contains("10.0.0.7"));
}

// -----------------------------------------------------------------------
// Multipart submissions
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_image_text_extracted_and_forwarded() {
    let h = harness(Reply::Body(PRIZE_BODY), Some("  Your parcel is held. Pay RM5 \n"));
    let resp = h
        .app
        .oneshot(multipart_request(Some(b"\x89PNG fake"), Some("ms")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let calls = h.calls.lock().unwrap();
    assert_eq!(
        calls[0],
        AnalysisRequest::new("Your parcel is held. Pay RM5", "ms")
    );
    // Recognition language stays fixed regardless of the selected language.
    assert_eq!(*h.ocr_calls.lock().unwrap(), vec!["image/png eng"]);
}

#[tokio::test]
async fn test_image_with_empty_ocr_text_returns_400() {
    let h = harness(Reply::Body(PRIZE_BODY), Some("   "));
    let resp = h
        .app
        .oneshot(multipart_request(Some(b"\x89PNG fake"), Some("en")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({"error": "Empty message"}));
    assert!(h.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_ocr_engine_failure_returns_400() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let resp = h
        .app
        .oneshot(multipart_request(Some(b"\x89PNG fake"), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(h.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_multipart_without_image_returns_400() {
    let h = harness(Reply::Body(PRIZE_BODY), Some("unused"));
    let resp = h
        .app
        .oneshot(multipart_request(None, Some("th")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(h.ocr_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_multipart_language_defaults_to_en() {
    let h = harness(Reply::Body(PRIZE_BODY), Some("Verify your account"));
    let resp = h
        .app
        .oneshot(multipart_request(Some(b"img"), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(h.calls.lock().unwrap()[0].language, "en");
}

#[tokio::test]
async fn test_malformed_multipart_returns_500() {
    let h = harness(Reply::Body(PRIZE_BODY), Some("text"));
    let req = Request::post("/api/analyze")
        .header("Content-Type", "multipart/form-data; boundary=abc")
        .body(Body::from("this is not multipart"))
        .unwrap();
    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({"error": "Server error"}));
}

// -----------------------------------------------------------------------
// Auxiliary routes
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_health() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let req = Request::get("/api/health").body(Body::empty()).unwrap();
    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");
}

#[tokio::test]
async fn test_languages_detects_from_accept_language() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let req = Request::get("/api/languages")
        .header("Accept-Language", "th-TH,th;q=0.9,en-US;q=0.8")
        .body(Body::empty())
        .unwrap();
    let resp = h.app.oneshot(req).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["detected"], "th");
    assert_eq!(json["languages"].as_array().unwrap().len(), 9);
    assert_eq!(json["languages"][8]["code"], "en");
}

#[tokio::test]
async fn test_languages_without_header_is_english() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let req = Request::get("/api/languages").body(Body::empty()).unwrap();
    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(body_json(resp).await["detected"], "en");
}

#[tokio::test]
async fn test_get_analyze_not_allowed() {
    let h = harness(Reply::Body(PRIZE_BODY), None);
    let req = Request::get("/api/analyze").body(Body::empty()).unwrap();
    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
