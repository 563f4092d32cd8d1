//! HTTP-level tests for the `/analyze` upload endpoint.
//!
//! The vision provider is replaced by a scripted mock, so these run without
//! network access or an API key.

#![cfg(feature = "server")]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use tower::ServiceExt;

use sat_triage::api::{create_app, ApiState};
use sat_triage::{AnalysisService, ImageInput, ResultLog, TriageEngine, VisionClient};

const BOUNDARY: &str = "triage-test-boundary";

// ── Mock provider ──────────────────────────────────────────────

struct ScriptedVision {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_instruction: Mutex<Option<String>>,
}

impl ScriptedVision {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_instruction: Mutex::new(None),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_instruction: Mutex::new(None),
        })
    }
}

#[async_trait]
impl VisionClient for ScriptedVision {
    async fn describe(&self, image: &ImageInput, instruction: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!image.bytes.is_empty());
        assert!(instruction.contains("JSON"));
        *self.last_instruction.lock().unwrap() = Some(instruction.to_string());
        self.reply.clone().map_err(|e| anyhow!(e))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

// ── Helpers ────────────────────────────────────────────────────

struct TestApp {
    router: axum::Router,
    dir: tempfile::TempDir,
}

impl TestApp {
    fn new(vision: Arc<ScriptedVision>) -> Self {
        Self::with_service(|service| service, vision)
    }

    fn with_service(
        configure: impl FnOnce(AnalysisService) -> AnalysisService,
        vision: Arc<ScriptedVision>,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let service = configure(
            AnalysisService::new(vision, TriageEngine::default())
                .with_result_log(ResultLog::new(dir.path().join("analysis_log.csv"))),
        );
        let state = ApiState::new(service, dir.path().join("uploads"));
        Self {
            router: create_app(state, 1024 * 1024),
            dir,
        }
    }

    fn upload_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }

    fn log_path(&self) -> std::path::PathBuf {
        self.dir.path().join("analysis_log.csv")
    }
}

fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    )
}

fn dir_is_empty(path: &Path) -> bool {
    match std::fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn analyze_returns_decision() {
    let vision = ScriptedVision::replying(
        "```json\n{\"event_type\": \"flood\", \"area_affected_percent\": 72, \"intensity_rating\": 8, \"summary\": \"River burst, fields submerged\"}\n```",
    );
    let app = TestApp::new(vision.clone());

    let resp = app
        .router
        .clone()
        .oneshot(upload_request(multipart_body("image", "delta.png", b"\x89PNG")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["analysis"]["eventType"], "flood");
    assert_eq!(json["analysis"]["urgency"], "CRITICAL");
    assert_eq!(json["analysis"]["verdict"], "WORTH_RESEARCH");
    assert_eq!(json["analysis"]["severityPercent"], 80);
    assert_eq!(vision.calls.load(Ordering::SeqCst), 1);

    assert!(dir_is_empty(&app.upload_dir()), "staged image must be removed");

    let log = std::fs::read_to_string(app.log_path()).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(
        lines,
        vec![
            "filename,event,event_area_percent,severity_rating,verdict,summary",
            "delta.png,flood,72,80,WORTH_RESEARCH,River burst  fields submerged",
        ]
    );
}

#[tokio::test]
async fn missing_image_field_is_bad_request() {
    let vision = ScriptedVision::replying("{}");
    let app = TestApp::new(vision.clone());

    let resp = app
        .router
        .clone()
        .oneshot(upload_request(multipart_body("document", "a.png", b"data")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "Image upload failed.");
    assert_eq!(vision.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_multipart_request_is_bad_request() {
    let app = TestApp::new(ScriptedVision::replying("{}"));

    let resp = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "Image upload failed.");
}

#[tokio::test]
async fn unparseable_model_output_is_server_error() {
    let app = TestApp::new(ScriptedVision::replying(
        "I'm sorry, I can't determine anything from this image.",
    ));

    let resp = app
        .router
        .clone()
        .oneshot(upload_request(multipart_body("image", "blurry.png", b"img")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["error"], "Failed to analyze image");
    assert!(dir_is_empty(&app.upload_dir()), "staged image must be removed on failure");
    assert!(!app.log_path().exists());
}

#[tokio::test]
async fn provider_failure_is_server_error() {
    let app = TestApp::new(ScriptedVision::failing("quota exceeded"));

    let resp = app
        .router
        .clone()
        .oneshot(upload_request(multipart_body("image", "scene.jpg", b"img")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["error"], "Failed to analyze image");
    assert!(dir_is_empty(&app.upload_dir()));
}

#[tokio::test]
async fn non_satellite_upload_is_dismissed() {
    let app = TestApp::new(ScriptedVision::replying(
        r#"{"event_type": "non_satellite", "area_affected_percent": 95, "intensity_rating": 10, "factors": ["human face"], "summary": "Portrait photo"}"#,
    ));

    let resp = app
        .router
        .clone()
        .oneshot(upload_request(multipart_body("image", "selfie.jpg", b"img")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["analysis"]["eventType"], "non_satellite");
    assert_eq!(json["analysis"]["urgency"], "LOW");
    assert_eq!(json["analysis"]["verdict"], "NOT_WORTH_RESEARCH");
}

#[tokio::test]
async fn custom_instruction_reaches_provider() {
    let vision = ScriptedVision::replying(r#"{"event_type": "drought", "area_affected_percent": 10}"#);
    let instruction = "Return JSON with event_type and area_affected_percent only.";
    let app = TestApp::with_service(|s| s.with_instruction(instruction), vision.clone());

    let resp = app
        .router
        .clone()
        .oneshot(upload_request(multipart_body("image", "plain.png", b"img")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        vision.last_instruction.lock().unwrap().as_deref(),
        Some(instruction)
    );
}

#[tokio::test]
async fn default_instruction_is_embedded_prompt() {
    let vision = ScriptedVision::replying("{}");
    let app = TestApp::new(vision.clone());

    let resp = app
        .router
        .clone()
        .oneshot(upload_request(multipart_body("image", "plain.png", b"img")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        vision.last_instruction.lock().unwrap().as_deref(),
        Some(sat_triage::DEFAULT_INSTRUCTION)
    );
}

#[tokio::test]
async fn health_reports_model() {
    let app = TestApp::new(ScriptedVision::replying("{}"));

    let resp = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model"], "scripted");
}
