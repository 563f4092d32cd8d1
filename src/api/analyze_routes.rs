//! Image upload and analysis routes.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use sat_triage_core::Decision;

use crate::error::AppError;
use crate::service::AnalysisService;
use crate::upload::StagedImage;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<AnalysisService>,
    pub upload_dir: PathBuf,
}

impl ApiState {
    pub fn new(service: AnalysisService, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            service: Arc::new(service),
            upload_dir: upload_dir.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: Decision,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
}

/// POST /analyze
/// Stage the uploaded image, analyse it, and return the decision.
async fn analyze_image(
    State(state): State<ApiState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Upload(e.body_text()))?;

    let mut staged = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let mime_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Upload(e.body_text()))?;
        staged = Some(StagedImage::stage(&state.upload_dir, filename, mime_type, bytes.to_vec()).await?);
        break;
    }

    let image = staged.ok_or(AppError::MissingUpload)?;
    let decision = state.service.analyze(&image).await?;
    Ok(Json(AnalyzeResponse { analysis: decision }))
}

/// GET /health
async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.service.model_name().to_string(),
    })
}

pub fn create_analyze_router(state: ApiState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_image))
        .route("/health", get(health))
        .with_state(state)
}
