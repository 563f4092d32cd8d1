//! HTTP surface
//!
//! ```text
//! POST /analyze   multipart field `image` → {"analysis": Decision}
//! GET  /health    → {"status": "ok", "model": ...}
//! ```

mod analyze_routes;

pub use analyze_routes::{create_analyze_router, AnalyzeResponse, ApiState};

use axum::{extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Full application router with CORS, request tracing and an upload size limit.
pub fn create_app(state: ApiState, max_upload_bytes: usize) -> Router {
    create_analyze_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}
