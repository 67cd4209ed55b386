//! HTTP routes for expiry checking.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use expiry_core::Clock;
use expiry_ocr::{ExpiryPipeline, OcrBackend, Verdict};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

pub type SharedPipeline = Arc<ExpiryPipeline<Box<dyn OcrBackend>, Box<dyn Clock>>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: SharedPipeline,
}

impl AppState {
    pub fn new(pipeline: ExpiryPipeline<Box<dyn OcrBackend>, Box<dyn Clock>>) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Deserialize)]
pub struct TextRequest {
    pub text: String,
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/check-expiry", post(check_expiry))
        .route("/check-expiry/text", post(check_expiry_text))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// OCR an uploaded label image and judge its expiry date.
async fn check_expiry(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Verdict>, ApiError> {
    let request_id = Uuid::new_v4();

    let mut image = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        // A part without a filename is a plain form value, not an upload.
        match field.file_name() {
            None => continue,
            Some("") => return Err(ApiError::NoFilename),
            Some(_) => {}
        }
        image = Some(field.bytes().await?);
        break;
    }
    let image = image.ok_or(ApiError::MissingImage)?;
    info!(%request_id, bytes = image.len(), "processing expiry check");

    // OCR is CPU-bound; keep it off the async workers.
    let pipeline = state.pipeline.clone();
    let verdict = tokio::task::spawn_blocking(move || pipeline.process_bytes(&image))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    info!(
        %request_id,
        found = verdict.found(),
        is_valid = ?verdict.is_valid,
        "expiry check complete"
    );
    Ok(Json(verdict))
}

/// Judge an already-transcribed OCR text.
async fn check_expiry_text(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Json<Verdict> {
    Json(state.pipeline.checker().check(&request.text))
}
