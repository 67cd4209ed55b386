//! HTTP front end for the expiry checker.
//!
//! ```bash
//! PORT=5002 expiry-server
//! curl -F image=@label.jpg http://localhost:5002/check-expiry
//! ```

mod config;
mod error;
mod routes;
mod telemetry;

use anyhow::Context;
use expiry_core::{Clock, SystemClock};
use expiry_ocr::{ExpiryChecker, ExpiryPipeline, OcrBackend};
use tracing::info;

use crate::config::{ServerConfig, TesseractConfig};
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_subscriber("expiry-server", telemetry::DEFAULT_FILTER)?;

    let config = ServerConfig::load().context("Failed to load configuration")?;
    let keywords = config.keyword_set()?;
    info!(keywords = ?keywords.words(), "keyword vocabulary loaded");

    let clock: Box<dyn Clock> = Box::new(SystemClock);
    let pipeline = ExpiryPipeline::new(
        build_recognizer(&config.tesseract),
        ExpiryChecker::with_keywords(keywords, clock),
    );
    let app = routes::router(AppState::new(pipeline), config.max_upload_bytes);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(feature = "tesseract")]
fn build_recognizer(config: &TesseractConfig) -> Box<dyn OcrBackend> {
    use expiry_ocr::recognizer::tesseract_backend::TesseractRecognizer;

    match TesseractRecognizer::new(config.data_path.clone(), &config.lang) {
        Ok(r) => {
            info!(lang = %config.lang, "Tesseract OCR engine initialized");
            Box::new(r)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize Tesseract; /check-expiry will answer 503");
            Box::new(expiry_ocr::UnavailableRecognizer)
        }
    }
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer(_config: &TesseractConfig) -> Box<dyn OcrBackend> {
    tracing::warn!("Built without an OCR engine; /check-expiry will answer 503");
    Box::new(expiry_ocr::UnavailableRecognizer)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown..."),
    }
}
