use std::path::Path;

use expiry_core::{Clock, SystemClock};
use thiserror::Error;
use tracing::debug;

use crate::checker::ExpiryChecker;
use crate::recognizer::{join_lines, OcrBackend, OcrError};
use crate::types::Verdict;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image payload is empty")]
    EmptyImage,
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Orchestrates: OCR → join lines → extract → select → verdict.
pub struct ExpiryPipeline<R: OcrBackend, C: Clock = SystemClock> {
    recognizer: R,
    checker: ExpiryChecker<C>,
}

impl<R: OcrBackend, C: Clock> ExpiryPipeline<R, C> {
    pub fn new(recognizer: R, checker: ExpiryChecker<C>) -> Self {
        Self { recognizer, checker }
    }

    /// The text-only half of the pipeline, for callers that already have a transcription.
    pub fn checker(&self) -> &ExpiryChecker<C> {
        &self.checker
    }

    /// Process an image on disk.
    pub async fn process_file(&self, path: &Path) -> Result<Verdict, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        self.process_bytes(&bytes)
    }

    /// Process raw image bytes (upload or camera capture). Blocks for the duration of OCR.
    pub fn process_bytes(&self, data: &[u8]) -> Result<Verdict, PipelineError> {
        if data.is_empty() {
            return Err(PipelineError::EmptyImage);
        }
        let lines = self.recognizer.recognize(data)?;
        let full_text = join_lines(&lines);
        debug!(lines = lines.len(), text = %full_text, "OCR result");
        Ok(self.checker.check(&full_text))
    }
}
