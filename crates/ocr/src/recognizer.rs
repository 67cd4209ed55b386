use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("OCR engine not available; build with the `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR engine.
/// Implementations accept raw PNG/JPEG image bytes and return the recognized text lines in
/// reading order.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
        (**self).recognize(image_bytes)
    }
}

/// Join engine output into the single transcription the expiry checker reads.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns pre-set lines, useful for exercising the expiry pipeline without an engine.
pub struct MockRecognizer {
    pub lines: Vec<String>,
}

impl MockRecognizer {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
        Ok(self.lines.clone())
    }
}

/// Stand-in when no engine is compiled in or the engine failed to start.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        /// Fails fast if the language data cannot be loaded.
        pub fn new(data_path: Option<String>, lang: &str) -> Result<Self, OcrError> {
            LepTess::new(data_path.as_deref(), lang).map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(Self { data_path, lang: lang.to_string() })
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
            // LepTess is not Sync; one instance per call.
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let text = lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect())
        }
    }
}
