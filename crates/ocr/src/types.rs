use chrono::{NaiveDate, NaiveDateTime};
use expiry_core::ExpiryMonth;
use serde::{Deserialize, Serialize};

/// One date-like hit in the OCR text, exactly as printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMatch<'t> {
    pub keyword: Option<&'t str>,
    /// Two digits, `01`–`12`.
    pub month: &'t str,
    /// Two or four digits.
    pub year: &'t str,
}

/// A normalized expiry date extracted from OCR text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// `MM/YY` or `MM/YYYY`, year width as printed.
    pub text: String,
    pub month: ExpiryMonth,
    pub has_keyword: bool,
}

impl Candidate {
    /// Last second of the printed month.
    pub fn expires_at(&self) -> NaiveDateTime {
        self.month.end_instant()
    }
}

/// Which selection rule picked the winning candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    /// First candidate preceded by a keyword.
    Keyword,
    /// Only one candidate was found.
    Only,
    /// Latest of several keyword-less candidates.
    Latest,
}

impl std::fmt::Display for SelectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionRule::Keyword => write!(f, "keyword"),
            SelectionRule::Only => write!(f, "only"),
            SelectionRule::Latest => write!(f, "latest"),
        }
    }
}

/// The answer for one OCR transcription.
///
/// Date fields are all `None` together, and only when no candidate could be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "expiry_text_detected")]
    pub detected_text: Option<String>,
    pub is_valid: Option<bool>,
    /// Last day of the expiry month.
    #[serde(rename = "parsed_expiry_date")]
    pub parsed_date: Option<NaiveDate>,
    #[serde(rename = "full_ocr_text")]
    pub full_text: String,
}

impl Verdict {
    pub fn not_found(full_text: impl Into<String>) -> Self {
        Verdict {
            detected_text: None,
            is_valid: None,
            parsed_date: None,
            full_text: full_text.into(),
        }
    }

    pub fn found(&self) -> bool {
        self.detected_text.is_some()
    }
}
