use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Words that mark the date after them as an expiry date.
pub const DEFAULT_KEYWORDS: &[&str] = &["EXP", "EXP.", "EXPIRY", "USE BY", "BEST BY"];

/// Month `01`–`12`, a `/` or `-` separator (optionally padded), then a 2- or 4-digit year.
const DATE_PATTERN: &str = r"(0[1-9]|1[0-2])\s*[/\-]\s*([0-9]{4}|[0-9]{2})\b";

/// Characters allowed between a keyword and its date.
const KEYWORD_GAP: &str = r"[:\-\s]*";

#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("Keyword vocabulary is empty")]
    Empty,
    #[error("Keyword at position {0} is blank")]
    Blank(usize),
    #[error("Keyword pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// A keyword vocabulary compiled into the candidate scanning pattern.
///
/// Capture groups of [`KeywordSet::pattern`]: 1 = keyword (optional), 2 = month, 3 = year.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    words: Vec<String>,
    pattern: Regex,
}

impl KeywordSet {
    pub fn new<I, S>(words: I) -> Result<Self, KeywordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(KeywordError::Empty);
        }
        if let Some(pos) = words.iter().position(|w| w.trim().is_empty()) {
            return Err(KeywordError::Blank(pos));
        }

        // Longest first: the alternation is leftmost-first, not longest-match.
        let mut alternatives: Vec<String> = words.iter().map(|w| keyword_regex(w)).collect();
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        alternatives.dedup();

        let pattern = Regex::new(&format!(
            r"(?i)(?:({}){KEYWORD_GAP})?{DATE_PATTERN}",
            alternatives.join("|")
        ))?;
        Ok(KeywordSet { words, pattern })
    }

    /// The built-in vocabulary, compiled once per process.
    pub fn standard() -> &'static KeywordSet {
        static STANDARD: OnceLock<KeywordSet> = OnceLock::new();
        STANDARD.get_or_init(|| {
            KeywordSet::new(DEFAULT_KEYWORDS.iter().copied()).expect("invalid default keywords")
        })
    }

    /// The built-in vocabulary followed by `extra` words.
    pub fn extended<I, S>(extra: I) -> Result<Self, KeywordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = DEFAULT_KEYWORDS
            .iter()
            .map(|w| w.to_string())
            .chain(extra.into_iter().map(Into::into));
        Self::new(words)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Regex fragment for a single keyword. Inner whitespace matches any run of whitespace;
/// word boundaries are only asserted on edges that are word characters, so `EXP.` still
/// matches when followed by a space.
fn keyword_regex(word: &str) -> String {
    let word = word.trim();
    let body = word
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let is_word_char = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word_char(word.chars().next()) { r"\b" } else { "" };
    let trail = if is_word_char(word.chars().last()) { r"\b" } else { "" };
    format!("{lead}{body}{trail}")
}
