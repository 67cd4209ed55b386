use expiry_core::ExpiryMonth;
use tracing::debug;

use crate::keywords::KeywordSet;
use crate::types::{Candidate, RawMatch};

/// Finds expiry-date candidates in OCR text.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    keywords: KeywordSet,
}

impl Extractor {
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Every date-like token in `text`, left to right, non-overlapping.
    pub fn scan<'t>(&self, text: &'t str) -> Vec<RawMatch<'t>> {
        self.keywords
            .pattern()
            .captures_iter(text)
            .filter_map(|c| {
                Some(RawMatch {
                    keyword: c.get(1).map(|m| m.as_str()),
                    month: c.get(2)?.as_str(),
                    year: c.get(3)?.as_str(),
                })
            })
            .collect()
    }

    /// Scan and normalize. Matches that do not form a calendar month are dropped.
    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        self.scan(text)
            .iter()
            .filter_map(|raw| {
                let candidate = normalize(raw);
                match &candidate {
                    Some(c) => debug!(
                        text = %c.text,
                        expires_at = %c.expires_at(),
                        keyword = raw.keyword.unwrap_or(""),
                        "expiry candidate"
                    ),
                    None => debug!(month = raw.month, year = raw.year, "unparseable date dropped"),
                }
                candidate
            })
            .collect()
    }
}

/// Turn a raw match into a candidate, or `None` if it is not a real month.
pub fn normalize(raw: &RawMatch<'_>) -> Option<Candidate> {
    let month = ExpiryMonth::parse(raw.month, raw.year)?;
    Some(Candidate {
        text: format!("{}/{}", raw.month, raw.year),
        month,
        has_keyword: raw.keyword.is_some_and(|k| !k.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn extractor() -> Extractor {
        Extractor::default()
    }

    // ── Scanning ──────────────────────────────────────────────────────────────

    #[test]
    fn scan_captures_keyword_month_and_year() {
        let m = extractor().scan("EXP: 05-2026 other text MFG 01/2024");
        assert_eq!(
            m,
            vec![
                RawMatch { keyword: Some("EXP"), month: "05", year: "2026" },
                RawMatch { keyword: None, month: "01", year: "2024" },
            ]
        );
    }

    #[test]
    fn scan_accepts_padded_separator() {
        let m = extractor().scan("USE BY 11 / 27");
        assert_eq!(m, vec![RawMatch { keyword: Some("USE BY"), month: "11", year: "27" }]);
    }

    #[test]
    fn scan_rejects_out_of_range_month() {
        assert!(extractor().scan("13/26 00/26").is_empty());
    }

    #[test]
    fn scan_rejects_three_and_five_digit_years() {
        assert!(extractor().scan("05/202 x").is_empty());
        assert!(extractor().scan("05/20265").is_empty());
    }

    #[test]
    fn scan_requires_word_boundary_after_year() {
        assert!(extractor().scan("05/26AB").is_empty());
    }

    #[test]
    fn scan_preserves_text_order() {
        let m = extractor().scan("09/25 then 01/23 then EXP 03/24");
        let months: Vec<&str> = m.iter().map(|r| r.month).collect();
        assert_eq!(months, ["09", "01", "03"]);
    }

    #[test]
    fn scan_empty_text() {
        assert!(extractor().scan("").is_empty());
    }

    #[test]
    fn scan_does_not_panic_on_garbage() {
        let _ = extractor().scan("!@#$%^&*()\n\0\x01\x02 ////---- 1/ /2 \u{fffd}");
    }

    #[test]
    fn scan_long_text() {
        let text = "noise ".repeat(50_000) + "EXP 08/29";
        let m = extractor().scan(&text);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].keyword, Some("EXP"));
    }

    // ── Normalization ─────────────────────────────────────────────────────────

    #[test]
    fn normalize_keeps_printed_year_width() {
        let c = normalize(&RawMatch { keyword: None, month: "05", year: "26" }).unwrap();
        assert_eq!(c.text, "05/26");
        assert_eq!(c.month.year(), 2026);
    }

    #[test]
    fn normalize_uses_slash_separator() {
        let c = normalize(&RawMatch { keyword: Some("EXP"), month: "05", year: "2026" }).unwrap();
        assert_eq!(c.text, "05/2026");
        assert!(c.has_keyword);
    }

    #[test]
    fn normalize_drops_invalid_month() {
        assert!(normalize(&RawMatch { keyword: None, month: "14", year: "26" }).is_none());
    }

    #[test]
    fn normalize_blank_keyword_is_not_a_keyword() {
        let c = normalize(&RawMatch { keyword: Some(" "), month: "05", year: "26" }).unwrap();
        assert!(!c.has_keyword);
    }

    #[test]
    fn candidates_compute_end_of_month() {
        let cs = extractor().candidates("BEST BY 02/24");
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].month.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(cs[0].has_keyword);
    }

    #[test]
    fn candidates_none_for_plain_text() {
        assert!(extractor().candidates("random receipt no dates here").is_empty());
    }
}
