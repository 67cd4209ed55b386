use chrono::NaiveDateTime;
use expiry_core::{Clock, SystemClock};
use tracing::{debug, info};

use crate::extract::Extractor;
use crate::keywords::KeywordSet;
use crate::select::select_best;
use crate::types::Verdict;

/// Decides whether the product in an OCR transcription is still within its expiry date.
///
/// Holds no per-call state; one checker can serve any number of threads.
#[derive(Debug, Clone)]
pub struct ExpiryChecker<C: Clock = SystemClock> {
    extractor: Extractor,
    clock: C,
}

impl ExpiryChecker<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ExpiryChecker<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ExpiryChecker<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { extractor: Extractor::default(), clock }
    }

    pub fn with_keywords(keywords: KeywordSet, clock: C) -> Self {
        Self { extractor: Extractor::new(keywords), clock }
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn check(&self, ocr_text: &str) -> Verdict {
        evaluate(&self.extractor, ocr_text, self.clock.now())
    }
}

/// Extract, select and judge against `now`. Same inputs always give the same verdict.
pub fn evaluate(extractor: &Extractor, ocr_text: &str, now: NaiveDateTime) -> Verdict {
    let candidates = extractor.candidates(ocr_text);
    let Some((best, rule)) = select_best(&candidates) else {
        debug!("no expiry date pattern found in OCR text");
        return Verdict::not_found(ocr_text);
    };

    let expires_at = best.expires_at();
    // Still valid through the final second of the month; expired only once `now` passes it.
    let is_valid = expires_at > now;
    info!(
        text = %best.text,
        %expires_at,
        %rule,
        candidates = candidates.len(),
        is_valid,
        "expiry verdict"
    );

    Verdict {
        detected_text: Some(best.text.clone()),
        is_valid: Some(is_valid),
        parsed_date: Some(expires_at.date()),
        full_text: ocr_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use expiry_core::{ExpiryMonth, FixedClock};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn checker_at(now: NaiveDateTime) -> ExpiryChecker<FixedClock> {
        ExpiryChecker::with_clock(FixedClock::new(now))
    }

    #[test]
    fn scenario_keyword_date_with_manufacture_date() {
        let v = checker_at(at(2025, 1, 1)).check("EXP: 05-2026 other text MFG 01/2024");
        assert_eq!(v.detected_text.as_deref(), Some("05/2026"));
        assert_eq!(v.parsed_date, NaiveDate::from_ymd_opt(2026, 5, 31));
        assert_eq!(v.is_valid, Some(true));
        assert_eq!(v.full_text, "EXP: 05-2026 other text MFG 01/2024");
    }

    #[test]
    fn keyword_priority_over_later_plain_date() {
        let v = checker_at(at(2025, 1, 1)).check("LOT 4471 03/24 EXP 07/26");
        assert_eq!(v.detected_text.as_deref(), Some("07/26"));

        // The keyworded date wins even when it is the earlier one.
        let v = checker_at(at(2025, 1, 1)).check("12/29 EXP 07/26");
        assert_eq!(v.detected_text.as_deref(), Some("07/26"));
    }

    #[test]
    fn latest_wins_without_keyword() {
        let v = checker_at(at(2024, 6, 1)).check("MFD 01/23 09/25");
        assert_eq!(v.detected_text.as_deref(), Some("09/25"));
        assert_eq!(v.parsed_date, NaiveDate::from_ymd_opt(2025, 9, 30));
        assert_eq!(v.is_valid, Some(true));
    }

    #[test]
    fn no_match_yields_null_fields() {
        let v = checker_at(at(2025, 1, 1)).check("random receipt no dates here");
        assert_eq!(v, Verdict::not_found("random receipt no dates here"));
    }

    #[test]
    fn empty_text_yields_null_fields() {
        let v = checker_at(at(2025, 1, 1)).check("");
        assert!(!v.found());
        assert_eq!(v.full_text, "");
    }

    #[test]
    fn boundary_instant_is_expired() {
        let end = ExpiryMonth::parse("05", "26").unwrap().end_instant();
        let v = checker_at(end).check("EXP 05/26");
        assert_eq!(v.is_valid, Some(false));
    }

    #[test]
    fn one_second_before_boundary_is_valid() {
        let end = ExpiryMonth::parse("05", "26").unwrap().end_instant();
        let v = checker_at(end - Duration::seconds(1)).check("EXP 05/26");
        assert_eq!(v.is_valid, Some(true));
    }

    #[test]
    fn past_date_is_expired() {
        let v = checker_at(at(2025, 1, 1)).check("USE BY 11/2024");
        assert_eq!(v.detected_text.as_deref(), Some("11/2024"));
        assert_eq!(v.parsed_date, NaiveDate::from_ymd_opt(2024, 11, 30));
        assert_eq!(v.is_valid, Some(false));
    }

    #[test]
    fn repeated_checks_are_identical() {
        let checker = checker_at(at(2025, 3, 15));
        let text = "BEST BY 02/24 MFG 01/22 05/27";
        let first = checker.check(text);
        for _ in 0..5 {
            assert_eq!(checker.check(text), first);
        }
        assert_eq!(evaluate(checker.extractor(), text, at(2025, 3, 15)), first);
    }

    #[test]
    fn year_zero_keyword_date_is_dropped() {
        let v = checker_at(at(2025, 1, 1)).check("EXP 05/0000 MFG 01/26");
        assert_eq!(v.detected_text.as_deref(), Some("01/26"));
        assert_eq!(v.parsed_date, NaiveDate::from_ymd_opt(2026, 1, 31));
        assert_eq!(v.is_valid, Some(true));
    }

    #[test]
    fn custom_vocabulary_changes_priority() {
        let keywords = KeywordSet::new(["VENCE"]).unwrap();
        let checker = ExpiryChecker::with_keywords(keywords, FixedClock::new(at(2025, 1, 1)));
        let v = checker.check("VENCE 02/26 12/27");
        assert_eq!(v.detected_text.as_deref(), Some("02/26"));
    }

    #[test]
    fn checker_is_shareable_across_threads() {
        let checker = std::sync::Arc::new(checker_at(at(2025, 1, 1)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let checker = checker.clone();
                std::thread::spawn(move || checker.check("EXP 05/26"))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().is_valid, Some(true));
        }
    }
}
