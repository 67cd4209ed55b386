use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use std::fmt;

/// Expand a printed year to a full calendar year.
///
/// Two digits read as `20YY` (no century rollover); four digits are used verbatim.
/// Any other width, or a non-digit, is rejected.
pub fn expand_year(digits: &str) -> Option<i32> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = digits.parse().ok()?;
    match digits.len() {
        2 => Some(2000 + year),
        4 => Some(year),
        _ => None,
    }
}

/// A calendar month printed on a label, e.g. `05/26`.
///
/// Construction validates the month/year pair and precomputes the month bounds, so every
/// accessor is infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpiryMonth {
    first: NaiveDate,
    last: NaiveDate,
    expires_at: NaiveDateTime,
}

impl fmt::Display for ExpiryMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month(), self.year())
    }
}

impl ExpiryMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        // Calendar years start at 1; chrono's proleptic year 0 is not a printable date.
        if year < 1 {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        // First of the following month, minus one day. Month length and leap years fall out
        // of the calendar arithmetic.
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        let expires_at = last.and_hms_opt(23, 59, 59)?;
        Some(ExpiryMonth { first, last, expires_at })
    }

    /// Build from the raw digit strings of a match (`"05"`, `"26"` or `"2026"`).
    pub fn parse(month_digits: &str, year_digits: &str) -> Option<Self> {
        let month: u32 = month_digits.parse().ok()?;
        Self::new(expand_year(year_digits)?, month)
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    /// Last calendar day of the month.
    pub fn last_day(self) -> NaiveDate {
        self.last
    }

    /// 23:59:59 on the last day of the month: the moment the label stops being valid.
    pub fn end_instant(self) -> NaiveDateTime {
        self.expires_at
    }
}
