use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

/// Formats tried during general date parsing, before the substring
/// fallbacks. Covers ISO, US slash/dash, and written month forms.
const GENERAL_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Substring fallback patterns, in priority order. The `bool` marks
/// year-first capture order. Two-part numeric dates are read month-first
/// (US convention) unconditionally; there is no day>12 disambiguation.
fn fallback_patterns() -> &'static [(Regex, bool)] {
    static PATTERNS: OnceLock<Vec<(Regex, bool)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("static date pattern"), true),
            (Regex::new(r"(\d{2})/(\d{2})/(\d{4})").expect("static date pattern"), false),
            (Regex::new(r"(\d{2})-(\d{2})-(\d{4})").expect("static date pattern"), false),
        ]
    })
}

/// Normalize a raw date cell to a calendar date.
///
/// General parsing first, then the fixed substring patterns. A pattern hit
/// that is not a real calendar date (month 13, day 45) fails instead of
/// passing through. Total: never panics, `None` means "invalid date format".
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in GENERAL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    if let Ok(stamp) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }

    for (pattern, year_first) in fallback_patterns() {
        if let Some(caps) = pattern.captures(raw) {
            let (y, m, d) = if *year_first {
                (&caps[1], &caps[2], &caps[3])
            } else {
                (&caps[3], &caps[1], &caps[2])
            };
            // First matching pattern decides; an invalid date under it is a
            // failure, not a cue to try the next pattern.
            return NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?);
        }
    }

    None
}

/// Normalize a raw amount cell to a non-negative decimal.
///
/// Strips currency symbols, thousands separators, and whitespace; unwraps
/// accounting-style parentheses; then parses (plain, then scientific) and
/// takes the absolute value. Sign is discarded: the canonical
/// record does not distinguish debits from credits. Zero and sub-cent
/// values are valid.
pub fn normalize_amount(raw: &str) -> Option<Decimal> {
    let mut s = raw.trim();
    if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
        s = s[1..s.len() - 1].trim();
    }

    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | '₹' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    Some(value.abs())
}

/// Trim an optional text cell; an absent or all-whitespace cell becomes "".
pub fn clean_text(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_string()
}
