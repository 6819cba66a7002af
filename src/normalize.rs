//! Canonical text form for vectorizing Korean news bodies.
//!
//! Only Hangul syllables, ASCII digits and whitespace survive; every other
//! character (Latin script, punctuation, CJK ideographs, emoji) becomes a
//! space. This is a domain-specific cleaner for Korean-language news, not a
//! general-purpose one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static NON_CANONICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^가-힣0-9\s]").expect("static regex is valid"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("static regex is valid"));

/// Reduce `text` to Hangul syllables, ASCII digits and single spaces.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use news_dedup::normalize::normalize;
/// assert_eq!(normalize("  [속보] 환율 1,400원 돌파!! "), "속보 환율 1 400원 돌파");
/// ```
pub fn normalize(text: &str) -> String {
    let stripped = NON_CANONICAL.replace_all(text, " ");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Text of a record field as the cleaner sees it: a missing field or
/// anything but a JSON string is empty text.
pub fn text_value(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}
