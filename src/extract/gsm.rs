use std::sync::LazyLock;

use regex::Regex;

use super::NOT_FOUND;
use crate::normalize::decimal;

static G_PER_M2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d[\d.,]*)\s*G/M2").unwrap());
static GSM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d[\d.,]*)\s*GSM").unwrap());
static GR_PER_M2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d[\d.,]*)\s*GR/M2").unwrap());
static WEIGHT_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:WEIGHT|AVERAGE WEIGHT|BASIS WEIGHT)\s*:?\s*(\d[\d.,]*)\s*G\b").unwrap()
});
static G_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d[\d.,]*)\s*G\s+(?:KIMLON|TYPE)").unwrap());
static BARE_G_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(\d[\d.,]*)\s*G\b").unwrap());
static GR_PER_YD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d[\d.,]*)\s*GR/YD").unwrap());

/// Areal weight in grams per square meter, or `"N/A"`.
///
/// Patterns are tried from most to least explicit; the first hit wins.
pub fn extract_gsm(text: &str) -> String {
    first_capture(&G_PER_M2_RE, text)
        .or_else(|| first_capture(&GSM_RE, text))
        .or_else(|| first_capture(&GR_PER_M2_RE, text))
        .or_else(|| first_capture(&WEIGHT_LABEL_RE, text))
        .or_else(|| first_capture(&G_TYPE_RE, text))
        .or_else(|| bare_grams(text))
        .or_else(|| first_capture(&GR_PER_YD_RE, text))
        .map(decimal)
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// A lone "15G" / "20 G". Rejected when the G turns out to start another unit
/// (GSM, G/M2, GR/M2) or is followed by a word that is not E, M or R-initial.
fn bare_grams(text: &str) -> Option<&str> {
    BARE_G_RE.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let rest = text[whole.end()..].trim_start();
        if rejects_bare_g(rest) {
            None
        } else {
            caps.get(1).map(|m| m.as_str())
        }
    })
}

fn rejects_bare_g(rest: &str) -> bool {
    let upper = rest.to_uppercase();
    if upper.starts_with("SM") || upper.starts_with("/M2") || upper.starts_with("R/M2") {
        return true;
    }
    match upper.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => !matches!(c, 'E' | 'M' | 'R'),
        _ => false,
    }
}
