use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::NOT_FOUND;
use crate::normalize::fold;

static AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bAIR\s*THRU(?:\s*NONWOVEN)?\b|\bAIR\s*THROUGH\b|\bAIRTHRU\b").unwrap()
});
static SM_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bS[SM]*M[SM]*S*\b").unwrap());
static SMS_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bSMS\sNON-WOVEN\sFABRIC\b|\bSMS\sNONWOVEN\b|\bSPUNMELT\s\(SMS\)").unwrap()
});
static SMS_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bSMS\b").unwrap());
static S_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bS(?:SSSBS|S{2,})\b").unwrap());
static SB_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:SPUNBOND|3S|HO\sSSS)\b").unwrap());
static MB_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bMELTBLOWN\b|\bMELT\sBLOWN\b").unwrap());
static NONWOVEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"NON-WOVEN(?:\sFABRIC)?|NON\sWOVEN(?:\sFABRIC)?|NONWOVEN(?:\sFABRIC)?").unwrap()
});

/// Nonwoven construction class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemCategory {
    #[serde(rename = "AT")]
    AirThrough,
    #[serde(rename = "SMS")]
    Sms,
    #[serde(rename = "SB")]
    Spunbond,
    #[serde(rename = "MB")]
    Meltblown,
    Nonwoven,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::AirThrough => "AT",
            ItemCategory::Sms => "SMS",
            ItemCategory::Spunbond => "SB",
            ItemCategory::Meltblown => "MB",
            ItemCategory::Nonwoven => "Nonwoven",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemClassification {
    pub category: Option<ItemCategory>,
    /// Uppercased text that decided the category; empty when nothing matched.
    pub matched_text: String,
}

impl ItemClassification {
    fn found(category: ItemCategory, matched: &str) -> Self {
        ItemClassification {
            category: Some(category),
            matched_text: matched.to_string(),
        }
    }

    fn not_found() -> Self {
        ItemClassification {
            category: None,
            matched_text: String::new(),
        }
    }

    /// Category label for the output column.
    pub fn label(&self) -> &'static str {
        self.category.map(|c| c.as_str()).unwrap_or(NOT_FOUND)
    }
}

/// Priority chain AT → SMS → SB → MB → Nonwoven; the first hit returns.
pub fn classify_item(text: &str) -> ItemClassification {
    let upper = fold(text);

    if let Some(m) = AT_RE.find(&upper) {
        return ItemClassification::found(ItemCategory::AirThrough, m.as_str());
    }

    if let Some(m) = SM_RUN_RE.find(&upper) {
        let token = m.as_str();
        if token.contains('S') && token.contains('M') {
            if SMS_PHRASE_RE.is_match(&upper) {
                return ItemClassification::found(ItemCategory::Sms, "SMS");
            }
            return ItemClassification::found(ItemCategory::Sms, token);
        }
    }
    // Residual bare SMS token with no other S/M run around it.
    if SMS_TOKEN_RE.is_match(&upper) && !SM_RUN_RE.is_match(&SMS_TOKEN_RE.replace(&upper, "")) {
        return ItemClassification::found(ItemCategory::Sms, "SMS");
    }

    if let Some(sb) = classify_spunbond(&upper) {
        return sb;
    }

    if let Some(m) = MB_RE.find(&upper) {
        return ItemClassification::found(ItemCategory::Meltblown, m.as_str());
    }

    if let Some(m) = NONWOVEN_RE.find(&upper) {
        return ItemClassification::found(ItemCategory::Nonwoven, m.as_str());
    }

    ItemClassification::not_found()
}

/// Spunbond only applies when the text carries no S/M run at all.
fn classify_spunbond(upper: &str) -> Option<ItemClassification> {
    if SM_RUN_RE.is_match(upper) || SMS_TOKEN_RE.is_match(upper) {
        return None;
    }
    if let Some(m) = S_RUN_RE.find(upper) {
        if !m.as_str().contains('M') {
            return Some(ItemClassification::found(ItemCategory::Spunbond, m.as_str()));
        }
    }
    SB_KEYWORD_RE
        .find(upper)
        .map(|m| ItemClassification::found(ItemCategory::Spunbond, m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(text: &str) -> Option<ItemCategory> {
        classify_item(text).category
    }

    #[test]
    fn air_through_first() {
        let c = classify_item("air thru nonwoven SMS");
        assert_eq!(c.category, Some(ItemCategory::AirThrough));
        assert_eq!(c.matched_text, "AIR THRU NONWOVEN");
        assert_eq!(category("AIRTHRU 25GSM"), Some(ItemCategory::AirThrough));
    }

    #[test]
    fn sms_phrase_maps_to_canonical_token() {
        let c = classify_item("SMS NONWOVEN FABRIC");
        assert_eq!(c.category, Some(ItemCategory::Sms));
        assert_eq!(c.matched_text, "SMS");
    }

    #[test]
    fn sms_variants_keep_their_token() {
        let c = classify_item("ssmmms 35gsm");
        assert_eq!(c.category, Some(ItemCategory::Sms));
        assert_eq!(c.matched_text, "SSMMMS");
        assert_eq!(classify_item("SMMS BLUE").matched_text, "SMMS");
    }

    #[test]
    fn spunbond_run_and_keyword() {
        let c = classify_item("SPUNBOND SSS NONWOVEN");
        assert_eq!(c.category, Some(ItemCategory::Spunbond));
        assert_eq!(c.matched_text, "SSS");
        assert_eq!(classify_item("PP SPUNBOND").matched_text, "SPUNBOND");
        assert_eq!(classify_item("SSSSBS 15G").matched_text, "SSSSBS");
        assert_eq!(classify_item("HO SSS").matched_text, "SSS");
    }

    #[test]
    fn spunbond_loses_to_sms_anywhere() {
        assert_eq!(category("SPUNBOND LAYER OF SMS"), Some(ItemCategory::Sms));
    }

    #[test]
    fn meltblown_and_generic() {
        assert_eq!(category("Melt Blown filter"), Some(ItemCategory::Meltblown));
        let c = classify_item("non-woven fabric roll");
        assert_eq!(c.category, Some(ItemCategory::Nonwoven));
        assert_eq!(c.matched_text, "NON-WOVEN FABRIC");
    }

    #[test]
    fn nothing_matches() {
        let c = classify_item("COTTON TOWEL");
        assert_eq!(c.category, None);
        assert_eq!(c.label(), NOT_FOUND);
        assert!(c.matched_text.is_empty());
    }
}
