//! The four description extractors and the merged record they produce.

pub mod addon;
pub mod gsm;
pub mod item;
pub mod width;

use serde::Serialize;

pub use addon::{add_on_labels, extract_add_ons, AddOnProfile, NO_ADD_ONS};
pub use gsm::extract_gsm;
pub use item::{classify_item, ItemCategory, ItemClassification};
pub use width::extract_width;

/// Sentinel for GSM, WIDTH and ITEM when nothing matched.
pub const NOT_FOUND: &str = "N/A";

/// Attributes of one description, keyed by their output column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    #[serde(rename = "GSM")]
    pub gsm: String,
    #[serde(rename = "WIDTH")]
    pub width: String,
    #[serde(rename = "ITEM")]
    pub item: String,
    pub item_match: String,
    #[serde(rename = "ADD ON")]
    pub add_on: String,
}

pub fn extract_all(text: &str, profile: AddOnProfile) -> ExtractionResult {
    let item = classify_item(text);
    ExtractionResult {
        gsm: extract_gsm(text),
        width: extract_width(text),
        item: item.label().to_string(),
        item_match: item.matched_text,
        add_on: profile.extract(text),
    }
}
