//! Attribute extraction for nonwoven-fabric product descriptions.
//!
//! The extractors in [`extract`] are pure functions of one description string.
//! [`workbook`], [`pipeline`] and [`db`] feed them from spreadsheets and store
//! their output.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod workbook;

pub use error::{Error, Result};
pub use extract::{
    add_on_labels, classify_item, extract_add_ons, extract_all, extract_gsm, extract_width,
    AddOnProfile, ExtractionResult, ItemCategory, ItemClassification, NOT_FOUND, NO_ADD_ONS,
};
