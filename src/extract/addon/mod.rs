//! ADD-ON labels: coatings, colors, textures and functional finishes.
//!
//! The full profile runs three set transforms in sequence: table features,
//! then colors, then cross-label cleanup. The composite profile is a much
//! smaller color-plus-marker tagger.

mod cleanup;
mod colors;
mod composite;
mod features;

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::normalize::fold;

/// Output when no label applies.
pub const NO_ADD_ONS: &str = "-";

/// Labels collected so far. Ordered, so the final list comes out sorted.
pub(crate) type LabelSet = BTreeSet<&'static str>;

/// A description prepared for the rule tables.
#[derive(Debug, Clone)]
pub(crate) struct Text {
    pub upper: String,
    /// `upper` with every global negation phrase blanked out.
    pub masked: String,
}

impl Text {
    pub(crate) fn new(text: &str) -> Self {
        let upper = fold(text);
        let masked = features::GLOBAL_NEGATION_RES
            .iter()
            .fold(upper.clone(), |acc, (re, _)| re.replace_all(&acc, " ").into_owned());
        Text { upper, masked }
    }

    /// Whether a global negation phrase covering `label` is present.
    pub(crate) fn globally_negated(&self, label: &str) -> bool {
        features::GLOBAL_NEGATION_RES
            .iter()
            .any(|(re, covers)| covers.iter().any(|c| *c == label) && re.is_match(&self.upper))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AddOnProfile {
    /// Rule-table tagger with negation handling.
    #[default]
    Full,
    /// One "COLOR SOFT HI/HO" label per detected color.
    Composite,
}

impl AddOnProfile {
    pub fn extract(self, text: &str) -> String {
        match self {
            AddOnProfile::Full => extract_add_ons(text),
            AddOnProfile::Composite => {
                let labels = composite::composite_labels(&Text::new(text));
                if labels.is_empty() {
                    NO_ADD_ONS.to_string()
                } else {
                    labels.join("; ")
                }
            }
        }
    }
}

/// Sorted, deduplicated labels of the full profile.
pub fn add_on_labels(text: &str) -> Vec<&'static str> {
    let text = Text::new(text);
    let labels = features::match_features(&text);
    let labels = colors::match_colors(&text, labels);
    cleanup::cleanup(&text, labels).into_iter().collect()
}

pub fn extract_add_ons(text: &str) -> String {
    let labels = add_on_labels(text);
    if labels.is_empty() {
        return NO_ADD_ONS.to_string();
    }
    labels.into_iter().join("; ")
}
