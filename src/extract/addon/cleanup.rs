use std::sync::LazyLock;

use regex::Regex;

use super::features::{ADHESIVE, COATED, FEATURES, SPECIFIC_COATINGS};
use super::{LabelSet, Text};

static COATED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bCOATED\b").unwrap());
static NEGATED_COATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bNOT\sCOATED\b|\bUNCOATED\b").unwrap());
static GLUE_COATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bCOATED\sWITH\sGLUE\b|\bGLUE-COATED\b").unwrap());
static SPECIFIC_COATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bPU\sCOATED\b|\bPVC\sCOATED\b|\bPE\sCOATED\b|\bHDPE\sCOATED\b|\bHDPE\sGLUE\sON\sTHE\sSURFACE\b|\bTHERMOPLASTIC\sCOATED\b",
    )
    .unwrap()
});

/// Pass 3: cross-label rules over the merged feature and color labels.
pub(crate) fn cleanup(text: &Text, labels: LabelSet) -> LabelSet {
    let labels = drop_generic_coating(text, labels);
    let labels = drop_glue_coating(text, labels);
    let labels = reapply_global_negations(text, labels);
    prune_redundant(labels)
}

fn has_specific_coating(labels: &LabelSet) -> bool {
    SPECIFIC_COATINGS.iter().any(|c| labels.contains(c))
}

/// A named coating makes a bare "Coated" redundant unless "coated" is also
/// said on its own, or the coating is glue backing an Adhesive label.
fn drop_generic_coating(text: &Text, mut labels: LabelSet) -> LabelSet {
    if !labels.contains(COATED) || !has_specific_coating(&labels) {
        return labels;
    }
    let stripped = SPECIFIC_COATING_RE.replace_all(&text.upper, " ");
    let independent = COATED_RE.is_match(&stripped) && !NEGATED_COATED_RE.is_match(&text.upper);
    let glue = GLUE_COATED_RE.is_match(&text.upper) && labels.contains(ADHESIVE);
    if !independent && !glue {
        labels.remove(COATED);
    }
    labels
}

/// "Coated" that only comes from "coated with glue" is the Adhesive label's business.
fn drop_glue_coating(text: &Text, mut labels: LabelSet) -> LabelSet {
    if !labels.contains(ADHESIVE) || !labels.contains(COATED) || !GLUE_COATED_RE.is_match(&text.upper) {
        return labels;
    }
    let stripped = GLUE_COATED_RE.replace_all(&text.upper, " ");
    let other_coating = has_specific_coating(&labels)
        || (COATED_RE.is_match(&stripped) && !NEGATED_COATED_RE.is_match(&stripped));
    if !other_coating {
        labels.remove(COATED);
    }
    labels
}

fn reapply_global_negations(text: &Text, labels: LabelSet) -> LabelSet {
    labels
        .into_iter()
        .filter(|label| {
            FEATURES
                .iter()
                .find(|f| f.id == *label)
                .map_or(true, |f| f.survives_global_negation(text))
        })
        .collect()
}

fn prune_redundant(labels: LabelSet) -> LabelSet {
    let redundant: Vec<&str> = FEATURES
        .iter()
        .filter(|f| labels.contains(f.id) && f.suppressed_by.iter().any(|s| labels.contains(s)))
        .map(|f| f.id)
        .collect();
    labels
        .into_iter()
        .filter(|label| !redundant.contains(label))
        .collect()
}
