use std::sync::LazyLock;

use regex::Regex;

use super::{LabelSet, Text};

/// One color row. Compound names come before the generic names they refine.
struct ColorDef {
    label: &'static str,
    pattern: &'static str,
    suppressed_by: &'static [&'static str],
}

const fn color(label: &'static str, pattern: &'static str) -> ColorDef {
    ColorDef {
        label,
        pattern,
        suppressed_by: &[],
    }
}

const fn generic(
    label: &'static str,
    pattern: &'static str,
    suppressed_by: &'static [&'static str],
) -> ColorDef {
    ColorDef {
        label,
        pattern,
        suppressed_by,
    }
}

const COLOR_DEFS: &[ColorDef] = &[
    color("Light Beige", r"\bLIGHT\sBEIGE\b"),
    color("Silver Gray", r"\bSILVER\sGRAY\b"),
    color("Sky Blue", r"\bSKY\sBLUE\b"),
    color("Pale Mauve", r"\bPALE\sMAUVE\b"),
    color("Monk's Robe", r"\bMONK'S\sROBE\b"),
    color("Dress Blue", r"\bDRESS\sBLUE\b"),
    color("China Blue", r"\bCHINA\sBLUE\b"),
    color("Blue Nights", r"\bBLUE\sNIGHTS\b"),
    color("Chateau Rose", r"\bCHATEAU\sROSE\b"),
    color("Cloud Dancer", r"\bCLOUD\sDANCER\b"),
    color("Moonlite Mauve", r"\bMOONLITE\sMAUVE\b"),
    color("Purple Haze", r"\bPURPLE\sHAZE\b"),
    color("Love Potion", r"\bLOVE\sPOTION\b"),
    color("Baltic Sea", r"\bBALTIC\sSEA\b"),
    color("Cloudburst", r"\bCLOUDBURST\b"),
    color("Orange Popsicle", r"\bORANGE\sPOPSICLE\b"),
    color("Purple Rose", r"\bPURPLE\sROSE\b"),
    color("Bright White", r"\bBRIGHT\sWHITE\b"),
    color("Cool White", r"\bCOOL\sWHITE\b"),
    color("Classic White", r"\bCLASSIC\sWHITE\b"),
    color("Black Beauty", r"\bBLACK\sBEAUTY\b"),
    // Asparagus green is reported as plain green.
    color("Green", r"\bASPG\sGRN\b"),
    generic("White", r"\bWHITE\b", &["Bright White", "Cool White", "Classic White"]),
    generic("Black", r"\bBLACK\b", &["Black Beauty"]),
    color("Pink", r"\bPINK\b"),
    color("Green", r"\bGREEN\b"),
    generic("Blue", r"\bBLUE\b", &["Sky Blue", "Dress Blue", "China Blue", "Blue Nights", "Baltic Sea"]),
    generic("Gray", r"\bGRAY\b", &["Silver Gray"]),
    generic("Grey", r"\bGREY\b", &["Silver Gray"]),
    generic("Beige", r"\bBEIGE\b", &["Light Beige"]),
    color("Turquoise", r"\bTURQUOISE\b"),
    color("Charcoal", r"\bCHARCOAL\b"),
    color("Cream", r"\bCREAM\b"),
    color("Salsa", r"\bSALSA\b"),
    color("Fedora", r"\bFEDORA\b"),
    color("Caviar", r"\bCAVIAR\b"),
    color("Tomato", r"\bTOMATO\b"),
    color("Humus", r"\bHUMUS\b"),
    color("Cork", r"\bCORK\b"),
    color("Periscope", r"\bPERISCOPE\b"),
    color("Mediterranea", r"\bMEDITERRANEA\b"),
];

/// Spelling variants of one concept: (variant, canonical).
const ALIASES: &[(&str, &str)] = &[("Grey", "Gray")];

static COLORS: LazyLock<Vec<(Regex, &'static ColorDef)>> = LazyLock::new(|| {
    COLOR_DEFS
        .iter()
        .map(|def| (Regex::new(def.pattern).unwrap(), def))
        .collect()
});

/// Pass 2: colors on top of the feature labels.
pub(crate) fn match_colors(text: &Text, labels: LabelSet) -> LabelSet {
    let mut found = COLORS.iter().fold(labels, |mut found, (re, def)| {
        let refined = def.suppressed_by.iter().any(|s| found.contains(s));
        if !refined && re.is_match(&text.upper) {
            found.insert(def.label);
        }
        found
    });
    for (variant, canonical) in ALIASES {
        if found.contains(canonical) {
            found.remove(variant);
        }
    }
    found
}
