//! Feature rule table for the full ADD-ON profile.
//!
//! Each row is matched against the uppercased description. A row applies when
//! any trigger matches and no negation does; the guard then decides the cases
//! that depend on surrounding text or on labels produced by earlier rows.

use std::sync::LazyLock;

use regex::Regex;

use super::{LabelSet, Text};
use crate::normalize::window;

pub(crate) const COATED: &str = "Coated";
pub(crate) const LAMINATED: &str = "Laminated";
pub(crate) const IMPREGNATED: &str = "Impregnated";
pub(crate) const ADHESIVE: &str = "Adhesive";
pub(crate) const PE_COATED: &str = "PE Coated";

pub(crate) const SPECIFIC_COATINGS: [&str; 5] =
    ["PU Coated", "PVC Coated", PE_COATED, "HDPE Coated", "Thermoplastic Coated"];

/// Compound phrases that negate several reserved labels at once.
pub(crate) const GLOBAL_NEGATIONS: &[(&str, &[&str])] = &[
    (r"\bNOT\sIMPREGNATED,\sCOATED\sOR\sLAMINATED\b", &[IMPREGNATED, COATED, LAMINATED]),
    (r"\bUNIMPREGNATED,\sUNCOATED,\sUNLAMINATED\b", &[IMPREGNATED, COATED, LAMINATED]),
    (r"\bNOT\sIMPREGNATED\sOR\sCOATED\b", &[IMPREGNATED, COATED]),
    (r"\bUNIMPREGNATED\sAND\sUNCOATED\b", &[IMPREGNATED, COATED]),
];

#[derive(Debug, Clone, Copy)]
pub(crate) enum Guard {
    None,
    /// Reserved label: suppressed by a global negation unless a trigger still
    /// matches with the negation masked out, or one of `rescued_by` is affirmed.
    GlobalNegation { rescued_by: &'static [&'static str] },
    /// Suppressed when one of `after` was already produced and every trigger
    /// occurrence sits within `radius` characters of `phrase`.
    InsidePhrase {
        phrase: &'static str,
        radius: usize,
        after: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FeatureDef {
    pub id: &'static str,
    pub triggers: &'static [&'static str],
    pub negations: &'static [&'static str],
    /// Negations that only count when no trigger survives stripping the phrase.
    pub soft_negations: &'static [&'static str],
    pub guard: Guard,
    /// Labels whose presence makes this one redundant.
    pub suppressed_by: &'static [&'static str],
}

const fn def(id: &'static str, triggers: &'static [&'static str]) -> FeatureDef {
    FeatureDef {
        id,
        triggers,
        negations: &[],
        soft_negations: &[],
        guard: Guard::None,
        suppressed_by: &[],
    }
}

const fn negated(
    id: &'static str,
    triggers: &'static [&'static str],
    negations: &'static [&'static str],
) -> FeatureDef {
    FeatureDef {
        negations,
        ..def(id, triggers)
    }
}

const fn reserved(
    id: &'static str,
    triggers: &'static [&'static str],
    negations: &'static [&'static str],
    rescued_by: &'static [&'static str],
) -> FeatureDef {
    FeatureDef {
        negations,
        guard: Guard::GlobalNegation { rescued_by },
        ..def(id, triggers)
    }
}

const fn redundant(
    id: &'static str,
    triggers: &'static [&'static str],
    suppressed_by: &'static [&'static str],
) -> FeatureDef {
    FeatureDef {
        suppressed_by,
        ..def(id, triggers)
    }
}

pub(crate) const FEATURE_DEFS: &[FeatureDef] = &[
    // Physical and mechanical
    def("PU Coated", &[r"\bPU\sCOATED\b", r"\bPOLYURETHANE\sCOATED\b"]),
    def("PVC Coated", &[r"\bPVC\sCOATED\b", r"\bVINYL\sCHLORIDE\s\(PVC\sPLASTIC\)"]),
    def(PE_COATED, &[r"\bPE\sCOATED\b"]),
    def("HDPE Coated", &[r"\bHDPE\s(?:GLUE\sON\sTHE\sSURFACE|COATED)\b"]),
    def("Thermoplastic Coated", &[r"\bTHERMOPLASTIC\s(?:NYLON\sPA|ADHESIVE|COATED)\b"]),
    reserved(
        LAMINATED,
        &[r"\bLAMINATED\b", r"\bMULTI-LAYER\sLAMINATED\b"],
        &[r"\bNOT\sLAMINATED\b", r"\bUNLAMINATED\b"],
        &[],
    ),
    reserved(
        COATED,
        &[r"\bCOATED\b", r"\bSURFACE\sCOATED\b"],
        &[r"\bNOT\sCOATED\b", r"\bUNCOATED\b", r"\bNOT\sCOATED\sWITH\sGLUE\b"],
        &SPECIFIC_COATINGS,
    ),
    reserved(
        IMPREGNATED,
        &[r"\bIMPREGNATED\b", r"\bCHEMICALLY\sIMPREGNATED\b", r"\bSOAKED\b"],
        &[r"\bNOT\sIMPREGNATED\b", r"\bUNIMPREGNATED\b"],
        &[],
    ),
    def("Perforated", &[r"\bPERFORATED\b", r"\bPUNCHED\b", r"\bNEEDLE-PUNCHED\b", r"\bNEEDLE\sPUNCHED\b"]),
    def(
        "Embossed",
        &[r"\bEMBOSSED\b", r"\bTEXTURED\b", r"\b3D\sSINGLE\sPEARL\sEMBOSSING\b", r"\bSINGLE\sPEARL\sEMBOSSING\b", r"\bPEARL\sEMBOSSING\b"],
    ),
    def("Ultrasonic Sealed", &[r"\bULTRASONIC\sSEALED\b"]),
    def("Heat Sealed", &[r"\bHEAT\sSEALED\b", r"\bHOT\sMELT\b"]),
    def("Reinforced", &[r"\bREINFORCED\b"]),
    def("Pressed", &[r"\bPRESSED\b", r"\bCOMPRESSED\b"]),
    def("Non-Slip", &[r"\bNON-SLIP\b", r"\bANTI-SLIP\b", r"\bNON-STICK\b"]),
    def("Antistatic", &[r"\bANTISTATIC\b", r"\bANTI-STATIC\b", r"\bESD\b", r"\bELECTROSTATIC\sFILTER\b"]),
    def("High Loft", &[r"\bHILOFT\b", r"\bHIGH\sLOFT\b"]),
    def("Low Loft", &[r"\bLOW\sLOFT\b"]),
    def("Breathable", &[r"\bBREATHABLE\b", r"\bAIR\sPERMEABLE\b", r"\bFULL\sBREATHABLE\b"]),
    def("Non-Breathable", &[r"\bNON-BREATHABLE\b"]),
    // Chemical and functional
    def("Hydrophilic", &[r"\bHYDROPHILIC\b", r"\bLEG\sHI\b", r"\bTOP\sHI\b", r"\bCARRIER\sHI\b"]),
    def("Hydrophobic", &[r"\bHYDROPHOBIC\b", r"\bLEG\sHO\b", r"\bEAR\sHO\b", r"\bST\sHO\b"]),
    def("Non-Absorbent", &[r"\bNON-ABSORBENT\b"]),
    def("Antimicrobial", &[r"\bANTIMICROBIAL\b", r"\bANTI-MICROBIAL\b"]),
    def("Antibacterial", &[r"\bANTIBACTERIAL\b", r"\bANTI-BACTERIAL\b"]),
    def("Antiviral", &[r"\bANTIVIRAL\b", r"\bANTI-VIRAL\b"]),
    def("Flame Retardant", &[r"\bFLAME\sRETARDANT\b", r"\bFIRE\sRESISTANT\b"]),
    def("UV Stabilized", &[r"\bUV\sSTABILIZED\b", r"\bUV\sRESISTANT\b"]),
    def("Oil Absorbent", &[r"\bOIL\sABSORBENT\b"]),
    def("Oil Repellent", &[r"\bOIL\sREPELLENT\b"]),
    def("Chemical Resistant", &[r"\bCHEMICAL\sRESISTANT\b", r"\bALCOHOL-RESISTANT\b"]),
    def("Antifungal", &[r"\bANTIFUNGAL\b", r"\bMOLD\sRESISTANT\b"]),
    def("Odor Control", &[r"\bODOR\sCONTROL\b", r"\bDEODORIZING\b"]),
    def("Anti-Mildew", &[r"\bANTI-MILDEW\b"]),
    def("Conductive", &[r"\bCONDUCTIVE\sFABRIC\b"]),
    // Surface
    def("Extra Soft", &[r"\bEXTRA\sSOFT\b", r"\bSUPER\sSOFT\b", r"\bULTRA\sSOFT\b"]),
    def("Cotton Soft", &[r"\bCOTTON\sSOFT\b"]),
    redundant("Soft", &[r"\bSOFT\b"], &["Extra Soft", "Cotton Soft"]),
    def("Smooth", &[r"\bSMOOTH\b"]),
    def("Silky Feel", &[r"\bSILKY\sFEEL\b"]),
    def("Matte", &[r"\bMATTE\b"]),
    def("Glossy", &[r"\bGLOSSY\b", r"\bSHINY\b"]),
    def("Stiff", &[r"\bSTIFF\b", r"\bFIRM\b", r"\bHARD\b"]),
    def("Anti-Wrinkle", &[r"\bANTI-WRINKLE\b", r"\bWRINKLE\sRESISTANT\b"]),
    def("Fleece-Like", &[r"\bFLEECE-LIKE\b"]),
    def("Velvety", &[r"\bVELVETY\b", r"\bSUPERFINE\sVELVET\b"]),
    def("Plush", &[r"\bPLUSH\b"]),
    def("Dust-Free", &[r"\bDUST-FREE\b", r"\bANTI\sDUST\b"]),
    def("Low Lint", &[r"\bLOW\sLINT\b"]),
    def("Anti-Pilling", &[r"\bANTI-PILLING\b"]),
    def("Anti-Stretch", &[r"\bANTI-STRETCH\b"]),
    // Color and appearance
    negated("Printed", &[r"\bPRINTED\b", r"\bPATTERNED\b"], &[r"\bUNPRINTED\b"]),
    def("Two-Tone", &[r"\bTWO-TONE\b", r"\bBICOLOR\b"]),
    def("Reflective", &[r"\bREFLECTIVE\b"]),
    def("Fluorescent", &[r"\bFLUORESCENT\b"]),
    negated("Dyed", &[r"\bDYED\b"], &[r"\bUNDYED\b", r"\bUNBLEACHED,\sUNDYED\b"]),
    negated("Colored", &[r"\bCOLORED\b", r"\bCOLOUR\b"], &[r"\bUNCOLORED\b"]),
    // Safety and protection
    def("Medical Grade", &[r"\bMEDICAL\sGRADE\b", r"\bMEDICAL\sUSE\b", r"\bAMMI\sLEVEL\s\d+\b"]),
    def("Food Grade", &[r"\bFOOD\sGRADE\b"]),
    def("Eco-Friendly", &[r"\bECO-FRIENDLY\b", r"\bRECYCLED\b", r"\bREC\sPOLYESTER\b"]),
    def("Biodegradable", &[r"\bBIODEGRADABLE\b", r"\bCOMPOSTABLE\b"]),
    def("Waterproof", &[r"\bWATERPROOF\b", r"\bWPN\sINSOLE\b"]),
    redundant("Water Resistant", &[r"\bWATER\sRESISTANT\b", r"\bWATER\sREPELLENT\b"], &["Waterproof"]),
    def("Chemical Free", &[r"\bCHEMICAL\sFREE\b"]),
    def("Dustproof", &[r"\bDUSTPROOF\b"]),
    // Other
    def("High Tensile Strength", &[r"\bHIGH\sTENSILE\sSTRENGTH\b"]),
    def("High Elongation", &[r"\bHIGH\sELONGATION\b"]),
    def("Elasticity", &[r"\bELASTICITY\b", r"\bSTRETCHY\b"]),
    def("Ultra Lightweight", &[r"\bULTRA\sLIGHTWEIGHT\b"]),
    redundant("Lightweight", &[r"\bLIGHTWEIGHT\b"], &["Ultra Lightweight"]),
    def("Sound Absorbing", &[r"\bSOUND\sABSORBING\b", r"\bSOUND\sINSULATING\b", r"\bNOISE-PROOF\b"]),
    def("Heat Insulating", &[r"\bHEAT\sINSULATING\b", r"\bTHERMAL\sINSULATING\b"]),
    FeatureDef {
        guard: Guard::InsidePhrase {
            phrase: r"LAMINATED\s(?:PE\s)?FILM|NON-WOVEN\sFILM",
            radius: 20,
            after: &[LAMINATED, PE_COATED],
        },
        ..negated("Film", &[r"\bFILM\b"], &[r"NON-WOVEN\sFILM", r"LAMINATED\sPE\sFILM"])
    },
    FeatureDef {
        soft_negations: &[r"\bNOT\sCOATED\sWITH\sGLUE\b"],
        ..def(
            ADHESIVE,
            &[
                r"\bADHESIVE\b",
                r"\bGLUE\b",
                r"\bSELF-ADHESIVE\b",
                r"\bCONSTRUCTION\sGLUE\b",
                r"\bFABRIC\sGLUE\b",
                r"\bWITH\sGLUE\b",
                r"\bGLUED\b",
                r"\bADHESIVE\sLAYER\b",
                r"\bDOUBLE-SIDED\sTAPE\b",
            ],
        )
    },
    def("Fiberfill", &[r"\bFIBERFILL\b"]),
    def("Mesh", &[r"\bMESH\b", r"\bWEB\b"]),
    def("Faux Leather", &[r"\bFAUX\sLEATHER\b", r"\bSYNTHETIC\sLEATHER\b", r"\bIMITATION\sLEATHER\b", r"\bLEATHERETTE\b"]),
];

#[derive(Debug)]
enum CompiledGuard {
    None,
    GlobalNegation { rescued_by: &'static [&'static str] },
    InsidePhrase {
        phrase: Regex,
        radius: usize,
        after: &'static [&'static str],
    },
}

#[derive(Debug)]
pub(crate) struct Feature {
    pub id: &'static str,
    pub suppressed_by: &'static [&'static str],
    triggers: Vec<Regex>,
    negations: Vec<Regex>,
    soft_negations: Vec<Regex>,
    guard: CompiledGuard,
}

pub(crate) static FEATURES: LazyLock<Vec<Feature>> =
    LazyLock::new(|| FEATURE_DEFS.iter().map(Feature::compile).collect());

pub(crate) static GLOBAL_NEGATION_RES: LazyLock<Vec<(Regex, &'static [&'static str])>> =
    LazyLock::new(|| {
        GLOBAL_NEGATIONS
            .iter()
            .map(|(pattern, covers)| (Regex::new(pattern).unwrap(), *covers))
            .collect()
    });

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

impl Feature {
    fn compile(def: &FeatureDef) -> Self {
        let guard = match def.guard {
            Guard::None => CompiledGuard::None,
            Guard::GlobalNegation { rescued_by } => CompiledGuard::GlobalNegation { rescued_by },
            Guard::InsidePhrase { phrase, radius, after } => CompiledGuard::InsidePhrase {
                phrase: Regex::new(phrase).unwrap(),
                radius,
                after,
            },
        };
        Feature {
            id: def.id,
            suppressed_by: def.suppressed_by,
            triggers: compile_all(def.triggers),
            negations: compile_all(def.negations),
            soft_negations: compile_all(def.soft_negations),
            guard,
        }
    }

    pub(crate) fn triggered(&self, haystack: &str) -> bool {
        self.triggers.iter().any(|re| re.is_match(haystack))
    }

    /// Whether this row adds its label, given the labels earlier rows produced.
    pub(crate) fn applies(&self, text: &Text, found: &LabelSet) -> bool {
        if !self.triggered(&text.upper) {
            return false;
        }
        if self.negations.iter().any(|re| re.is_match(&text.upper)) {
            return false;
        }
        let soft_negated = self.soft_negations.iter().any(|re| {
            re.is_match(&text.upper) && !self.triggered(&re.replace_all(&text.upper, " "))
        });
        if soft_negated {
            return false;
        }
        match &self.guard {
            CompiledGuard::None | CompiledGuard::GlobalNegation { .. } => {
                self.survives_global_negation(text)
            }
            CompiledGuard::InsidePhrase { phrase, radius, after } => {
                !(after.iter().any(|label| found.contains(label))
                    && self.only_inside(text, phrase, *radius))
            }
        }
    }

    /// Always true for rows that are not reserved labels.
    pub(crate) fn survives_global_negation(&self, text: &Text) -> bool {
        let CompiledGuard::GlobalNegation { rescued_by } = &self.guard else {
            return true;
        };
        if !text.globally_negated(self.id) {
            return true;
        }
        let rescued = rescued_by
            .iter()
            .filter_map(|id| feature(id))
            .any(|f| f.triggered(&text.upper));
        rescued || self.triggered(&text.masked)
    }

    fn only_inside(&self, text: &Text, phrase: &Regex, radius: usize) -> bool {
        self.triggers.iter().all(|re| {
            re.find_iter(&text.upper).all(|m| {
                phrase.is_match(window(&text.upper, m.start(), m.end(), radius))
            })
        })
    }
}

pub(crate) fn feature(id: &str) -> Option<&'static Feature> {
    FEATURES.iter().find(|f| f.id == id)
}

/// Pass 1: every table row in order over an accumulating label set.
pub(crate) fn match_features(text: &Text) -> LabelSet {
    FEATURES.iter().fold(LabelSet::new(), |mut found, feature| {
        if feature.applies(text, &found) {
            found.insert(feature.id);
        }
        found
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(text: &str) -> LabelSet {
        match_features(&Text::new(text))
    }

    #[test]
    fn table_ids_are_unique() {
        let mut ids: Vec<_> = FEATURE_DEFS.iter().map(|d| d.id).collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn every_pattern_compiles() {
        assert_eq!(FEATURES.len(), FEATURE_DEFS.len());
        assert_eq!(GLOBAL_NEGATION_RES.len(), GLOBAL_NEGATIONS.len());
    }

    #[test]
    fn own_negation_suppresses() {
        let found = labels("NOT LAMINATED, NOT COATED");
        assert!(!found.contains(LAMINATED));
        assert!(!found.contains(COATED));
    }

    #[test]
    fn global_negation_suppresses_reserved_labels() {
        let found = labels("fabric not impregnated, coated or laminated");
        assert!(found.is_empty());
    }

    #[test]
    fn global_negation_yields_to_independent_affirmation() {
        let found = labels("NOT IMPREGNATED OR COATED BASE, LAMINATED AFTER, COATED EDGE");
        assert!(found.contains(COATED));
        assert!(found.contains(LAMINATED));
        assert!(!found.contains(IMPREGNATED));
    }

    #[test]
    fn global_negation_rescued_by_specific_coating() {
        let found = labels("NOT IMPREGNATED OR COATED FACE, PU COATED BACK");
        assert!(found.contains("PU Coated"));
        assert!(found.contains(COATED));
        assert!(!found.contains(IMPREGNATED));
    }

    #[test]
    fn adhesive_survives_glue_negation_when_affirmed_elsewhere() {
        let found = labels("NOT COATED WITH GLUE, SELF-ADHESIVE BACKING");
        assert!(found.contains(ADHESIVE));
        assert!(!found.contains(COATED));
    }

    #[test]
    fn adhesive_negated_by_glue_phrase_alone() {
        assert!(!labels("NOT COATED WITH GLUE").contains(ADHESIVE));
    }

    #[test]
    fn film_inside_laminated_phrase_is_dropped() {
        let found = labels("SPUNBOND LAMINATED PE FILM");
        assert!(found.contains(LAMINATED));
        assert!(!found.contains("Film"));
    }

    #[test]
    fn film_negated_by_laminated_pe_film() {
        let found = labels("LAMINATED PE FILM ROLL, PACKED IN SHRINK WRAP AND PROTECTIVE FILM");
        assert!(found.contains(LAMINATED));
        assert!(!found.contains("Film"));
    }

    #[test]
    fn film_negated_by_non_woven_film() {
        assert!(!labels("NON-WOVEN FILM").contains("Film"));
    }

    #[test]
    fn film_beside_laminated_film_phrase_is_dropped() {
        assert!(!labels("LAMINATED FILM").contains("Film"));
    }

    #[test]
    fn standalone_film_is_kept() {
        let found = labels("LAMINATED SPUNBOND, PACKED IN STRETCH WRAP AND PROTECTIVE FILM");
        assert!(found.contains(LAMINATED));
        assert!(found.contains("Film"));
    }

    #[test]
    fn global_phrase_without_lamination_keeps_laminated() {
        let found = labels("UNIMPREGNATED AND UNCOATED, LAMINATED");
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![LAMINATED]);
    }

    #[test]
    fn full_global_phrase_clears_reserved_labels() {
        let text = Text::new("UNIMPREGNATED, UNCOATED, UNLAMINATED SPUNBOND");
        assert!(text.globally_negated(LAMINATED));
        assert!(match_features(&text).is_empty());
    }

    #[test]
    fn global_negation_rescued_by_pvc_coating() {
        let found = labels("NOT IMPREGNATED OR COATED FACE, PVC COATED BACK");
        assert!(found.contains("PVC Coated"));
        assert!(found.contains(COATED));
    }

    #[test]
    fn global_negation_rescued_by_thermoplastic_coating() {
        let found = labels("NOT IMPREGNATED, COATED OR LAMINATED BASE; THERMOPLASTIC COATED TOP");
        assert!(found.contains("Thermoplastic Coated"));
        assert!(found.contains(COATED));
        assert!(!found.contains(LAMINATED));
        assert!(!found.contains(IMPREGNATED));
    }
}
