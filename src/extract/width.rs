use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::NOT_FOUND;
use crate::normalize::{fold, leading_number, two_decimals};

const NUM: &str = r"\d+(?:[.,]\d+)*";
const UNIT: &str = r#"INCHES|INCH|''|"|”|CMS?\b|MMS?\b|MTRS?\b|METERS?\b|METRES?\b|M\b|FEET\b|FOOT\b|FT\b|'|YARDS?\b|YDS?\b"#;
/// Without a width keyword only inch, centimeter and millimeter tokens count;
/// meter/foot/yard figures there are nearly always roll lengths.
const FALLBACK_UNIT: &str = r#"INCHES|INCH|''|"|”|CMS?|MMS?"#;

/// A measurement with an optional bracket/range: `160CM`, `[150-160]CM`, `(150 TO 160 CM)`.
/// `n1` is always the first (lower) number.
static VALUE: LazyLock<String> = LazyLock::new(|| {
    format!(
        r"[\[(]?\s*(?P<n1>{NUM})\s*(?P<u1>{UNIT})?\s*(?:(?:-|~|TO)\s*{NUM}\s*(?P<u2>{UNIT})?\s*)?[\])]?\s*(?P<u3>{UNIT})?"
    )
});

static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:WIDTH|WIDE)\b").unwrap());
static DIMENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\bLENGTH\s*[*X×]\s*WIDTH\s*[:=]?\s*(?P<n1>{NUM})\s*(?P<u1>{UNIT})?\s*[*X×]\s*(?P<n2>{NUM})\s*(?P<u2>{UNIT})?"
    ))
    .unwrap()
});
static CUT_WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\bCUT[\s-]*WIDTH\s*[:=]?\s*{}", *VALUE)).unwrap());
static WIDTH_FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\bWIDTH\s+FROM\s*[:=]?\s*{}", *VALUE)).unwrap());
static WIDTH_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\bWIDTH\s*[:=]\s*{}", *VALUE)).unwrap());
static WIDTH_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\bWIDTH\s+{}", *VALUE)).unwrap());
static WIDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{}\s*(?:\([^)]*\)\s*)?WIDE\b", *VALUE)).unwrap());
static UNIT_WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?P<n1>{NUM})\s*(?P<u1>{UNIT})\s*WIDTH\b")).unwrap());
static EDGE_WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\bEDGE[\s-]*WIDTH\s*[:=]?\s*{}", *VALUE)).unwrap());

/// Unit scan once every contextual rule failed, in the order inch, cm, mm, m, ft, yd.
static UNIT_SCAN: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"INCHES|INCH|''|"|”"#,
        r"CMS?",
        r"MMS?",
        r"(?:MTRS?|METERS?|METRES?|M)\b",
        r"FEET|FOOT|FT\b",
        r"(?:YARDS?|YDS?)\b",
    ]
    .iter()
    .map(|unit| Regex::new(&format!(r"(?P<n1>{NUM})\s*(?P<u1>{unit})")).unwrap())
    .collect()
});

/// A figure directly labelled as a length ("LENGTH 100M", "L: 50M").
static LENGTH_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\bLENGTH\s*[:=]?|\bL\s*[:=])\s*$").unwrap());

/// Fallback tiers: "160 CM", then "160CM", then "X160CM".
static FALLBACK_TIERS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(&format!(
            r"(?:^|[\s(\[,;/])(?P<n1>{NUM})\s+(?P<u1>{FALLBACK_UNIT})(?:$|[^A-Z0-9])"
        ))
        .unwrap(),
        Regex::new(&format!(
            r"(?:^|[\s(\[,;/])(?P<n1>{NUM})(?P<u1>{FALLBACK_UNIT})(?:$|[^A-Z0-9])"
        ))
        .unwrap(),
        Regex::new(&format!(r"(?P<n1>{NUM})\s*(?P<u1>{FALLBACK_UNIT})")).unwrap(),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit {
    Inch,
    Centimeter,
    Millimeter,
    Meter,
    Foot,
    Yard,
}

impl Unit {
    fn parse(token: &str) -> Option<Unit> {
        match token.trim() {
            "INCHES" | "INCH" | "''" | "\"" | "”" => Some(Unit::Inch),
            "CM" | "CMS" => Some(Unit::Centimeter),
            "MM" | "MMS" => Some(Unit::Millimeter),
            "M" | "MTR" | "MTRS" | "METER" | "METERS" | "METRE" | "METRES" => Some(Unit::Meter),
            "FEET" | "FOOT" | "FT" | "'" => Some(Unit::Foot),
            "YARD" | "YARDS" | "YD" | "YDS" => Some(Unit::Yard),
            _ => None,
        }
    }

    fn to_cm(self, value: f64) -> f64 {
        match self {
            Unit::Inch => value * 2.54,
            Unit::Centimeter => value,
            Unit::Millimeter => value / 10.0,
            Unit::Meter => value * 100.0,
            Unit::Foot => value * 30.48,
            Unit::Yard => value * 91.44,
        }
    }
}

/// Fabric width in centimeters with two decimals, or `"N/A"`.
///
/// Texts that mention WIDTH/WIDE go through the keyword-anchored rules only;
/// texts without the keyword go through the token fallback scan only.
pub fn extract_width(text: &str) -> String {
    let upper = fold(text);
    let cm = if KEYWORD_RE.is_match(&upper) {
        anchored(&upper)
    } else {
        fallback(&upper)
    };
    cm.map(two_decimals).unwrap_or_else(|| NOT_FOUND.to_string())
}

fn anchored(upper: &str) -> Option<f64> {
    dimension(upper)
        .or_else(|| first_value(&CUT_WIDTH_RE, upper, false))
        .or_else(|| first_value(&WIDTH_FROM_RE, upper, false))
        .or_else(|| first_value(&WIDTH_ASSIGN_RE, upper, true))
        .or_else(|| first_value(&WIDTH_SPACE_RE, upper, true))
        .or_else(|| first_value(&WIDE_RE, upper, false))
        .or_else(|| first_value(&UNIT_WIDTH_RE, upper, false))
        .or_else(|| first_value(&EDGE_WIDTH_RE, upper, false))
        .or_else(|| unit_scan(upper))
}

/// Any figure with a unit, skipping the ones labelled as lengths.
fn unit_scan(upper: &str) -> Option<f64> {
    UNIT_SCAN.iter().find_map(|re| {
        re.captures_iter(upper)
            .filter(|caps| {
                caps.get(0)
                    .map_or(true, |m| !LENGTH_LABEL_RE.is_match(&upper[..m.start()]))
            })
            .find_map(|caps| measure(&caps))
    })
}

/// LENGTH*WIDTH 100M*160CM: the second figure is the width.
fn dimension(upper: &str) -> Option<f64> {
    let caps = DIMENSION_RE.captures(upper)?;
    let value = leading_number(caps.name("n2")?.as_str())?;
    let unit = ["u2", "u1"]
        .iter()
        .find_map(|g| caps.name(g).and_then(|m| Unit::parse(m.as_str())))
        .unwrap_or(Unit::Centimeter);
    Some(unit.to_cm(value))
}

/// First match of `re` that yields a measurement. Plain WIDTH rules skip
/// occurrences that belong to a CUT WIDTH or EDGE WIDTH phrase.
fn first_value(re: &Regex, upper: &str, plain_width: bool) -> Option<f64> {
    re.captures_iter(upper)
        .filter(|caps| {
            !plain_width
                || caps
                    .get(0)
                    .map_or(true, |m| !qualified_width(&upper[..m.start()]))
        })
        .find_map(|caps| measure(&caps))
}

fn qualified_width(prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches(|c: char| c.is_whitespace() || c == '-');
    prefix.ends_with("CUT") || prefix.ends_with("EDGE")
}

/// Lower bound `n1` in the first unit found; unitless figures are centimeters.
fn measure(caps: &Captures<'_>) -> Option<f64> {
    let value = leading_number(caps.name("n1")?.as_str())?;
    let unit = ["u1", "u2", "u3"]
        .iter()
        .find_map(|g| caps.name(g).and_then(|m| Unit::parse(m.as_str())))
        .unwrap_or(Unit::Centimeter);
    Some(unit.to_cm(value))
}

fn fallback(upper: &str) -> Option<f64> {
    FALLBACK_TIERS.iter().find_map(|tier| {
        tier.captures_iter(upper)
            .filter(|caps| !collides_with_grams(upper, caps))
            .find_map(|caps| measure(&caps))
    })
}

/// "25G1600MM" style tokens: a millimeter figure glued to a G belongs to the weight.
fn collides_with_grams(upper: &str, caps: &Captures<'_>) -> bool {
    let (Some(num), Some(unit)) = (caps.name("n1"), caps.name("u1")) else {
        return false;
    };
    if Unit::parse(unit.as_str()) != Some(Unit::Millimeter) {
        return false;
    }
    let before = upper[..num.start()].chars().next_back();
    let after = upper[unit.end()..].chars().next();
    before == Some('G') || after == Some('G')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inches_wide() {
        assert_eq!(extract_width("60\" WIDE"), "152.40");
        assert_eq!(extract_width("63 inch wide"), "160.02");
    }

    #[test]
    fn centimeters_wide() {
        assert_eq!(extract_width("150CM WIDE"), "150.00");
    }

    #[test]
    fn keyword_without_value() {
        assert_eq!(extract_width("NO WIDTH INFO"), NOT_FOUND);
    }

    #[test]
    fn width_assignment_in_mm() {
        assert_eq!(extract_width("SMS 25GSM WIDTH: 1600MM"), "160.00");
        assert_eq!(extract_width("width=1,6m"), "160.00");
    }

    #[test]
    fn width_without_unit_is_cm() {
        assert_eq!(extract_width("WIDTH 175 WHITE"), "175.00");
    }

    #[test]
    fn cut_width_wins() {
        assert_eq!(extract_width("WIDTH 160CM, CUT WIDTH 150CM"), "150.00");
    }

    #[test]
    fn width_from_takes_lower_bound() {
        assert_eq!(extract_width("WIDTH FROM 150 TO 320CM"), "150.00");
    }

    #[test]
    fn bracketed_range_takes_lower_bound() {
        assert_eq!(extract_width("WIDTH [150-160]CM"), "150.00");
    }

    #[test]
    fn parenthetical_dual_unit_takes_first() {
        assert_eq!(extract_width("WIDTH 63\" (160CM)"), "160.02");
        assert_eq!(extract_width("60\" (152CM) WIDE"), "152.40");
    }

    #[test]
    fn length_by_width() {
        assert_eq!(extract_width("LENGTH*WIDTH: 100M*160CM"), "160.00");
        assert_eq!(extract_width("LENGTH X WIDTH 500 X 210"), "210.00");
    }

    #[test]
    fn edge_width_only_when_nothing_else() {
        assert_eq!(extract_width("EDGE WIDTH: 5MM"), "0.50");
        assert_eq!(extract_width("EDGE WIDTH 5MM, WIDTH 160CM"), "160.00");
    }

    #[test]
    fn feet_and_yards() {
        assert_eq!(extract_width("10 FT WIDE"), "304.80");
        assert_eq!(extract_width("2 YARDS WIDE"), "182.88");
        assert_eq!(extract_width("2,5M WIDE"), "250.00");
    }

    #[test]
    fn unit_scan_with_keyword() {
        assert_eq!(extract_width("ROLL 160CM, WIDTH AS PER ORDER"), "160.00");
    }

    #[test]
    fn word_in_is_not_inches() {
        assert_eq!(extract_width("WIDTH 150 IN WHITE COLOR"), "150.00");
    }

    #[test]
    fn apostrophe_pair_inches() {
        assert_eq!(extract_width("60'' WIDE"), "152.40");
        assert_eq!(extract_width("60'' SOFT ROLL"), "152.40");
    }

    #[test]
    fn unit_scan_skips_labelled_lengths() {
        assert_eq!(extract_width("WIDE ROLL, LENGTH 100M"), NOT_FOUND);
        assert_eq!(extract_width("WIDE ROLL, L: 50M, 1.6M"), "160.00");
        assert_eq!(extract_width("ROLL LENGTH 100M, 160CM, WIDTH AS ORDERED"), "160.00");
    }

    #[test]
    fn fallback_space_separated_first() {
        assert_eq!(extract_width("SPUNBOND 160 CM ROLL"), "160.00");
        assert_eq!(extract_width("1600MM, 150 CM"), "150.00");
    }

    #[test]
    fn fallback_concatenated() {
        assert_eq!(extract_width("PP 1600MM WHITE"), "160.00");
        assert_eq!(extract_width("63\" SOFT"), "160.02");
    }

    #[test]
    fn fallback_embedded() {
        assert_eq!(extract_width("ROLL X1600MM 25G"), "160.00");
    }

    #[test]
    fn fallback_skips_mm_glued_to_grams() {
        assert_eq!(extract_width("SMS25G1600MM"), NOT_FOUND);
    }

    #[test]
    fn nothing_to_find() {
        assert_eq!(extract_width("WHITE SPUNBOND"), NOT_FOUND);
        assert_eq!(extract_width(""), NOT_FOUND);
    }
}
