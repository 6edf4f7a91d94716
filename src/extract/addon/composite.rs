use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use super::Text;

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(WHITE|BLACK|BLUE|GREEN|PINK|GRAY|GREY|BEIGE|RED|YELLOW|ORANGE|PURPLE|BROWN|CREAM|TURQUOISE|CHARCOAL|SILVER|NAVY)\b",
    )
    .unwrap()
});
static SOFT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bSOFT\b").unwrap());
static HI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bHYDROPHILIC\b|\bHI\b").unwrap());
static HO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bHYDROPHOBIC\b|\bHO\b").unwrap());

/// One label per color, each followed by the softness and wetting markers,
/// e.g. "BLACK SOFT HO".
pub(crate) fn composite_labels(text: &Text) -> Vec<String> {
    let markers: Vec<&str> = [(&*SOFT_RE, "SOFT"), (&*HI_RE, "HI"), (&*HO_RE, "HO")]
        .into_iter()
        .filter(|(re, _)| re.is_match(&text.upper))
        .map(|(_, marker)| marker)
        .collect();

    let colors: Vec<&str> = COLOR_RE
        .find_iter(&text.upper)
        .map(|m| match m.as_str() {
            "GREY" => "GRAY",
            other => other,
        })
        .unique()
        .collect();

    if colors.is_empty() {
        return if markers.is_empty() {
            Vec::new()
        } else {
            vec![markers.join(" ")]
        };
    }
    colors
        .into_iter()
        .map(|color| std::iter::once(color).chain(markers.iter().copied()).join(" "))
        .collect()
}
