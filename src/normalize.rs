//! Text helpers shared by every extractor.

/// Case-fold a description for matching. All rule tables are written against uppercase text.
pub fn fold(text: &str) -> String {
    text.to_uppercase()
}

/// Swap the first decimal comma for a dot ("12,5" -> "12.5").
pub fn decimal(raw: &str) -> String {
    raw.replacen(',', ".", 1)
}

/// Parse the longest numeric prefix of `raw` after decimal normalization.
///
/// Mirrors how spreadsheet users write numbers: "1,5" is 1.5 and a trailing
/// junk separator ("160.") is ignored.
pub fn leading_number(raw: &str) -> Option<f64> {
    let normalized = decimal(raw);
    let mut end = 0;
    let mut seen_dot = false;
    for (idx, c) in normalized.char_indices() {
        match c {
            '0'..='9' => end = idx + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    normalized[..end].parse::<f64>().ok()
}

/// Format a centimeter value the way every width rule reports it.
pub fn two_decimals(value: f64) -> String {
    format!("{:.2}", value)
}

/// Slice of `text` spanning `radius` characters on both sides of `start..end`.
pub fn window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(radius.saturating_sub(1))
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(idx, _)| end + idx)
        .unwrap_or(text.len());
    &text[from..to]
}
