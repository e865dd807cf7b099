use std::sync::LazyLock;

use regex::Regex;

/// Newline, bullet glyph, dash bullet, or a numeric list marker such as `12.`.
static FRAGMENT_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n|•|- |\d+\.").expect("fragment delimiter pattern"));

/// Splits an answer into trimmed, non-empty fragments in their original order.
///
/// The numeric marker matches any run of digits followed by a dot, so decimals
/// and years ending a sentence are split too (`"pi is 3.14"` gives `["pi is", "14"]`).
pub fn split_fragments(answer: &str) -> Vec<String> {
    FRAGMENT_DELIMITERS
        .split(answer)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
