use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace pattern"));

// Lazy and non-nested: "[a [b] c]" loses "[a [b]" and keeps " c]".
static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*?\]").expect("Failed to compile bracket pattern"));

/// Collapse whitespace runs and drop bracketed reference markers such as `[12]`.
///
/// Idempotent: the bracket pass can leave doubled spaces behind, so whitespace
/// is collapsed again afterwards.
pub fn normalize_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let stripped = BRACKETED.replace_all(&collapsed, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}
