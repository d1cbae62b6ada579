//! Markdown code-fence stripping for model output.
//!
//! Models asked for JSON or code tend to wrap their answer in a single fenced
//! block. Only one opening marker at the very start and one closing marker at
//! the very end are removed; embedded or nested fences are left alone.

use once_cell::sync::Lazy;
use regex::Regex;

// ```json, ```python or a bare ``` at the start, plus the whitespace after it
static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A```(?:json|python)?\s*").expect("opening fence regex should be valid")
});

static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```\s*\z").expect("closing fence regex should be valid"));

/// Removes a leading and a trailing code-fence marker from `text`.
///
/// Text without fence markers at its edges is returned unchanged.
pub fn strip_code_fences(text: &str) -> String {
    let opened = OPENING_FENCE.replace(text, "");
    CLOSING_FENCE.replace(&opened, "").into_owned()
}

/// Returns `true` if `text` starts with a fence marker.
pub fn is_fenced(text: &str) -> bool {
    OPENING_FENCE.is_match(text)
}
