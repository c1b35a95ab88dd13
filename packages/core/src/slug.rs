// ABOUTME: URL-safe slug derivation for catalog entries
// ABOUTME: Lowercases and collapses whitespace and punctuation into single hyphens

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug separator pattern is valid"));

/// Derive a URL-safe slug from a display name.
///
/// Non-ASCII letters are transliterated (`é` to `e`, `数` to `shu`), letters are
/// lowercased, `@` reads as "at", and every run of other characters becomes
/// one `-`. Leading and trailing hyphens are trimmed. Applying it to its own
/// output returns the same value.
pub fn slugify(name: &str) -> String {
    let lowered = deunicode(&name.replace('@', " at ")).to_ascii_lowercase();
    SEPARATOR_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
