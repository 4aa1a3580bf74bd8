//! # Text Normalizer
//!
//! Canonicalizes free marketplace text so titles, brands and catalog names can be
//! compared token by token.
//!
//! The canonical form is **lowercase ASCII** restricted to `[a-z0-9 ]` with single
//! spaces between tokens. Accented Latin letters are folded to their bare form
//! before anything is stripped, so `"Nutrición"` and `"nutricion"` compare equal.

/// Returns the canonical form of `text`.
///
/// Total and pure: empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    let mut folded: String = String::with_capacity(text.len());

    for ch in text.chars() {
        for lc in ch.to_lowercase() {
            let base: char = fold_accent(lc);
            if base.is_ascii_lowercase() || base.is_ascii_digit() || base.is_whitespace() {
                folded.push(if base.is_whitespace() { ' ' } else { base });
            }
        }
    }

    folded.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Normalizes an optional field, mapping absent values to the empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Maps an accented Latin letter to its unaccented form. Other characters pass through.
pub fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Whole-word phrase containment over two already normalized strings.
///
/// `"leche vital 3"` contains `"vital"` but `"vitalcan adulto"` does not.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let padded_haystack: String = format!(" {haystack} ");
    let padded_needle: String = format!(" {needle} ");
    padded_haystack.contains(&padded_needle)
}
