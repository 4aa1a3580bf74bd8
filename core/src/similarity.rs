//! String similarity on a 0-100 scale, over normalized text.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Edit-distance similarity of two strings. Empty input scores 0.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(a, b) * 100.0
}

/// Token-set similarity: word order and repeated words are ignored, and a title
/// whose words are all contained in the other string scores 100.
///
/// The shared tokens are compared against each side's shared-plus-remaining tokens
/// and the best of the three pairings wins.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let shared: String = join(tokens_a.intersection(&tokens_b));
    let only_a: String = join(tokens_a.difference(&tokens_b));
    let only_b: String = join(tokens_b.difference(&tokens_a));

    let with_a: String = format!("{shared} {only_a}").trim().to_string();
    let with_b: String = format!("{shared} {only_b}").trim().to_string();

    [
        ratio(&shared, &with_a),
        ratio(&shared, &with_b),
        ratio(&with_a, &with_b),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

fn join<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
    tokens.copied().collect::<Vec<&str>>().join(" ")
}
