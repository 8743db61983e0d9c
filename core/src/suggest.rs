//! "Did you mean" suggestions for mistyped command names.

use std::cmp::Ordering;

/// Candidates must score strictly above this to be suggested.
const THRESHOLD: f64 = 0.5;

/// Maximum number of suggestions attached to an unknown-command error.
pub const MAX_SUGGESTIONS: usize = 3;

/// Returns up to `limit` candidates similar to `target`, best first.
///
/// Ties are broken by ascending candidate name. An empty `target` or a
/// `limit` of zero yields no suggestions.
///
/// # Examples
///
/// ```
/// use subcommander_core::suggest;
///
/// assert_eq!(suggest("hello", &["hello", "world", "help"], 2), vec!["hello", "help"]);
/// assert!(suggest("", &["hello"], 3).is_empty());
/// assert!(suggest("hello", &["hello"], 0).is_empty());
/// ```
pub fn suggest<S: AsRef<str>>(target: &str, candidates: &[S], limit: usize) -> Vec<String> {
    if target.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(&str, f64)> = candidates
        .iter()
        .map(|c| c.as_ref())
        .map(|name| (name, similarity(target, name)))
        .filter(|(_, score)| *score > THRESHOLD)
        .collect();

    scored.sort_by(|(a_name, a_score), (b_name, b_score)| {
        b_score
            .partial_cmp(a_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a_name.cmp(b_name))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Case-insensitive similarity in `0.0..=1.0`.
///
/// Equal strings score 1.0, a prefix relationship in either direction scores
/// 0.9, anything else is one minus the normalized Levenshtein distance.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }
    if !a.is_empty() && !b.is_empty() && (b.starts_with(&a) || a.starts_with(&b)) {
        return 0.9;
    }

    let distance = strsim::levenshtein(&a, &b);
    let max_len = a.chars().count().max(b.chars().count());
    1.0 - distance as f64 / max_len as f64
}
