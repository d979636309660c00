/// Normalized edit-distance similarity of two strings, in `[0, 1]`.
///
/// Both inputs are trimmed and lowercased first. Two empty strings are
/// identical (1.0); one empty string against a non-empty one scores 0.0.
/// Otherwise the score is `1 - levenshtein / max_len`, with lengths counted in
/// characters.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = strsim::levenshtein(&a, &b);

    1.0 - distance as f64 / max_len as f64
}

/// Similarity of two optional fields; absent counts as empty.
pub fn similarity_opt(a: Option<&str>, b: Option<&str>) -> f64 {
    similarity(a.unwrap_or_default(), b.unwrap_or_default())
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
