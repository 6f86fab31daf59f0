//! Fuzzy name scoring.
//!
//! Score = 1 - normalized Levenshtein distance over normalized text, boosted
//! when one string contains the other as a run of whole words. Only an exact
//! normalized match reaches 1.0; the containment boost closes a fraction of
//! the remaining gap (half by default, `[matching] containment_bonus`), so a
//! contained name never ties with an exact one.

/// Default fraction of the gap to 1.0 recovered by containment.
pub const CONTAINMENT_BONUS: f64 = 0.5;

/// Lowercase, treat punctuation as whitespace, collapse runs of whitespace.
pub fn normalize(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Levenshtein edit distance over chars (two-row dynamic programming).
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// 1 - distance / max(len). Both inputs are expected to be normalized.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Similarity in [0, 1] between two raw strings.
pub fn score(requested: &str, candidate: &str) -> f64 {
    score_normalized(&normalize(requested), &normalize(candidate))
}

/// [`score`] for strings already passed through [`normalize`].
pub fn score_normalized(a: &str, b: &str) -> f64 {
    score_with_bonus(a, b, CONTAINMENT_BONUS)
}

/// [`score_normalized`] with an explicit containment bonus in [0, 1).
pub fn score_with_bonus(a: &str, b: &str, bonus: f64) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let base = edit_similarity(a, b);
    if contains_words(a, b) || contains_words(b, a) {
        (base + (1.0 - base) * bonus).min(1.0)
    } else {
        base
    }
}

/// Whether `needle` occurs in `haystack` on word boundaries.
fn contains_words(haystack: &str, needle: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {needle} "))
}
