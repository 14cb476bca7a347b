//! String similarity primitives shared by match strategies.
//!
//! Everything here is a pure function over its inputs. Lengths are measured in
//! Unicode scalar values, never bytes, so accented titles compare the same way
//! as ASCII ones.

/// Articles stripped from the front of a title before comparison.
const LEADING_ARTICLES: &[&str] = &["the ", "a ", "an "];

/// Minimum number of single character insertions, deletions or substitutions
/// needed to turn `a` into `b`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row dynamic programming table; `prev[j]` is the distance between
    // a[..i] and b[..j] from the previous row.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Edit distance scaled into `[0.0, 1.0]`, where `1.0` means identical.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = edit_distance(a, b) as f64;
    (1.0 - distance / max_len as f64).clamp(0.0, 1.0)
}

/// Canonical form used for title comparison: lowercase, one leading article
/// removed, punctuation dropped and whitespace collapsed.
pub fn normalize_for_comparison(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut rest = lowered.trim_start();

    for article in LEADING_ARTICLES {
        if let Some(stripped) = rest.strip_prefix(article) {
            rest = stripped;
            break;
        }
    }

    let kept: String = rest
        .chars()
        .filter_map(|ch| {
            if ch.is_alphanumeric() {
                Some(ch)
            } else if ch.is_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity of two titles after [`normalize_for_comparison`].
pub fn title_similarity(a: &str, b: &str) -> f64 {
    normalized_similarity(&normalize_for_comparison(a), &normalize_for_comparison(b))
}

/// Year proximity: `1.0` for the same year, `0.5` one year apart, otherwise
/// (or when either year is unknown) `0.0`.
pub fn year_match(y1: Option<i32>, y2: Option<i32>) -> f64 {
    match (y1, y2) {
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(a), Some(b)) if a.abs_diff(b) == 1 => 0.5,
        _ => 0.0,
    }
}

/// Builder for a single confidence calculation.
///
/// Weighted terms are comparable evidence and are averaged by weight. Bonuses
/// are side knowledge (an exact external id, a suspiciously short title) and
/// are added on top of the average without taking part in it.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScore {
    terms: Vec<(f64, f64)>,
    bonus: f64,
    has_bonus: bool,
}

impl ConfidenceScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a weighted term.
    pub fn add(&mut self, score: f64, weight: f64) -> &mut Self {
        self.terms.push((score, weight));
        self
    }

    /// Record an unweighted bonus (or penalty when negative).
    pub fn add_bonus(&mut self, delta: f64) -> &mut Self {
        self.bonus += delta;
        self.has_bonus = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && !self.has_bonus
    }

    /// Weighted average of the terms plus all bonuses, clamped into `[0.0, 1.0]`.
    pub fn calculate(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }

        let total_weight: f64 = self.terms.iter().map(|(_, weight)| weight).sum();
        let average = if total_weight > 0.0 {
            self.terms
                .iter()
                .map(|(score, weight)| score * weight)
                .sum::<f64>()
                / total_weight
        } else {
            0.0
        };

        (average + self.bonus).clamp(0.0, 1.0)
    }
}
