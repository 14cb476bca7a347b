//! Narrowing a catalogue of known titles down to the entries worth matching.
//!
//! Strategies that keep content locally can call [`shortlist`] from
//! `find_existing`: every candidate is scored with [`score_title_year`], and
//! the ones under the confidence floor only survive when one normalized title
//! is a skim-style subsequence of the other (`Alien` against
//! `Alien Romulus`). The best candidate comes first.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::trace;

use super::fuzzy::normalize_for_comparison;
use super::scoring::{CandidateTitle, score_title_year};
use crate::types::ScanResult;

/// Limits applied by [`shortlist`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortlistOptions {
    /// Maximum number of entries returned.
    pub limit: usize,
    /// Candidates scoring below this need a subsequence overlap to be kept.
    pub min_confidence: f64,
}

impl Default for ShortlistOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            min_confidence: 0.5,
        }
    }
}

/// A candidate kept by [`shortlist`].
#[derive(Debug, Clone, PartialEq)]
pub struct Shortlisted<T> {
    pub candidate: T,
    /// [`score_title_year`] of the candidate against the scan result.
    pub confidence: f64,
    /// Skim score of the normalized titles, `None` when neither contains the
    /// other as a subsequence.
    pub overlap: Option<i64>,
}

/// Score `candidates` against `scan` and keep the plausible ones, best first.
///
/// Ties on confidence go to the larger overlap. A scan result whose title
/// normalizes to nothing yields an empty list.
pub fn shortlist<T, F>(
    scan: &ScanResult,
    candidates: impl IntoIterator<Item = T>,
    title_of: F,
    options: ShortlistOptions,
) -> Vec<Shortlisted<T>>
where
    F: Fn(&T) -> CandidateTitle<'_>,
{
    let query = normalize_for_comparison(&scan.parsed_title);
    if query.is_empty() || options.limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let year = scan.year();
    let mut kept = Vec::new();

    for candidate in candidates {
        let (confidence, overlap) = {
            let title = title_of(&candidate);
            let normalized = normalize_for_comparison(title.title);
            let overlap = if normalized.is_empty() {
                None
            } else {
                matcher
                    .fuzzy_match(&normalized, &query)
                    .or_else(|| matcher.fuzzy_match(&query, &normalized))
            };
            (score_title_year(&scan.parsed_title, year, title), overlap)
        };

        if confidence < options.min_confidence && overlap.is_none() {
            trace!(query = %query, confidence, "candidate dropped from shortlist");
            continue;
        }

        kept.push(Shortlisted {
            candidate,
            confidence,
            overlap,
        });
    }

    kept.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.overlap.cmp(&a.overlap))
    });
    kept.truncate(options.limit);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Hints, hint_keys};
    use std::path::PathBuf;

    fn scan(title: &str, year: Option<i32>) -> ScanResult {
        let mut hints = Hints::new();
        if let Some(year) = year {
            hints.insert(hint_keys::YEAR, year);
        }
        ScanResult {
            file_path: PathBuf::from(format!("/movies/{title}.mkv")),
            file_name: format!("{title}.mkv"),
            file_size: 0,
            parsed_title: title.to_string(),
            hints,
            is_media: true,
            error: None,
        }
    }

    fn catalogue() -> Vec<(&'static str, Option<i32>)> {
        vec![
            ("Paddington", Some(2014)),
            ("Alien Romulus", Some(2024)),
            ("Aliens", Some(1986)),
            ("Alien", Some(1979)),
        ]
    }

    fn title_of<'a>(entry: &'a (&'static str, Option<i32>)) -> CandidateTitle<'a> {
        CandidateTitle::new(entry.0, entry.1)
    }

    #[test]
    fn best_candidate_first_and_unrelated_dropped() {
        let ranked = shortlist(
            &scan("Alien", Some(1979)),
            catalogue(),
            title_of,
            ShortlistOptions::default(),
        );

        let titles: Vec<_> = ranked.iter().map(|entry| entry.candidate.0).collect();
        assert_eq!(titles, vec!["Alien", "Aliens", "Alien Romulus"]);
        assert!((ranked[0].confidence - 1.0).abs() < 1e-9);
        assert!(ranked[2].confidence < 0.5);
        assert!(ranked[2].overlap.is_some());
    }

    #[test]
    fn misspelt_title_survives_on_confidence() {
        let ranked = shortlist(
            &scan("Inceptoin", None),
            vec![("Inception", Some(2010)), ("Interstellar", Some(2014))],
            title_of,
            ShortlistOptions::default(),
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate.0, "Inception");
        assert!(ranked[0].overlap.is_none());
    }

    #[test]
    fn limit_truncates() {
        let options = ShortlistOptions {
            limit: 1,
            ..Default::default()
        };
        let ranked = shortlist(&scan("Alien", Some(1979)), catalogue(), title_of, options);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate.0, "Alien");
    }

    #[test]
    fn blank_title_yields_nothing() {
        let options = ShortlistOptions::default();
        let ranked = shortlist(&scan("  ", None), catalogue(), title_of, options);
        assert!(ranked.is_empty());
    }
}
