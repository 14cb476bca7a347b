//! Match orchestration and the fuzzy primitives strategies build on.

pub mod fuzzy;
pub mod matcher;
pub mod ranking;
pub mod scoring;
pub mod strategy;

pub use fuzzy::{
    ConfidenceScore, edit_distance, normalize_for_comparison, normalized_similarity,
    title_similarity, year_match,
};
pub use matcher::{MatchResult, MatchType, Matcher, MatcherConfig};
pub use ranking::{ShortlistOptions, Shortlisted, shortlist};
pub use scoring::{CandidateTitle, score_title_year};
pub use strategy::MatchStrategy;
