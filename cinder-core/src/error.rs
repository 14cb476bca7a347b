use std::path::PathBuf;

use thiserror::Error;

use crate::types::scan::ScanReport;

/// Boxed error type returned by [`MatchStrategy`](crate::matching::MatchStrategy)
/// implementations. The matcher never inspects it, it only carries it back to
/// the caller.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure classifications attached to an unmatched [`MatchResult`](crate::matching::MatchResult).
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("no matches found for: {title}")]
    NoMatches { title: String },

    #[error("external search failed: {0}")]
    SearchFailed(#[source] BoxError),

    #[error("failed to create content: {0}")]
    CreateFailed(#[source] BoxError),

    #[error("confidence {confidence:.2} is below the accepted threshold {threshold:.2}")]
    LowConfidence { confidence: f64, threshold: f64 },

    #[error("no title could be parsed from {file_name}")]
    NoTitle { file_name: String },
}

impl MatchError {
    /// True when the provider answered but had nothing, as opposed to being unreachable.
    pub fn is_no_matches(&self) -> bool {
        matches!(self, MatchError::NoMatches { .. })
    }
}

/// A root path that could not be opened. Collected into
/// [`ScanReport::errors`]; the remaining roots are still scanned.
#[derive(Error, Debug)]
#[error("failed to scan root {}: {source}", .root.display())]
pub struct RootError {
    pub root: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Rejected when a scanner is built, before any directory is touched.
#[derive(Error, Debug)]
#[error("invalid exclude pattern {pattern:?}: {source}")]
pub struct InvalidPattern {
    pub pattern: String,
    #[source]
    pub source: glob::PatternError,
}

/// Conditions that abort a scan outright.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("scan cancelled after {} files", .partial.stats.total_files)]
    Cancelled { partial: Box<ScanReport> },
}

impl ScanError {
    /// Results gathered before the scan stopped.
    pub fn into_partial(self) -> ScanReport {
        match self {
            ScanError::Cancelled { partial } => *partial,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
