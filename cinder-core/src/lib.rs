//! # Cinder Core
//!
//! Content identification for a media library: find video files on disk,
//! pull a title and structured hints out of their names, and reconcile them
//! against known and provider-supplied content.
//!
//! ## Overview
//!
//! - **Scanning**: [`FilesystemScanner`] walks root directories with hidden,
//!   exclude-glob, depth and symlink policies and produces a [`ScanReport`]
//! - **Parsing**: [`MovieFileParser`] and [`TvFileParser`] implement the
//!   shared [`FileParser`] contract on top of [`metadata::clean_title`]
//! - **Fuzzy primitives**: edit distance, title similarity, year proximity
//!   and weighted [`ConfidenceScore`] composition
//! - **Matching**: [`Matcher`] drives a pluggable [`MatchStrategy`] and
//!   classifies each outcome as a [`MatchResult`]
//!
//! Persistence and provider clients live behind [`MatchStrategy`]; this crate
//! performs no network or database I/O.
//!
//! ## Examples
//!
//! ```no_run
//! use cinder_core::{FilesystemScanner, MovieFileParser, ScanOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! fn scan_movies() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = FilesystemScanner::new(MovieFileParser::new(), ScanOptions::default())?;
//!     let report = scanner.scan(["/media/movies"], &CancellationToken::new())?;
//!     for result in &report.results {
//!         println!("{} -> {}", result.file_name, result.parsed_title);
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]

/// Error types shared by the scanner and the matcher
pub mod error;

/// Match orchestration and fuzzy scoring
pub mod matching;

/// Title cleaning and filename parsers
pub mod metadata;

/// Filesystem discovery
pub mod scan;

/// TV episode filename parsing
pub mod tv_parser;

/// Scan result types
pub mod types;

pub use error::{BoxError, InvalidPattern, MatchError, Result, RootError, ScanError};
pub use matching::{
    CandidateTitle, ConfidenceScore, MatchResult, MatchStrategy, MatchType, Matcher,
    MatcherConfig, ShortlistOptions, Shortlisted, edit_distance, normalize_for_comparison,
    normalized_similarity, score_title_year, shortlist, title_similarity, year_match,
};
pub use metadata::{FileParser, MovieFileParser, clean_title};
pub use scan::{ExtensionSet, FilesystemScanner, ScanOptions};
pub use tv_parser::TvFileParser;
pub use types::{HintValue, Hints, ScanReport, ScanResult, ScanStats, hint_keys};
