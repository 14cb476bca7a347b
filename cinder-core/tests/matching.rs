use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cinder_core::{
    BoxError, CandidateTitle, Hints, MatchError, MatchStrategy, MatchType, Matcher, MatcherConfig,
    ScanResult, ShortlistOptions, hint_keys, score_title_year, shortlist,
};

#[derive(Debug, Clone, PartialEq)]
struct Movie {
    title: String,
    year: Option<i32>,
}

impl Movie {
    fn new(title: &str, year: Option<i32>) -> Self {
        Self {
            title: title.to_string(),
            year,
        }
    }
}

#[derive(Default)]
struct MockStrategy {
    existing: Option<(Movie, f64)>,
    existing_fails: bool,
    search: Vec<Movie>,
    search_fails: bool,
    create_fails: bool,
    fixed_confidence: Option<f64>,
    find_calls: AtomicUsize,
    search_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

#[async_trait]
impl MatchStrategy for MockStrategy {
    type Content = Movie;

    async fn find_existing(&self, _scan: &ScanResult) -> Result<Option<(Movie, f64)>, BoxError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.existing_fails {
            return Err(Box::new(io::Error::other("catalogue offline")));
        }
        Ok(self.existing.clone())
    }

    async fn search_external(&self, _scan: &ScanResult) -> Result<Vec<Movie>, BoxError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.search_fails {
            return Err(Box::new(io::Error::other("provider unreachable")));
        }
        Ok(self.search.clone())
    }

    fn calculate_confidence(&self, scan: &ScanResult, candidate: &Movie) -> f64 {
        if let Some(confidence) = self.fixed_confidence {
            return confidence;
        }
        score_title_year(
            &scan.parsed_title,
            scan.year(),
            CandidateTitle::new(&candidate.title, candidate.year),
        )
    }

    async fn create_content(&self, candidate: Movie) -> Result<Movie, BoxError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.create_fails {
            return Err("insert rejected".into());
        }
        Ok(candidate)
    }
}

fn scan(title: &str, year: Option<i32>) -> ScanResult {
    let mut hints = Hints::new();
    if let Some(year) = year {
        hints.insert(hint_keys::YEAR, year);
    }
    ScanResult {
        file_path: PathBuf::from(format!("/movies/{title}.mkv")),
        file_name: format!("{title}.mkv"),
        file_size: 1024,
        parsed_title: title.to_string(),
        hints,
        is_media: true,
        error: None,
    }
}

#[tokio::test]
async fn confident_existing_content_skips_search() {
    let strategy = MockStrategy {
        existing: Some((Movie::new("The Matrix", Some(1999)), 0.95)),
        search: vec![Movie::new("Other", None)],
        ..Default::default()
    };
    let matcher = Matcher::new(strategy);

    let result = matcher.match_file(scan("The Matrix", Some(1999))).await;

    assert!(result.is_matched());
    assert_eq!(result.match_type, MatchType::Title);
    assert!(!result.created_new);
    assert_eq!(result.confidence, 0.95);
    assert_eq!(result.content, Some(Movie::new("The Matrix", Some(1999))));

    let strategy = matcher.strategy();
    assert_eq!(strategy.search_calls.load(Ordering::SeqCst), 0);
    assert_eq!(strategy.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn weak_existing_candidate_falls_through_to_search() {
    let strategy = MockStrategy {
        existing: Some((Movie::new("The Matrix Reloaded", Some(2003)), 0.5)),
        search: vec![Movie::new("The Matrix", Some(1999))],
        ..Default::default()
    };
    let matcher = Matcher::new(strategy);

    let result = matcher.match_file(scan("The Matrix", Some(1999))).await;

    assert_eq!(result.match_type, MatchType::Title);
    assert!(result.created_new);
    assert!((result.confidence - 1.0).abs() < 1e-9);
    assert_eq!(matcher.strategy().search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_lookup_still_searches() {
    let strategy = MockStrategy {
        existing_fails: true,
        search: vec![Movie::new("Heat", Some(1995))],
        ..Default::default()
    };
    let matcher = Matcher::new(strategy);

    let result = matcher.match_file(scan("Heat", Some(1995))).await;

    assert!(result.is_matched());
    assert_eq!(matcher.strategy().find_calls.load(Ordering::SeqCst), 1);
    assert_eq!(matcher.strategy().search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn low_scoring_candidate_is_fuzzy() {
    let strategy = MockStrategy {
        search: vec![Movie::new("Something Close", None)],
        fixed_confidence: Some(0.6),
        ..Default::default()
    };
    let matcher = Matcher::new(strategy);

    let result = matcher.match_file(scan("Something", None)).await;

    assert!(result.is_matched());
    assert_eq!(result.match_type, MatchType::Fuzzy);
    assert!(result.created_new);
    assert_eq!(result.confidence, 0.6);
}

#[tokio::test]
async fn threshold_boundary_is_title() {
    let strategy = MockStrategy {
        search: vec![Movie::new("Edge", None)],
        fixed_confidence: Some(0.7),
        ..Default::default()
    };
    let result = Matcher::new(strategy).match_file(scan("Edge", None)).await;
    assert_eq!(result.match_type, MatchType::Title);
}

#[tokio::test]
async fn empty_search_is_no_matches() {
    let matcher = Matcher::new(MockStrategy::default());

    let result = matcher.match_file(scan("Nothing Here", None)).await;

    assert!(!result.is_matched());
    assert_eq!(result.match_type, MatchType::Unmatched);
    assert!(result.content.is_none());
    let error = result.error.expect("error expected");
    assert!(error.is_no_matches());
    assert!(matches!(error, MatchError::NoMatches { ref title } if title == "Nothing Here"));
    assert_eq!(matcher.strategy().create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn search_failure_is_distinct_from_no_matches() {
    let strategy = MockStrategy {
        search_fails: true,
        ..Default::default()
    };
    let result = Matcher::new(strategy).match_file(scan("Heat", None)).await;

    let error = result.error.expect("error expected");
    assert!(!error.is_no_matches());
    assert!(matches!(error, MatchError::SearchFailed(_)));
    assert!(error.to_string().contains("provider unreachable"));
}

#[tokio::test]
async fn create_failure_is_unmatched() {
    let strategy = MockStrategy {
        search: vec![Movie::new("Heat", Some(1995))],
        create_fails: true,
        ..Default::default()
    };
    let result = Matcher::new(strategy).match_file(scan("Heat", Some(1995))).await;

    assert_eq!(result.match_type, MatchType::Unmatched);
    assert!(!result.created_new);
    assert!(matches!(result.error, Some(MatchError::CreateFailed(_))));
}

#[tokio::test]
async fn min_confidence_rejects_before_creation() {
    let strategy = MockStrategy {
        search: vec![Movie::new("Far Away", None)],
        fixed_confidence: Some(0.3),
        ..Default::default()
    };
    let config = MatcherConfig {
        min_confidence: Some(0.5),
        ..Default::default()
    };
    let matcher = Matcher::with_config(strategy, config);

    let result = matcher.match_file(scan("Close By", None)).await;

    assert_eq!(result.match_type, MatchType::Unmatched);
    assert_eq!(result.confidence, 0.3);
    assert!(matches!(
        result.error,
        Some(MatchError::LowConfidence { threshold, .. }) if threshold == 0.5
    ));
    assert_eq!(matcher.strategy().create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn require_title_refuses_blank_titles() {
    let config = MatcherConfig {
        require_title: true,
        ..Default::default()
    };
    let matcher = Matcher::with_config(MockStrategy::default(), config);

    let result = matcher.match_file(scan("", None)).await;

    assert!(matches!(result.error, Some(MatchError::NoTitle { .. })));
    assert_eq!(matcher.strategy().find_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batch_preserves_order_and_isolates_failures() {
    let strategy = MockStrategy {
        existing: Some((Movie::new("Known", None), 0.9)),
        ..Default::default()
    };
    let matcher = Matcher::new(strategy);

    let scans = vec![scan("First", None), scan("Second", None), scan("Third", None)];
    let results = matcher.match_files(scans).await;

    assert_eq!(results.len(), 3);
    let names: Vec<_> = results
        .iter()
        .map(|result| result.scan_result.parsed_title.as_str())
        .collect();
    assert_eq!(names, ["First", "Second", "Third"]);
    assert!(results.iter().all(|result| result.is_matched()));
    assert_eq!(matcher.strategy().find_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn out_of_range_confidence_is_clamped() {
    let strategy = MockStrategy {
        search: vec![Movie::new("Heat", Some(1995))],
        fixed_confidence: Some(1.3),
        ..Default::default()
    };
    let result = Matcher::new(strategy).match_file(scan("Heat", None)).await;
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.match_type, MatchType::Title);

    let strategy = MockStrategy {
        search: vec![Movie::new("Heat", Some(1995))],
        fixed_confidence: Some(f64::NAN),
        ..Default::default()
    };
    let result = Matcher::new(strategy).match_file(scan("Heat", None)).await;
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.match_type, MatchType::Fuzzy);
    assert!(result.created_new);

    let strategy = MockStrategy {
        existing: Some((Movie::new("Heat", Some(1995)), 1.4)),
        ..Default::default()
    };
    let result = Matcher::new(strategy).match_file(scan("Heat", None)).await;
    assert_eq!(result.confidence, 1.0);
    assert!(!result.created_new);
}

/// Strategy backed by an in-memory catalogue, looked up through `shortlist`.
struct CatalogueStrategy {
    catalogue: Vec<Movie>,
}

#[async_trait]
impl MatchStrategy for CatalogueStrategy {
    type Content = Movie;

    async fn find_existing(&self, scan: &ScanResult) -> Result<Option<(Movie, f64)>, BoxError> {
        let best = shortlist(
            scan,
            self.catalogue.iter().cloned(),
            |movie| CandidateTitle::new(&movie.title, movie.year),
            ShortlistOptions::default(),
        )
        .into_iter()
        .next();
        Ok(best.map(|entry| (entry.candidate, entry.confidence)))
    }

    async fn search_external(&self, _scan: &ScanResult) -> Result<Vec<Movie>, BoxError> {
        Ok(Vec::new())
    }

    fn calculate_confidence(&self, scan: &ScanResult, candidate: &Movie) -> f64 {
        score_title_year(
            &scan.parsed_title,
            scan.year(),
            CandidateTitle::new(&candidate.title, candidate.year),
        )
    }

    async fn create_content(&self, candidate: Movie) -> Result<Movie, BoxError> {
        Ok(candidate)
    }
}

#[tokio::test]
async fn catalogue_shortlist_identifies_known_titles() {
    let matcher = Matcher::new(CatalogueStrategy {
        catalogue: vec![
            Movie::new("Alien", Some(1979)),
            Movie::new("Aliens", Some(1986)),
            Movie::new("Paddington", Some(2014)),
        ],
    });

    let results = matcher
        .match_files(vec![
            scan("Aliens", Some(1986)),
            scan("Alien", None),
            scan("Paddington", None),
            scan("Heat", Some(1995)),
        ])
        .await;

    assert_eq!(results[0].content, Some(Movie::new("Aliens", Some(1986))));
    assert!((results[0].confidence - 1.0).abs() < 1e-9);
    assert_eq!(results[1].content, Some(Movie::new("Alien", Some(1979))));
    assert_eq!(results[2].content, Some(Movie::new("Paddington", Some(2014))));
    assert!(results[..3].iter().all(|result| result.match_type == MatchType::Title));
    assert!(results[..3].iter().all(|result| !result.created_new));

    assert_eq!(results[3].match_type, MatchType::Unmatched);
    assert!(results[3].error.as_ref().is_some_and(MatchError::is_no_matches));
}
