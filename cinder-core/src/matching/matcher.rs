use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::strategy::MatchStrategy;
use crate::error::MatchError;
use crate::types::ScanResult;

/// How a scan result was identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Exact external id match
    Exact,
    /// Title (and year) match
    Title,
    /// Fuzzy title match
    Fuzzy,
    /// Manually matched
    Manual,
    /// Could not be matched
    Unmatched,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Title => "title",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Manual => "manual",
            MatchType::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one identification attempt.
///
/// A result is matched when it carries content and no error. `created_new`
/// is only ever set together with content.
#[derive(Debug)]
pub struct MatchResult<T> {
    pub scan_result: ScanResult,
    pub content: Option<T>,
    pub match_type: MatchType,
    pub confidence: f64,
    pub error: Option<MatchError>,
    pub created_new: bool,
}

impl<T> MatchResult<T> {
    pub fn matched(
        scan_result: ScanResult,
        content: T,
        match_type: MatchType,
        confidence: f64,
        created_new: bool,
    ) -> Self {
        Self {
            scan_result,
            content: Some(content),
            match_type,
            confidence,
            error: None,
            created_new,
        }
    }

    pub fn unmatched(scan_result: ScanResult, error: MatchError) -> Self {
        Self {
            scan_result,
            content: None,
            match_type: MatchType::Unmatched,
            confidence: 0.0,
            error: Some(error),
            created_new: false,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.content.is_some() && self.error.is_none()
    }
}

/// Thresholds applied by [`Matcher`]. The defaults are the stock policy;
/// `min_confidence` and `require_title` are opt-in rejections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Existing content at or above this confidence is returned without any
    /// external search.
    pub existing_threshold: f64,
    /// Newly created content at or above this confidence is a `Title` match,
    /// below it a `Fuzzy` one.
    pub title_threshold: f64,
    /// Reject provider candidates scoring below this value instead of creating them.
    pub min_confidence: Option<f64>,
    /// Refuse to match scan results whose parsed title is blank.
    pub require_title: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            existing_threshold: 0.8,
            title_threshold: 0.7,
            min_confidence: None,
            require_title: false,
        }
    }
}

/// Content-type agnostic match orchestrator.
///
/// Holds no mutable state, so a single matcher can serve many concurrent
/// callers as long as the strategy allows it.
#[derive(Debug)]
pub struct Matcher<S> {
    strategy: S,
    config: MatcherConfig,
}

impl<S: MatchStrategy> Matcher<S> {
    pub fn new(strategy: S) -> Self {
        Self::with_config(strategy, MatcherConfig::default())
    }

    pub fn with_config(strategy: S, config: MatcherConfig) -> Self {
        Self { strategy, config }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Identify a single scan result.
    pub async fn match_file(&self, scan: ScanResult) -> MatchResult<S::Content> {
        if self.config.require_title && !scan.has_title() {
            let file_name = scan.file_name.clone();
            return MatchResult::unmatched(scan, MatchError::NoTitle { file_name });
        }

        let existing = self
            .strategy
            .find_existing(&scan)
            .await
            .map(|found| found.map(|(content, confidence)| (content, bounded(confidence))));
        match existing {
            Ok(Some((existing, confidence))) if confidence >= self.config.existing_threshold => {
                debug!(
                    file = %scan.file_name,
                    confidence,
                    "matched existing content"
                );
                return MatchResult::matched(scan, existing, MatchType::Title, confidence, false);
            }
            Ok(Some((_, confidence))) => {
                debug!(
                    file = %scan.file_name,
                    confidence,
                    threshold = self.config.existing_threshold,
                    "existing candidate below threshold, searching providers"
                );
            }
            Ok(None) => {}
            Err(err) => {
                warn!(file = %scan.file_name, error = %err, "existing content lookup failed");
            }
        }

        let searched = self.strategy.search_external(&scan).await;
        let candidates = match searched {
            Ok(candidates) => candidates,
            Err(err) => {
                return MatchResult::unmatched(scan, MatchError::SearchFailed(err));
            }
        };

        let Some(candidate) = candidates.into_iter().next() else {
            let title = scan.parsed_title.clone();
            return MatchResult::unmatched(scan, MatchError::NoMatches { title });
        };

        let confidence = bounded(self.strategy.calculate_confidence(&scan, &candidate));

        if let Some(threshold) = self.config.min_confidence
            && confidence < threshold
        {
            let mut rejected = MatchResult::unmatched(
                scan,
                MatchError::LowConfidence {
                    confidence,
                    threshold,
                },
            );
            rejected.confidence = confidence;
            return rejected;
        }

        let created = match self.strategy.create_content(candidate).await {
            Ok(created) => created,
            Err(err) => {
                return MatchResult::unmatched(scan, MatchError::CreateFailed(err));
            }
        };

        let match_type = if confidence >= self.config.title_threshold {
            MatchType::Title
        } else {
            MatchType::Fuzzy
        };

        debug!(
            file = %scan.file_name,
            confidence,
            match_type = %match_type,
            "created content from provider candidate"
        );

        MatchResult::matched(scan, created, match_type, confidence, true)
    }

    /// Identify every scan result in order. Individual failures are reported
    /// in their own result and never stop the batch.
    pub async fn match_files<I>(&self, scans: I) -> Vec<MatchResult<S::Content>>
    where
        I: IntoIterator<Item = ScanResult>,
    {
        let mut results = Vec::new();
        for scan in scans {
            results.push(self.match_file(scan).await);
        }

        let matched = results.iter().filter(|result| result.is_matched()).count();
        let created = results.iter().filter(|result| result.created_new).count();
        info!(
            total = results.len(),
            matched,
            created,
            unmatched = results.len() - matched,
            "match batch finished"
        );

        results
    }
}

/// Strategy scores outside `[0.0, 1.0]` are clamped, NaN counts as no confidence.
fn bounded(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scan(title: &str) -> ScanResult {
        ScanResult {
            file_path: PathBuf::from(format!("/movies/{title}.mkv")),
            file_name: format!("{title}.mkv"),
            file_size: 0,
            parsed_title: title.to_string(),
            hints: Default::default(),
            is_media: true,
            error: None,
        }
    }

    #[test]
    fn match_result_invariants() {
        let matched = MatchResult::matched(scan("Test"), "content", MatchType::Title, 0.9, true);
        assert!(matched.is_matched());
        assert!(matched.created_new);

        let unmatched: MatchResult<&str> = MatchResult::unmatched(
            scan("Test"),
            MatchError::NoMatches {
                title: "Test".into(),
            },
        );
        assert!(!unmatched.is_matched());
        assert_eq!(unmatched.match_type, MatchType::Unmatched);
        assert!(!unmatched.created_new);

        let mut with_error =
            MatchResult::matched(scan("Test"), "content", MatchType::Title, 0.9, false);
        with_error.error = Some(MatchError::NoTitle {
            file_name: "Test.mkv".into(),
        });
        assert!(!with_error.is_matched());
    }

    #[test]
    fn match_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MatchType::Fuzzy).unwrap(), "\"fuzzy\"");
        assert_eq!(MatchType::Unmatched.to_string(), "unmatched");
    }

    #[test]
    fn default_thresholds() {
        let config = MatcherConfig::default();
        assert_eq!(config.existing_threshold, 0.8);
        assert_eq!(config.title_threshold, 0.7);
        assert!(config.min_confidence.is_none());
        assert!(!config.require_title);
    }
}
