use async_trait::async_trait;

use crate::error::BoxError;
use crate::types::ScanResult;

/// Content-type specific hooks used by [`Matcher`](super::Matcher).
///
/// Implementations own persistence and provider access; nothing in this crate
/// talks to a database or the network directly. Timeouts, retries and caching
/// of provider calls are the implementation's concern.
#[async_trait]
pub trait MatchStrategy: Send + Sync {
    /// The content a scan result is identified as (movie, series, ...).
    type Content: Send;

    /// Look up content that is already known, returning the best candidate
    /// with its confidence. `Ok(None)` means nothing plausible is known.
    async fn find_existing(
        &self,
        scan: &ScanResult,
    ) -> Result<Option<(Self::Content, f64)>, BoxError>;

    /// Query external providers. The first element is taken as the best
    /// candidate; the provider's relevance ordering is trusted as-is.
    async fn search_external(&self, scan: &ScanResult) -> Result<Vec<Self::Content>, BoxError>;

    /// Score how well `candidate` matches `scan`, in `[0.0, 1.0]`.
    fn calculate_confidence(&self, scan: &ScanResult, candidate: &Self::Content) -> f64;

    /// Persist `candidate` and return the stored content.
    async fn create_content(&self, candidate: Self::Content) -> Result<Self::Content, BoxError>;
}
