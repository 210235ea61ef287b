use async_trait::async_trait;

use crate::{RawArticle, TimeWindow, UpstreamError};

/// Upstream news search API: one bounded call per time window.
///
/// Implementations own their pacing; callers issue the calls strictly in
/// sequence and never in parallel.
#[async_trait]
pub trait NewsSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        window: TimeWindow,
    ) -> Result<Vec<RawArticle>, UpstreamError>;
}

/// Resolves a ticker symbol to a human-readable search term.
pub trait NameResolver: Send + Sync {
    fn resolve(&self, ticker: &str) -> Option<String>;
}
