//! Read-through news cache: store first, bounded upstream backfill second.
//!
//! Warm tickers (enough cached articles) are served straight from the
//! article store and spend no upstream quota. Cold tickers trigger one
//! fetch pass: plan calendar-quarter windows, fetch them strictly in
//! sequence, dedup, upsert, re-read. If the provider reports quota
//! exhaustion mid-pass the remaining windows are abandoned and the caller
//! gets the list of tickers still usable from cache.

pub mod dedup;
pub mod planner;

use article_store::ArticleStore;
use chrono::Utc;
use news_core::{NameResolver, NewsError, NewsOutcome, NewsSearch, RawArticle};
use tracing::{debug, info, warn};

/// Tuning knobs for the read-through pass.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cached articles required before a ticker is served without an
    /// upstream call. The primary cost control: a warm ticker never spends
    /// quota again.
    pub min_cached_articles: i64,
    /// Page size for store reads.
    pub page_limit: i64,
    /// Years of calendar quarters to backfill for a cold ticker.
    pub lookback_years: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            min_cached_articles: 5,
            page_limit: 50,
            lookback_years: 1,
        }
    }
}

/// Per-ticker read-through orchestrator.
pub struct NewsCacheService<S, R> {
    store: ArticleStore,
    search: S,
    resolver: R,
    config: CacheConfig,
}

impl<S: NewsSearch, R: NameResolver> NewsCacheService<S, R> {
    pub fn new(store: ArticleStore, search: S, resolver: R, config: CacheConfig) -> Self {
        Self {
            store,
            search,
            resolver,
            config,
        }
    }

    /// Serve articles for `ticker`, backfilling from upstream when the
    /// cache is cold.
    pub async fn get_news(&self, ticker: &str) -> Result<NewsOutcome, NewsError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(NewsError::InvalidRequest(
                "ticker parameter (q) is required".to_string(),
            ));
        }

        let cached = self
            .store
            .query_by_ticker(&ticker, self.config.page_limit)
            .await
            .map_err(|e| NewsError::Store(e.to_string()))?;
        if cached.len() as i64 >= self.config.min_cached_articles {
            debug!(%ticker, articles = cached.len(), "serving warm ticker from cache");
            return Ok(NewsOutcome::Articles(cached));
        }

        let Some(search_term) = self.resolver.resolve(&ticker) else {
            return Err(NewsError::NotFound(ticker));
        };

        let windows = planner::quarter_windows(Utc::now(), self.config.lookback_years);
        info!(
            %ticker,
            %search_term,
            windows = windows.len(),
            cached = cached.len(),
            "cold ticker, backfilling from upstream"
        );

        let mut fetched: Vec<RawArticle> = Vec::new();
        for window in windows {
            match self.search.search(&search_term, window).await {
                Ok(articles) => {
                    debug!(
                        %ticker,
                        from = %window.from,
                        to = %window.to,
                        count = articles.len(),
                        "window fetched"
                    );
                    fetched.extend(articles);
                }
                Err(err) if err.quota_exhausted() => {
                    warn!(%ticker, %err, "upstream quota exhausted, aborting fetch pass");
                    return Ok(self.limit_reached().await);
                }
                Err(err) => {
                    // Transient: zero articles for this window, pass continues.
                    warn!(
                        %ticker,
                        from = %window.from,
                        to = %window.to,
                        %err,
                        "window fetch failed, skipping"
                    );
                }
            }
        }

        let unique = dedup::dedup_articles(fetched);
        for article in &unique {
            // Best effort: a failed row must not lose the rest of the pass.
            if let Err(err) = self.store.upsert(&ticker, article).await {
                warn!(%ticker, title = %article.title, %err, "failed to cache article");
            }
        }

        let refreshed = self
            .store
            .query_by_ticker(&ticker, self.config.page_limit)
            .await
            .map_err(|e| NewsError::Store(e.to_string()))?;
        Ok(NewsOutcome::Articles(refreshed))
    }

    /// Throttled terminal state: report which tickers remain usable from
    /// cache instead of failing the request.
    async fn limit_reached(&self) -> NewsOutcome {
        let cached_stocks = self
            .store
            .tickers_with_at_least(self.config.min_cached_articles)
            .await
            .unwrap_or_else(|err| {
                warn!(%err, "failed to list cached tickers");
                Vec::new()
            });
        let message = format!(
            "API limit reached. Try these cached tickers: {}",
            cached_stocks.join(", ")
        );
        NewsOutcome::ApiLimitReached {
            message,
            cached_stocks,
        }
    }
}
