use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use news_cache::CacheConfig;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub gnews_api_key: String,
    pub company_tickers_path: String,
    pub bind_addr: String,
    /// Articles requested per upstream call (provider caps this low).
    pub max_articles_per_window: u32,
    /// Minimum interval between successive upstream calls.
    pub inter_call_delay: Duration,
    pub cache: CacheConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let gnews_api_key = env::var("GNEWS_API_KEY").context("GNEWS_API_KEY is required")?;

        let cache = CacheConfig {
            min_cached_articles: env::var("MIN_CACHED_ARTICLES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("MIN_CACHED_ARTICLES must be an integer")?,
            page_limit: env::var("NEWS_PAGE_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .context("NEWS_PAGE_LIMIT must be an integer")?,
            lookback_years: env::var("NEWS_LOOKBACK_YEARS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("NEWS_LOOKBACK_YEARS must be an integer")?,
        };
        if cache.min_cached_articles < 1 {
            bail!("MIN_CACHED_ARTICLES must be at least 1");
        }
        if cache.page_limit < 1 {
            bail!("NEWS_PAGE_LIMIT must be at least 1");
        }

        Ok(Self {
            database_url,
            gnews_api_key,
            company_tickers_path: env::var("COMPANY_TICKERS_PATH")
                .unwrap_or_else(|_| "company_tickers.json".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3300".to_string()),
            max_articles_per_window: env::var("NEWS_MAX_PER_WINDOW")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("NEWS_MAX_PER_WINDOW must be an integer")?,
            inter_call_delay: Duration::from_millis(
                env::var("NEWS_API_DELAY_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .context("NEWS_API_DELAY_MS must be an integer")?,
            ),
            cache,
        })
    }
}
