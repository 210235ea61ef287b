use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached news article for one ticker, as served to clients.
///
/// The article store treats (ticker, title, time) as the identity of a row;
/// `link` and `snippet` are the mutable parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub ticker: String,
    pub title: String,
    pub link: String,
    pub snippet: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

/// An upstream article normalized to a single shape, before it has been
/// attributed to a ticker or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub link: String,
    pub snippet: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// An inclusive date range for one upstream search call.
///
/// Windows within one planning pass never overlap; they exist only for the
/// lifetime of the request that planned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Terminal outcome of one read-through pass.
///
/// Quota exhaustion is a first-class outcome rather than an error: the
/// caller is expected to fall back to the tickers that are still usable
/// from cache.
#[derive(Debug, Clone)]
pub enum NewsOutcome {
    /// Articles for the requested ticker, most recent first.
    Articles(Vec<Article>),

    /// The upstream provider refused further calls for now.
    ApiLimitReached {
        message: String,
        cached_stocks: Vec<String>,
    },
}
