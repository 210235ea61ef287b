//! Durable article cache keyed by (ticker, title, time).
//!
//! The store is the single owner of article rows: fetch passes upsert into
//! it and reads always go back through it, so concurrent writers for the
//! same ticker resolve deterministically on the primary key.

use chrono::{DateTime, Utc};
use news_core::{Article, RawArticle};
use sqlx::FromRow;

/// Internal DB row with TEXT timestamps (compatible with the sqlx Any backend).
#[derive(Debug, FromRow)]
struct ArticleRow {
    ticker: String,
    title: String,
    link: Option<String>,
    snippet: Option<String>,
    time: String,
}

impl ArticleRow {
    fn into_article(self) -> Article {
        Article {
            ticker: self.ticker,
            title: self.title,
            link: self.link.unwrap_or_default(),
            snippet: self.snippet,
            published_at: DateTime::parse_from_rfc3339(&self.time)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        }
    }
}

/// Persistent cache of fetched news articles.
#[derive(Clone)]
pub struct ArticleStore {
    pool: sqlx::AnyPool,
}

impl ArticleStore {
    pub fn new(pool: sqlx::AnyPool) -> Self {
        Self { pool }
    }

    /// Create the articles table if it doesn't exist.
    ///
    /// The composite primary key is the uniqueness constraint the upsert
    /// relies on; rows are never deleted by this subsystem.
    pub async fn init_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS news_articles (
                ticker TEXT NOT NULL,
                title TEXT NOT NULL,
                link TEXT,
                snippet TEXT,
                time TEXT NOT NULL,
                PRIMARY KEY (ticker, title, time)
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert one fetched article for `ticker`, updating `link`/`snippet`
    /// in place when the (ticker, title, time) key already exists.
    pub async fn upsert(&self, ticker: &str, article: &RawArticle) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO news_articles (ticker, title, link, snippet, time)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (ticker, title, time)
             DO UPDATE SET link = excluded.link, snippet = excluded.snippet",
        )
        .bind(ticker)
        .bind(&article.title)
        .bind(&article.link)
        .bind(&article.snippet)
        .bind(article.published_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch up to `limit` articles for `ticker`, most recent first.
    ///
    /// RFC 3339 timestamps in UTC sort chronologically as text, so the
    /// ORDER BY works on the stored strings directly.
    pub async fn query_by_ticker(
        &self,
        ticker: &str,
        limit: i64,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let rows: Vec<ArticleRow> = sqlx::query_as(
            "SELECT ticker, title, link, snippet, time
             FROM news_articles
             WHERE ticker = ?
             ORDER BY time DESC
             LIMIT ?",
        )
        .bind(ticker)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ArticleRow::into_article).collect())
    }

    /// Distinct tickers with at least `min_articles` cached rows, ascending.
    pub async fn tickers_with_at_least(
        &self,
        min_articles: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT ticker
             FROM news_articles
             GROUP BY ticker
             HAVING COUNT(*) >= ?
             ORDER BY ticker",
        )
        .bind(min_articles)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(ticker,)| ticker).collect())
    }
}
