//! News API routes.
//!
//! `GET /api/news?q=<ticker>` is the only entry point: every outcome of
//! the read-through pass maps to one of four response shapes, and nothing
//! from the upstream provider leaks through raw.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use news_core::{Article, NewsError, NewsOutcome};

use crate::AppState;

#[derive(Deserialize)]
pub struct NewsQuery {
    #[serde(default)]
    pub q: String,
}

/// Article as rendered to the charting frontend.
#[derive(Serialize)]
struct ArticleResponse {
    title: String,
    link: String,
    snippet: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            title: article.title,
            link: article.link,
            snippet: article.snippet,
            published_at: article.published_at,
        }
    }
}

pub fn news_routes() -> Router<AppState> {
    Router::new().route("/api/news", get(get_news))
}

async fn get_news(State(state): State<AppState>, Query(query): Query<NewsQuery>) -> Response {
    match state.news.get_news(&query.q).await {
        Ok(NewsOutcome::Articles(articles)) => {
            let body: Vec<ArticleResponse> = articles.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(NewsOutcome::ApiLimitReached {
            message,
            cached_stocks,
        }) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "API limit reached",
                "message": message,
                "cachedStocks": cached_stocks,
            })),
        )
            .into_response(),
        Err(NewsError::InvalidRequest(message)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Invalid request",
                "message": message,
            })),
        )
            .into_response(),
        Err(NewsError::NotFound(ticker)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Company not found",
                "message": format!("No company found for ticker: {ticker}"),
            })),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(%err, "news request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Server error",
                    "message": "Failed to fetch news articles",
                })),
            )
                .into_response()
        }
    }
}
