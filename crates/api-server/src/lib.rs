//! HTTP surface for the stock news timeline backend.
//!
//! Routing, config, and process lifecycle only; the caching logic lives in
//! the `news-cache` crate. Price history and chart rendering are served by
//! separate collaborators and have no routes here.

pub mod config;
pub mod news_routes;

use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use article_store::ArticleStore;
use gnews_client::GNewsClient;
use news_cache::NewsCacheService;
use symbol_directory::SymbolDirectory;

use config::ServerConfig;

pub type NewsService = NewsCacheService<GNewsClient, SymbolDirectory>;

#[derive(Clone)]
pub struct AppState {
    pub news: Arc<NewsService>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(news_routes::news_routes())
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

pub async fn run_server() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Bind address: {}", config.bind_addr);
    tracing::info!(
        "  Cache threshold: {} articles",
        config.cache.min_cached_articles
    );
    tracing::info!("  Lookback: {} year(s)", config.cache.lookback_years);
    tracing::info!(
        "  Upstream pacing: {}ms between calls, max {} articles/call",
        config.inter_call_delay.as_millis(),
        config.max_articles_per_window
    );

    // One process-scoped pool: opened here, closed at shutdown, never
    // re-created per request.
    sqlx::any::install_default_drivers();
    let pool = sqlx::AnyPool::connect(&config.database_url).await?;
    let store = ArticleStore::new(pool);
    store.init_tables().await?;
    tracing::info!("Article store initialized");

    let directory = SymbolDirectory::load(&config.company_tickers_path)?;
    tracing::info!("Symbol directory loaded ({} tickers)", directory.len());

    let client = GNewsClient::new(config.gnews_api_key.clone())
        .with_max_articles(config.max_articles_per_window)
        .with_min_interval(config.inter_call_delay);

    let state = AppState {
        news: Arc::new(NewsCacheService::new(
            store,
            client,
            directory,
            config.cache.clone(),
        )),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("News backend listening on {}", config.bind_addr);
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
}
