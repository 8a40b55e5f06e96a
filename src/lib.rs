// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod discovery;
pub mod explain;
pub mod genres;
pub mod metrics;
pub mod prefs;
pub mod reconcile;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;

use crate::discovery::DiscoveryClient;
use crate::explain::{BedrockClient, ExplainMode, Explainer};

/// Build the full application router from an explicit config:
/// API routes, optional `/metrics`, and the static asset fallback.
pub fn app_from_config(cfg: &AppConfig) -> Result<Router> {
    let discovery = DiscoveryClient::new(
        cfg.tmdb_base_url.clone(),
        cfg.tmdb_api_key.clone(),
        cfg.upstream_timeout,
    )?;

    let mode = match &cfg.ai {
        None => ExplainMode::Mock,
        Some(ai) => ExplainMode::Live(Arc::new(BedrockClient::new(ai, cfg.upstream_timeout)?)),
    };
    let explainer = Explainer::new(mode);
    info!(mode = explainer.mode_name(), "explainer ready");

    let mut app = api::router(AppState::new(discovery, explainer));
    if cfg.debug_routes {
        app = app.merge(metrics::Metrics::init().router());
    }
    Ok(app.fallback_service(ServeDir::new(&cfg.public_dir)))
}

/// Build the router from the process environment (after `.env`, if present).
pub async fn app() -> Result<Router> {
    let _ = dotenvy::dotenv();
    let cfg = AppConfig::from_env()?;
    app_from_config(&cfg)
}

/// Install a compact fmt subscriber unless one is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("movie_rec_explainer=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
