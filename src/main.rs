//! Movie recommendation explainer — binary entrypoint.
//! Loads configuration and boots the Axum router on the Shuttle runtime.

use shuttle_axum::ShuttleAxum;
use tracing::info;

use movie_rec_explainer::{app_from_config, init_tracing, AppConfig};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    // Missing live-mode settings stop the service here, before any request is served.
    let cfg = AppConfig::from_env()?;
    let router = app_from_config(&cfg)?;

    info!(
        mode = if cfg.is_mock() { "mock" } else { "live" },
        public_dir = %cfg.public_dir.display(),
        metrics = cfg.debug_routes,
        "movie-rec-explainer starting: GET /health, POST /recommend"
    );

    Ok(router.into())
}
