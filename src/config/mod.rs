// src/config/mod.rs
//! Process configuration, read once at startup.

pub mod ai;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::{info, warn};

pub use ai::AiConfig;

pub const ENV_TMDB_API_KEY: &str = "TMDB_API_KEY";
pub const ENV_TMDB_BASE_URL: &str = "TMDB_BASE_URL";
pub const ENV_MOCK_AI: &str = "MOCK_AI";
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
pub const ENV_PUBLIC_DIR: &str = "PUBLIC_DIR";
pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    /// `None` selects mock explanations.
    pub ai: Option<AiConfig>,
    pub upstream_timeout: Duration,
    pub public_dir: PathBuf,
    pub debug_routes: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary key lookup. Missing live-mode settings are fatal.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mock = parse_flag(get(ENV_MOCK_AI));
        let tmdb_api_key = get(ENV_TMDB_API_KEY)
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        let ai = if mock {
            if tmdb_api_key.is_empty() {
                warn!("{ENV_TMDB_API_KEY} not set; discovery calls will be rejected upstream");
            }
            None
        } else {
            if tmdb_api_key.is_empty() {
                bail!("Missing {ENV_TMDB_API_KEY} env var (required when MOCK_AI is off)");
            }
            Some(AiConfig::from_lookup(&get)?)
        };

        let tmdb_base_url = get(ENV_TMDB_BASE_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());

        let upstream_timeout = Duration::from_secs(
            parse_secs(get(ENV_UPSTREAM_TIMEOUT_SECS)).unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        );

        let public_dir = get(ENV_PUBLIC_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));

        let cfg = Self {
            tmdb_api_key,
            tmdb_base_url,
            ai,
            upstream_timeout,
            public_dir,
            debug_routes: get(ENV_DEBUG_ROUTES).as_deref() == Some("1"),
        };

        // Safe diagnostics: never the keys themselves.
        info!(
            mock = cfg.is_mock(),
            tmdb_key_len = cfg.tmdb_api_key.len(),
            model = cfg.ai.as_ref().map(|a| a.model_id.as_str()).unwrap_or("-"),
            timeout_secs = cfg.upstream_timeout.as_secs(),
            "config loaded"
        );
        Ok(cfg)
    }

    pub fn is_mock(&self) -> bool {
        self.ai.is_none()
    }
}

fn parse_flag(raw: Option<String>) -> bool {
    matches!(
        raw.unwrap_or_default().trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// zero or garbage falls back to the default
fn parse_secs(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}
