// src/discovery.rs
//! Candidate fetcher over TMDB `discover/movie`.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use metrics::histogram;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::genres;
use crate::prefs::{Preferences, DEFAULT_YEAR_RANGE};

pub const MAX_CANDIDATES: usize = 10;
pub const MIN_VOTE_COUNT: u32 = 500;
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w342";

/// A normalized discovery result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub title: String,
    /// "YYYY" or empty.
    pub year: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    #[serde(default)]
    results: Vec<RawMovie>,
}

#[derive(Debug, Deserialize)]
struct RawMovie {
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    poster_path: Option<String>,
}

#[derive(Clone)]
pub struct DiscoveryClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DiscoveryClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("movie-rec-explainer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout.min(Duration::from_secs(4)))
            .timeout(timeout)
            .build()
            .context("building discovery http client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Up to [`MAX_CANDIDATES`] movies in the service's popularity order.
    pub async fn fetch(&self, prefs: &Preferences) -> Result<Vec<Candidate>> {
        let t0 = Instant::now();
        let url = format!("{}/discover/movie", self.base_url);

        let mut query = vec![("api_key", self.api_key.clone())];
        query.extend(build_query(prefs));

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            // the URL carries the API key; keep it out of errors and logs
            .map_err(|e| {
                let e = e.without_url();
                warn!(error = %e, "discovery request failed");
                e
            })
            .context("discovery request failed")?;

        let resp = resp
            .error_for_status()
            .map_err(reqwest::Error::without_url)
            .context("discovery service returned an error status")?;

        let body: DiscoverResponse = resp
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("decoding discovery response")?;

        let out = normalize(body.results);
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("discovery_fetch_ms").record(ms);
        debug!(count = out.len(), elapsed_ms = ms, "discovery candidates fetched");
        Ok(out)
    }
}

/// Filter parameters derived from preferences (everything but the API key).
pub fn build_query(prefs: &Preferences) -> Vec<(&'static str, String)> {
    let (start, end) = prefs.year_range.unwrap_or(DEFAULT_YEAR_RANGE);

    let mut q = vec![
        ("sort_by", "popularity.desc".to_string()),
        ("vote_count.gte", MIN_VOTE_COUNT.to_string()),
        ("include_adult", "false".to_string()),
        ("page", "1".to_string()),
        ("primary_release_date.gte", format!("{start}-01-01")),
        ("primary_release_date.lte", format!("{end}-12-31")),
    ];
    if let Some(ids) = genres::to_identifiers(&prefs.genres) {
        q.push(("with_genres", ids));
    }
    if let Some(ids) = genres::to_identifiers(&prefs.avoid) {
        q.push(("without_genres", ids));
    }
    if let Some(lang) = prefs.language.as_deref().filter(|l| !l.is_empty()) {
        q.push(("with_original_language", lang.to_string()));
    }
    q
}

fn normalize(raw: Vec<RawMovie>) -> Vec<Candidate> {
    raw.into_iter()
        .take(MAX_CANDIDATES)
        .map(|m| Candidate {
            title: m.title,
            year: year_of(m.release_date.as_deref()),
            overview: m.overview.unwrap_or_default(),
            genres: genres::to_names(&m.genre_ids),
            poster_url: m
                .poster_path
                .filter(|p| !p.is_empty())
                .map(|p| format!("{POSTER_BASE_URL}{p}")),
        })
        .collect()
}

// first four characters, or nothing when the date is too short to carry a year
fn year_of(release_date: Option<&str>) -> String {
    let date = release_date.unwrap_or_default();
    let year: String = date.chars().take(4).collect();
    if year.chars().count() == 4 {
        year
    } else {
        String::new()
    }
}
