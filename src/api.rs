// src/api.rs
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::discovery::DiscoveryClient;
use crate::explain::Explainer;
use crate::prefs::{self, Preferences};
use crate::reconcile::{reconcile, RecommendedPick};

pub const DISCLAIMER: &str = "For entertainment purposes.";
pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<DiscoveryClient>,
    pub explainer: Arc<Explainer>,
}

impl AppState {
    pub fn new(discovery: DiscoveryClient, explainer: Explainer) -> Self {
        Self {
            discovery: Arc::new(discovery),
            explainer: Arc::new(explainer),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/recommend", post(recommend))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Any failure while recommending; always answered as `400 {"error": ...}`.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut msg = format!("{:#}", self.0);
        if msg.trim().is_empty() {
            msg = "recommendation failed".to_string();
        }
        (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RecommendReq {
    #[serde(default)]
    prefs: Value,
    #[serde(default)]
    limit: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResp {
    pub picks: Vec<RecommendedPick>,
    pub prefs: Preferences,
    pub disclaimer: &'static str,
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn recommend(State(state): State<AppState>, body: Bytes) -> Result<Json<RecommendResp>, ApiError> {
    counter!("recommend_requests_total").increment(1);

    // A missing or unreadable body is treated as `{}`.
    let req: RecommendReq = serde_json::from_slice(&body).unwrap_or_default();
    let prefs = prefs::resolve(&req.prefs);
    let limit = effective_limit(req.limit.as_ref());
    info!(limit, genres = prefs.genres.len(), "recommend request");

    match run_pipeline(&state, &prefs, limit).await {
        Ok(picks) => Ok(Json(RecommendResp {
            picks,
            prefs,
            disclaimer: DISCLAIMER,
        })),
        Err(e) => {
            counter!("recommend_failures_total").increment(1);
            let msg = format!("{e:#}");
            warn!(error = %msg, "recommend failed");
            Err(e.into())
        }
    }
}

async fn run_pipeline(
    state: &AppState,
    prefs: &Preferences,
    limit: usize,
) -> anyhow::Result<Vec<RecommendedPick>> {
    let candidates = state.discovery.fetch(prefs).await?;
    info!(candidates = candidates.len(), "candidates fetched");
    let explanation = state.explainer.explain(prefs, &candidates, limit).await?;
    Ok(reconcile(explanation.picks, &candidates))
}

/// Missing, non-numeric, zero or negative limits use the default; others are
/// floored and capped at [`MAX_LIMIT`]. Numeric strings count as numbers and
/// `true` counts as 1.
pub fn effective_limit(raw: Option<&Value>) -> usize {
    let n = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match n.filter(|v| v.is_finite()).map(f64::floor) {
        Some(v) if v >= 1.0 => (v.min(MAX_LIMIT as f64)) as usize,
        _ => DEFAULT_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(effective_limit(None), 5);
        assert_eq!(effective_limit(Some(&json!(null))), 5);
        assert_eq!(effective_limit(Some(&json!(0))), 5);
        assert_eq!(effective_limit(Some(&json!(-3))), 5);
        assert_eq!(effective_limit(Some(&json!("lots"))), 5);
        assert_eq!(effective_limit(Some(&json!(true))), 1);
        assert_eq!(effective_limit(Some(&json!(false))), 5);
        assert_eq!(effective_limit(Some(&json!(0.5))), 5);
        assert_eq!(effective_limit(Some(&json!(1))), 1);
        assert_eq!(effective_limit(Some(&json!(3.9))), 3);
        assert_eq!(effective_limit(Some(&json!("7"))), 7);
        assert_eq!(effective_limit(Some(&json!(10))), 10);
        assert_eq!(effective_limit(Some(&json!(50))), 10);
        assert_eq!(effective_limit(Some(&json!(1e300))), 10);
    }

    #[test]
    fn api_error_is_400_with_message() {
        let resp = ApiError::from(anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
