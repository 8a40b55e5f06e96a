// tests/common/mod.rs
//
// Shared helpers: throwaway upstream stubs on 127.0.0.1:0 and an in-process app.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    extract::Query,
    http::{HeaderMap, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt as _; // for `oneshot`

use movie_rec_explainer::{app_from_config, AppConfig};

pub const BODY_LIMIT: usize = 1024 * 1024;

/// Serve `router` on an ephemeral port; returns `http://127.0.0.1:<port>`.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}")
}

pub fn movies(n: usize) -> Value {
    let results: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "id": 1000 + i,
                "title": format!("Movie {i}"),
                "release_date": format!("{}-06-01", 2001 + i),
                "overview": format!("Overview {i}"),
                "genre_ids": [878, 53, 18],
                "poster_path": format!("/p{i}.jpg"),
                "popularity": 100.0 - i as f64
            })
        })
        .collect();
    json!({ "page": 1, "results": results, "total_pages": 1, "total_results": n })
}

pub type Captured = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Discovery stub returning `n` movies; records every query string it sees.
pub async fn discovery_stub(n: usize) -> (String, Captured) {
    let seen: Captured = Arc::default();
    let rec = seen.clone();
    let router = Router::new().route(
        "/3/discover/movie",
        get(move |Query(q): Query<HashMap<String, String>>| {
            let rec = rec.clone();
            async move {
                rec.lock().unwrap().push(q);
                Json(movies(n))
            }
        }),
    );
    (format!("{}/3", spawn(router).await), seen)
}

/// Discovery stub that always answers with `status`.
pub async fn discovery_failing(status: StatusCode) -> String {
    let router = Router::new().route(
        "/3/discover/movie",
        get(move || async move { (status, Json(json!({ "status_message": "boom" }))) }),
    );
    format!("{}/3", spawn(router).await)
}

pub type CapturedHeaders = Arc<Mutex<Vec<(String, HeaderMap, Value)>>>;

/// Bedrock stub replying with an Anthropic envelope whose text is `text`.
pub async fn bedrock_stub(text: &str) -> (String, CapturedHeaders) {
    let seen: CapturedHeaders = Arc::default();
    let rec = seen.clone();
    let text = text.to_string();
    let router = Router::new().route(
        "/model/{model}/invoke",
        post(
            move |axum::extract::Path(model): axum::extract::Path<String>,
                  headers: HeaderMap,
                  Json(body): Json<Value>| {
                let rec = rec.clone();
                let text = text.clone();
                async move {
                    rec.lock().unwrap().push((model, headers, body));
                    Json(json!({
                        "id": "msg_stub",
                        "type": "message",
                        "role": "assistant",
                        "content": [{ "type": "text", "text": text }],
                        "stop_reason": "end_turn"
                    }))
                }
            },
        ),
    );
    (spawn(router).await, seen)
}

pub fn lookup(pairs: Vec<(&'static str, String)>) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    move |k: &str| map.get(k).cloned()
}

pub fn mock_config(tmdb_base: &str) -> AppConfig {
    AppConfig::from_lookup(lookup(vec![
        ("MOCK_AI", "1".into()),
        ("TMDB_API_KEY", "test-key".into()),
        ("TMDB_BASE_URL", tmdb_base.into()),
        ("UPSTREAM_TIMEOUT_SECS", "2".into()),
    ]))
    .expect("mock config")
}

pub fn live_config(tmdb_base: &str, bedrock_base: &str) -> AppConfig {
    AppConfig::from_lookup(lookup(vec![
        ("TMDB_API_KEY", "test-key".into()),
        ("TMDB_BASE_URL", tmdb_base.into()),
        ("BEDROCK_MODEL_ID", "anthropic.claude-3-haiku-20240307-v1:0".into()),
        ("AWS_REGION", "us-east-1".into()),
        ("AWS_BEARER_TOKEN_BEDROCK", "bedrock-token".into()),
        ("BEDROCK_ENDPOINT", bedrock_base.into()),
        ("UPSTREAM_TIMEOUT_SECS", "2".into()),
    ]))
    .expect("live config")
}

pub fn app(cfg: &AppConfig) -> Router {
    app_from_config(cfg).expect("build app")
}

/// POST /recommend with a raw JSON body; returns status + parsed JSON.
pub async fn post_recommend(app: Router, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/recommend")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build POST /recommend");
    let resp = app.oneshot(req).await.expect("oneshot /recommend");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.expect("read body");
    let v: Value = serde_json::from_slice(&bytes).expect("json body");
    (status, v)
}
