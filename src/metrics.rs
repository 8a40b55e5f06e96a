// src/metrics.rs
use axum::{routing::get, Router};
use ::metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::warn;

static HANDLE: OnceCell<Option<PrometheusHandle>> = OnceCell::new();

pub struct Metrics {
    pub handle: Option<PrometheusHandle>,
}

impl Metrics {
    /// Install the Prometheus recorder once per process; later calls share it.
    pub fn init() -> Self {
        let handle = HANDLE
            .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
                Ok(h) => {
                    describe_counter!("recommend_requests_total", "POST /recommend calls");
                    describe_counter!("recommend_failures_total", "POST /recommend answered with 400");
                    describe_counter!(
                        "explain_parse_failures_total",
                        "model replies that could not be parsed into picks"
                    );
                    Some(h)
                }
                Err(e) => {
                    // Another recorder is already installed (e.g. by a host runtime).
                    warn!(error = %e, "prometheus recorder not installed");
                    None
                }
            })
            .clone();
        Self { handle }
    }

    /// Returns a router exposing `/metrics` in the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.map(|h| h.render()).unwrap_or_default() }
            }),
        )
    }
}
