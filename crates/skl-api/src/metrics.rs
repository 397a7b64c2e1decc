//! # Prometheus Metrics
//!
//! Request counters and latency histograms recorded through the `metrics`
//! facade, exported by `metrics-exporter-prometheus` at `/metrics`.
//!
//! The recorder is process-global and installed once; the handle renders
//! the accumulated registry on each scrape. Alert-level gauges are set by
//! the alerts route when a feed is computed.

use std::sync::OnceLock;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// The process-global Prometheus handle, installing the recorder on first
/// use. Returns `None` if another recorder was installed first.
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "prometheus recorder install failed; /metrics will be unavailable");
                None
            }
        })
        .as_ref()
}

/// Middleware recording a request counter and latency histogram per route.
///
/// Uses the matched route template (`/v1/incidents/{id}`) rather than the
/// raw path to keep label cardinality bounded.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "skladno_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    histogram!(
        "skladno_http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(elapsed);

    response
}

/// GET /metrics — render the Prometheus registry.
pub async fn render_metrics() -> Response {
    match prometheus_handle() {
        Some(handle) => handle.render().into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder unavailable",
        )
            .into_response(),
    }
}
