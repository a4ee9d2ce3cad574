//! `/metrics` endpoint.
use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::{error, info};
use warden_prometheus::PrometheusMetrics;

const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

pub fn router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(scrape))
        .with_state(metrics)
}

/// Bind `addr` and serve metrics in the background.
///
/// Binding errors are returned; serving errors are logged.
pub async fn serve(addr: SocketAddr, metrics: PrometheusMetrics) -> anyhow::Result<JoinHandle<()>> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics endpoint on {addr}"))?;
    info!(%addr, "serving metrics");

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(metrics)).await {
            error!(error = %e, "metrics endpoint stopped");
        }
    }))
}

async fn scrape(State(metrics): State<PrometheusMetrics>) -> Response {
    match metrics.encode_text() {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
