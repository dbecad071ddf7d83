use std::net::SocketAddr;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder and serve `/metrics` on `bind_addr`.
pub fn init(bind_addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid metrics.bind_addr '{bind_addr}': {e}"))?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus metrics recorder: {e}"))?;
    describe();

    // Only the first call installs a recorder, so a second set cannot happen.
    let _ = PROM_HANDLE.set(handle);

    tokio::spawn(async move {
        let app = Router::new().route("/metrics", get(metrics_handler));

        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    tracing::error!(error = %e, "metrics server error");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to bind metrics listener");
            }
        }
    });

    Ok(())
}

fn describe() {
    metrics::describe_counter!("curve_requests_total", "CCH curve requests received");
    metrics::describe_counter!(
        "curve_resolved_total",
        "CCH curves served, labelled by the tier that answered"
    );
    metrics::describe_counter!("curve_auth_rejected_total", "CCH requests rejected by auth");
    metrics::describe_counter!("curve_store_reads_total", "Tier reads issued to the curve store");
    metrics::describe_counter!("curve_store_errors_total", "Tier reads that failed");
    metrics::describe_histogram!(
        "curve_store_read_seconds",
        metrics::Unit::Seconds,
        "Latency of successful tier reads"
    );
}

async fn metrics_handler() -> String {
    PROM_HANDLE.get().map(PrometheusHandle::render).unwrap_or_default()
}
