use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use curve_service::{
    api::{self, ApiState},
    auth::TokenRegistry,
    config::AppConfig,
    curve::QuestDbCurveSource,
    metrics_server, observability,
};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing("curve_service=info");

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // Connections are opened on first use so the service can start before the store.
    let pool = PgPoolOptions::new()
        .max_connections(cfg.questdb.max_connections)
        .connect_lazy(&cfg.questdb.uri)?;

    let auth = cfg.auth.as_ref().map(|a| Arc::new(TokenRegistry::from_config(a)));
    if auth.is_none() {
        tracing::warn!("no [auth] section configured, curve endpoints are unauthenticated");
    }

    let state = ApiState {
        source: Arc::new(QuestDbCurveSource::new(pool)),
        auth,
        utc_offset: cfg.curves.offset()?,
    };

    let addr: SocketAddr = cfg
        .http
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "curve service listening");

    axum::serve(listener, api::router(state).into_make_service()).await?;

    Ok(())
}
