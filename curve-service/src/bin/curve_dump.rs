use anyhow::{bail, Result};
use curve_service::{
    config::AppConfig,
    curve::{parse_interval_count, query_window, resolve_curve, AnchorPeriod, QuestDbCurveSource},
    observability,
};
use sqlx::postgres::PgPoolOptions;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing("curve_service=warn");

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: curve_dump <cups> <YYYYMM> [interval]");
    }
    let cups = &args[1];
    let anchor = AnchorPeriod::parse(&args[2])?;
    let interval = parse_interval_count(args.get(3).map(String::as_str));

    // Load configuration (CURVE_CONFIG can point at another store).
    let cfg = AppConfig::load()?;
    let window = query_window(anchor, interval, cfg.curves.offset()?)?;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.questdb.max_connections)
        .connect(&cfg.questdb.uri)
        .await?;
    let source = QuestDbCurveSource::new(pool);

    let resolved = resolve_curve(&source, cups, &window).await?;
    tracing::info!(
        origin = resolved.origin.as_str(),
        points = resolved.points.len(),
        start = %window.start,
        end = %window.end,
        "curve resolved"
    );

    println!("{}", serde_json::to_string(&resolved.points)?);

    Ok(())
}
