use std::{collections::HashMap, time::Instant};

use sqlx::PgPool;

use super::{CurveError, CurveSample, QueryWindow, Tier};

/// Ordered read access to one tier of the curve store.
///
/// Implementations return the samples of every point whose name starts with
/// `point_prefix`, inside `window`, sorted ascending by timestamp.
#[async_trait::async_trait]
pub trait CurveSource: Send + Sync {
    async fn read(
        &self,
        tier: Tier,
        point_prefix: &str,
        window: &QueryWindow,
    ) -> Result<Vec<CurveSample>, CurveError>;
}

/// Curve store backed by QuestDB over the Postgres wire protocol.
#[derive(Clone)]
pub struct QuestDbCurveSource {
    pool: PgPool,
}

impl QuestDbCurveSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CurveSource for QuestDbCurveSource {
    async fn read(
        &self,
        tier: Tier,
        point_prefix: &str,
        window: &QueryWindow,
    ) -> Result<Vec<CurveSample>, CurveError> {
        let started = Instant::now();
        metrics::counter!("curve_store_reads_total", "tier" => tier.as_str()).increment(1);

        match curve_client::db::tier_curve(&self.pool, tier, point_prefix, window.start, window.end)
            .await
        {
            Ok(rows) => {
                metrics::histogram!("curve_store_read_seconds", "tier" => tier.as_str())
                    .record(started.elapsed().as_secs_f64());
                tracing::debug!(%tier, rows = rows.len(), "curve tier read");
                Ok(rows)
            }
            Err(e) => {
                metrics::counter!("curve_store_errors_total", "tier" => tier.as_str()).increment(1);
                tracing::error!(%tier, error = %e, "curve tier read failed");
                Err(CurveError::Store {
                    tier,
                    message: e.to_string(),
                })
            }
        }
    }
}

/// Curve store held in memory, one row list per tier.
///
/// Rows carry the point name they belong to, so prefix matching behaves like
/// the database query.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCurveSource {
    rows: HashMap<Tier, Vec<(String, CurveSample)>>,
}

impl InMemoryCurveSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples<I>(mut self, tier: Tier, point: &str, samples: I) -> Self
    where
        I: IntoIterator<Item = CurveSample>,
    {
        self.insert(tier, point, samples);
        self
    }

    pub fn insert<I>(&mut self, tier: Tier, point: &str, samples: I)
    where
        I: IntoIterator<Item = CurveSample>,
    {
        let rows = self.rows.entry(tier).or_default();
        rows.extend(samples.into_iter().map(|s| (point.to_string(), s)));
    }
}

#[async_trait::async_trait]
impl CurveSource for InMemoryCurveSource {
    async fn read(
        &self,
        tier: Tier,
        point_prefix: &str,
        window: &QueryWindow,
    ) -> Result<Vec<CurveSample>, CurveError> {
        let mut samples: Vec<CurveSample> = self
            .rows
            .get(&tier)
            .into_iter()
            .flatten()
            .filter(|(name, s)| name.starts_with(point_prefix) && window.contains(s.ts))
            .map(|(_, s)| *s)
            .collect();
        samples.sort_by_key(|s| s.ts);
        Ok(samples)
    }
}
