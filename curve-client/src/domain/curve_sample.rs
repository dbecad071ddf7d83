use time::OffsetDateTime;

/// One metered reading as stored in a tier table.
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct CurveSample {
    pub ts: OffsetDateTime,
    pub value: f64,
}

impl CurveSample {
    pub fn new(ts: OffsetDateTime, value: f64) -> Self {
        Self { ts, value }
    }
}
