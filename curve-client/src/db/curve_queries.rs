use anyhow::Result;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::domain::{CurveSample, Tier};

/// Build a `LIKE` pattern matching every value that starts with `prefix`.
///
/// `%`, `_` and the escape character itself are escaped with `\`, the
/// default `LIKE` escape.
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn tier_curve_sql(tier: Tier) -> String {
    let type_filter = if tier.curve_type().is_some() {
        "\n          AND type = $4"
    } else {
        ""
    };

    // Table names come from the closed `Tier` set, never from caller input.
    format!(
        r#"
        SELECT
            datetime AS ts,
            ai AS value
        FROM {table}
        WHERE name LIKE $1
          AND datetime >= $2
          AND datetime <  $3{type_filter}
        ORDER BY datetime
        "#,
        table = tier.table(),
    )
}

/// Fetch the time-ordered curve of one tier for every point starting with
/// `point_prefix`, over `[start, end)`.
pub async fn tier_curve(
    pool: &PgPool,
    tier: Tier,
    point_prefix: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<CurveSample>> {
    let sql = tier_curve_sql(tier);

    let mut query = sqlx::query_as::<_, CurveSample>(&sql)
        .bind(like_prefix_pattern(point_prefix))
        .bind(start)
        .bind(end);
    if let Some(curve_type) = tier.curve_type() {
        query = query.bind(curve_type);
    }

    let rows = query.fetch_all(pool).await?;

    Ok(rows)
}
