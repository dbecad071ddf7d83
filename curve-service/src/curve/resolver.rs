use super::{
    normalize, CurveError, CurveSource, NormalizedPoint, OrderedMerge, QueryWindow, Tier, Unit,
};

/// Number of leading characters of a metering point id used to match rows.
pub const POINT_PREFIX_LEN: usize = 20;

/// Which tier answered a curve request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveOrigin {
    Primary,
    SecondaryMerge,
    Empty,
}

impl CurveOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            CurveOrigin::Primary => "primary",
            CurveOrigin::SecondaryMerge => "secondary_merge",
            CurveOrigin::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCurve {
    pub origin: CurveOrigin,
    pub points: Vec<NormalizedPoint>,
}

/// First [`POINT_PREFIX_LEN`] characters of `point_id`.
pub fn point_prefix(point_id: &str) -> &str {
    match point_id.char_indices().nth(POINT_PREFIX_LEN) {
        Some((idx, _)) => &point_id[..idx],
        None => point_id,
    }
}

/// Pick the best tier for `point_id` over `window` and return its curve.
///
/// A non-empty primary curve wins outright and the secondary tiers are never
/// read. Otherwise the general and peak curves are read together and merged,
/// peak winning on shared timestamps. Store failures propagate.
pub async fn resolve_curve<S>(
    source: &S,
    point_id: &str,
    window: &QueryWindow,
) -> Result<ResolvedCurve, CurveError>
where
    S: CurveSource + ?Sized,
{
    let prefix = point_prefix(point_id);

    let primary = source.read(Tier::Primary, prefix, window).await?;
    if !primary.is_empty() {
        let unit = Unit::of_tier(Tier::Primary);
        return Ok(ResolvedCurve {
            origin: CurveOrigin::Primary,
            points: primary.iter().map(|s| normalize(s, unit)).collect(),
        });
    }

    let (general, peak) = futures::try_join!(
        source.read(Tier::SecondaryGeneral, prefix, window),
        source.read(Tier::SecondaryPeak, prefix, window),
    )?;
    if general.is_empty() && peak.is_empty() {
        return Ok(ResolvedCurve {
            origin: CurveOrigin::Empty,
            points: Vec::new(),
        });
    }

    tracing::debug!(
        general = general.len(),
        peak = peak.len(),
        "merging secondary curves"
    );

    // Both secondary tiers share the same native unit.
    let unit = Unit::of_tier(Tier::SecondaryGeneral);
    let points = OrderedMerge::new(general, peak)
        .map(|s| normalize(&s, unit))
        .collect();

    Ok(ResolvedCurve {
        origin: CurveOrigin::SecondaryMerge,
        points,
    })
}
