//! Load-curve selection across the three storage tiers.
//!
//! A request flows through [`interval::query_window`], then
//! [`resolver::resolve_curve`], which reads tiers through a
//! [`source::CurveSource`], merges the secondary tiers with
//! [`merge::OrderedMerge`] when needed and normalizes the output.

pub mod interval;
pub mod merge;
pub mod normalize;
pub mod resolver;
pub mod source;

pub use curve_client::domain::{CurveSample, Tier};
pub use interval::{parse_interval_count, query_window, AnchorPeriod, QueryWindow};
pub use merge::OrderedMerge;
pub use normalize::{normalize, NormalizedPoint, Unit};
pub use resolver::{point_prefix, resolve_curve, CurveOrigin, ResolvedCurve};
pub use source::{CurveSource, InMemoryCurveSource, QuestDbCurveSource};

#[derive(thiserror::Error, Debug)]
pub enum CurveError {
    #[error("invalid period '{0}': expected YYYYMM")]
    InvalidPeriod(String),
    #[error("curve store error reading {tier}: {message}")]
    Store { tier: Tier, message: String },
}
