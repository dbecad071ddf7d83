mod curve_queries;

pub use curve_queries::tier_curve;
