mod curve_sample;
mod tier;

pub use curve_sample::CurveSample;
pub use tier::Tier;
