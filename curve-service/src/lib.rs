pub mod api;
pub mod auth;
pub mod config;
pub mod curve;
pub mod metrics_server;
pub mod observability;

pub use curve::{resolve_curve, CurveError, CurveSource};
