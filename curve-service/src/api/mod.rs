use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use time::UtcOffset;

use crate::{
    auth::{AuthError, TokenRegistry},
    curve::{
        parse_interval_count, query_window, resolve_curve, AnchorPeriod, CurveError, CurveSource,
        NormalizedPoint,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub source: Arc<dyn CurveSource>,
    /// `None` disables authentication.
    pub auth: Option<Arc<TokenRegistry>>,
    pub utc_offset: UtcOffset,
}

/// Query string as ordered pairs; repeated keys are kept.
type QueryPairs = Vec<(String, String)>;

/// First value of `key`, the way form handlers read a single parameter.
fn first_param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Curve(#[from] CurveError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Auth(AuthError::PointNotAllowed(_)) => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::Auth(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Curve(CurveError::InvalidPeriod(_)) => (StatusCode::BAD_REQUEST, self.to_string()),
            // Store details stay in the logs.
            ApiError::Curve(CurveError::Store { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "curve store unavailable".to_string(),
            ),
        };
        let body = Json(serde_json::json!({ "error": message }));
        (status, body).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/CCHFact/:cups/:period", get(cch_fact).options(preflight))
        .with_state(state)
}

async fn preflight() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

async fn cch_fact(
    State(state): State<ApiState>,
    Path((cups, period)): Path<(String, String)>,
    // An unparsable query string degrades to no parameters.
    query: Option<Query<QueryPairs>>,
    headers: HeaderMap,
) -> Result<Json<Vec<NormalizedPoint>>, ApiError> {
    metrics::counter!("curve_requests_total").increment(1);

    if let Some(registry) = &state.auth {
        let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        if let Err(e) = registry.authorize(header, &cups) {
            metrics::counter!("curve_auth_rejected_total").increment(1);
            tracing::warn!(error = %e, "curve request rejected");
            return Err(e.into());
        }
    }

    let anchor = AnchorPeriod::parse(&period)?;
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let interval = parse_interval_count(first_param(&pairs, "interval"));
    let window = query_window(anchor, interval, state.utc_offset)?;
    tracing::debug!(start = %window.start, end = %window.end, "CCH curve window");

    let resolved = resolve_curve(state.source.as_ref(), &cups, &window).await?;
    metrics::counter!("curve_resolved_total", "origin" => resolved.origin.as_str()).increment(1);
    tracing::debug!(
        origin = resolved.origin.as_str(),
        points = resolved.points.len(),
        "CCH curve resolved"
    );

    Ok(Json(resolved.points))
}
