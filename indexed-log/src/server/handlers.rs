//! HTTP route handlers for the query server.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use common::Clock;

use super::error::ApiError;
use super::metrics::Metrics;
use super::request::QueryParams;
use super::response::{HealthResponse, QueryResponse};
use crate::config::LogFileOptions;
use crate::query::query_range;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub opts: Arc<LogFileOptions>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<Metrics>,
}

/// Handle GET /api/v1/query
///
/// Resolves the requested time window and fans the range query out across
/// all sidecars under the configured root. The blocking file and mmap work
/// runs off the async executor.
pub async fn handle_query(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryResponse>, ApiError> {
    let now = state.clock.now_utc();
    let (t_lo, t_hi) = params.resolve(now)?;

    tracing::info!(t_lo, t_hi, time_opt = %params.time_opt, "handling range query");

    let opts = Arc::clone(&state.opts);
    let records = tokio::task::spawn_blocking(move || query_range(&opts, t_lo, t_hi))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;

    state.metrics.query_requests_total.inc();
    state
        .metrics
        .query_records_total
        .inc_by(records.len() as u64);

    Ok(Json(QueryResponse::ok(now, records)))
}

/// Handle GET /-/healthy
pub async fn handle_healthy(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.clock.now_utc()))
}

/// Handle GET /-/ready
///
/// Ready means the deployment root is enumerable; until then queries would
/// fail on every request.
pub async fn handle_ready(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if !state.opts.root.is_dir() {
        return Err(ApiError::Internal(format!(
            "root {} is not a directory",
            state.opts.root.display()
        )));
    }
    Ok(Json(HealthResponse::ok(state.clock.now_utc())))
}

/// Handle GET /metrics
pub async fn handle_metrics(State(state): State<AppState>) -> String {
    state.metrics.encode()
}
