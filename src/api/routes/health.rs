//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Reports `degraded` when the metrics document is missing; the page still
/// loads but its first fetch will fail.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let document_present = tokio::fs::try_exists(state.document_path())
        .await
        .unwrap_or(false);

    let status = if document_present { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        document_present,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
