//! Oracle Route
//!
//! - GET /cgi-bin/oraculo - Derive, record and return the oracle summary
//!
//! Failures still answer 200 with `{"status": "erro", "msg": ...}` so
//! existing consumers keep parsing a single shape.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::oracle::OracleResponse;

/// GET /cgi-bin/oraculo
pub async fn consult(State(state): State<Arc<AppState>>) -> Json<OracleResponse> {
    let result = state.oracle.consult().await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Oracle summary failed");
    }
    Json(OracleResponse::from(result))
}
