//! Document Routes
//!
//! - GET /api/v1/document/check - Validate the served metrics document

use axum::{extract::State, Json};
use painel_core::MetricsDocument;
use std::sync::Arc;

use crate::api::dto::DocumentCheckResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/v1/document/check
///
/// 404 when the document is missing; an unparseable document is reported
/// in the body with `valid: false`.
pub async fn check(State(state): State<Arc<AppState>>) -> ApiResult<Json<DocumentCheckResponse>> {
    let path = state.document_path();
    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(check_text(&text)))
}

/// Validation summary of document text
pub fn check_text(text: &str) -> DocumentCheckResponse {
    match MetricsDocument::from_json(text) {
        Ok(doc) => DocumentCheckResponse {
            valid: true,
            countries: doc.countries.len(),
            buckets: doc.series.len(),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Served document is invalid");
            DocumentCheckResponse {
                valid: false,
                countries: 0,
                buckets: 0,
                error: Some(e.to_string()),
            }
        }
    }
}
