//! Data Transfer Objects
//!
//! Response types for the API endpoints.

use serde::{Deserialize, Serialize};

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Whether the metrics document exists under the public dir
    pub document_present: bool,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

/// Validation summary of the served metrics document
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentCheckResponse {
    pub valid: bool,
    /// Country rows, zero when invalid
    pub countries: usize,
    /// Series buckets, zero when invalid
    pub buckets: usize,
    /// Parse or validation failure, null when valid
    pub error: Option<String>,
}
