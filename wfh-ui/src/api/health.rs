//! Health check endpoint

use axum::Json;
use serde::Serialize;

/// Health check response: status, module name, and version
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "wfh-ui".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
