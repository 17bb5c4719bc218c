//! Admin endpoints

use super::{run_blocking, ApiError};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub secret: String,
}

/// POST /api/admin/reset
///
/// Clears every stored selection. 401 if the secret does not match.
pub async fn reset_selections(
    State(state): State<AppState>,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let service = state.service.clone();
    run_blocking(move || service.reset(&request.secret)).await?;

    Ok(Json(json!({ "status": "reset" })))
}
