//! Export download endpoint

use super::{run_blocking, ApiError};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use wfh_common::export::ExportFormat;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// csv (default), xlsx or text
    pub format: Option<String>,
}

/// GET /api/export?format=csv|xlsx|text
pub async fn export_selections(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = match query.format.as_deref() {
        Some(value) => value.parse::<ExportFormat>()?,
        None => ExportFormat::Csv,
    };
    let now = state.now();
    let service = state.service.clone();

    let file = run_blocking(move || service.export(format, now)).await?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
    ];
    Ok((headers, file.bytes).into_response())
}
