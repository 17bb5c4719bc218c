//! Selection endpoints: roster, current week, listing and submission

use super::{run_blocking, ApiError};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use wfh_common::week::WeekInfo;
use wfh_common::{SelectionRecord, SelectionScope, WfhDay};

/// Names and days offered by the form
#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub names: Vec<String>,
    pub days: Vec<WfhDay>,
}

#[derive(Debug, Deserialize)]
pub struct SelectionsQuery {
    #[serde(default)]
    pub scope: SelectionScope,
}

#[derive(Debug, Serialize)]
pub struct SelectionsResponse {
    pub scope: SelectionScope,
    pub week: WeekInfo,
    pub selections: Vec<SelectionRecord>,
}

/// Submission body; `day` stays a string so bad values surface as 400
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub name: String,
    pub day: String,
}

/// GET /api/roster
pub async fn get_roster(State(state): State<AppState>) -> Json<RosterResponse> {
    Json(RosterResponse {
        names: state.service.roster().names().to_vec(),
        days: WfhDay::ALL.to_vec(),
    })
}

/// GET /api/week
pub async fn get_week(State(state): State<AppState>) -> Json<WeekInfo> {
    Json(state.service.current_week(state.now()))
}

/// GET /api/selections?scope=current|all
pub async fn list_selections(
    State(state): State<AppState>,
    Query(query): Query<SelectionsQuery>,
) -> Result<Json<SelectionsResponse>, ApiError> {
    let now = state.now();
    let service = state.service.clone();
    let scope = query.scope;

    let selections = run_blocking(move || service.selections(scope, now)).await?;

    Ok(Json(SelectionsResponse {
        scope,
        week: state.service.current_week(now),
        selections,
    }))
}

/// POST /api/selections
pub async fn submit_selection(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SelectionRecord>), ApiError> {
    let Json(request) = payload?;
    let now = state.now();
    let service = state.service.clone();

    let record =
        run_blocking(move || service.submit(&request.name, &request.day, now)).await?;

    Ok((StatusCode::CREATED, Json(record)))
}
