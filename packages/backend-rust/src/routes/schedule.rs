use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::user_id_from;
use crate::response::{ok, ok_with_message, AppError};
use crate::services::schedule;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateScheduleRequest {
    target_end_date: NaiveDate,
}

pub async fn initiate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<InitiateScheduleRequest>,
) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let stored = schedule::initiate_schedule(
        state.db(),
        state.model(),
        &user_id,
        payload.target_end_date,
        state.now(),
    )
    .await?;
    Ok(ok_with_message(stored, "study plan regenerated").into_response())
}

pub async fn current(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let stored = schedule::current_schedule(state.db(), &user_id).await?;
    Ok(ok(stored).into_response())
}

pub async fn today(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let entry = schedule::today_entry(state.db(), &user_id, state.now()).await?;
    Ok(ok(entry).into_response())
}
