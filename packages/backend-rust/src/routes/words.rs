use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::user_id_from;
use crate::response::{ok, ok_with_message, AppError};
use crate::services::words;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveWordRequest {
    word: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkKnownRequest {
    #[serde(default = "default_known")]
    is_known: bool,
}

fn default_known() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReviewRequest {
    success: bool,
    #[serde(default)]
    reviewed_at: Option<DateTime<Utc>>,
}

pub async fn save_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SaveWordRequest>,
) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let saved = words::save_word(state.db(), &user_id, &payload.word, state.now()).await?;
    Ok((StatusCode::CREATED, ok(saved)).into_response())
}

pub async fn mark_known(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(word): Path<String>,
    payload: Option<Json<MarkKnownRequest>>,
) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let is_known = payload.map(|Json(p)| p.is_known).unwrap_or(true);
    let saved = words::mark_known(state.db(), &user_id, &word, is_known).await?;
    let message = if is_known {
        "word marked as known"
    } else {
        "word returned to study"
    };
    Ok(ok_with_message(saved, message).into_response())
}

pub async fn record_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(word): Path<String>,
    Json(payload): Json<RecordReviewRequest>,
) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let status = words::record_review(
        state.db(),
        state.model(),
        &user_id,
        &word,
        payload.success,
        payload.reviewed_at,
        state.now(),
    )
    .await?;
    Ok((StatusCode::CREATED, ok(status)).into_response())
}

pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(word): Path<String>,
) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let status = words::word_status(state.db(), state.model(), &user_id, &word, state.now()).await?;
    Ok(ok(status).into_response())
}

pub async fn due(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let due = words::due_words(state.db(), state.model(), &user_id, state.now()).await?;
    Ok(ok(due).into_response())
}
