use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::user_id_from;
use crate::response::{ok, AppError};
use crate::services::users;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    timezone_offset_minutes: i32,
    #[serde(default)]
    test_track: Option<String>,
}

pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let profile = users::profile(state.db(), &user_id).await?;
    Ok(ok(profile).into_response())
}

pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Response, AppError> {
    let user_id = user_id_from(&headers)?;
    let profile = users::update_profile(
        state.db(),
        &user_id,
        payload.timezone_offset_minutes,
        payload.test_track.as_deref(),
        state.now(),
    )
    .await?;
    Ok(ok(profile).into_response())
}
