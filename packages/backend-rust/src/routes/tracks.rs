use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::{ok, AppError};
use crate::services::users;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReplaceTrackRequest {
    words: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackWordsResponse {
    track: String,
    count: usize,
    words: Vec<String>,
}

pub async fn replace_words(
    State(state): State<AppState>,
    Path(track): Path<String>,
    Json(payload): Json<ReplaceTrackRequest>,
) -> Result<Response, AppError> {
    let words = users::replace_track(state.db(), &track, &payload.words).await?;
    Ok(ok(TrackWordsResponse {
        track,
        count: words.len(),
        words: words.into_iter().collect(),
    })
    .into_response())
}

pub async fn list_words(State(state): State<AppState>, Path(track): Path<String>) -> Result<Response, AppError> {
    let words = users::track_words(state.db(), &track).await?;
    Ok(ok(TrackWordsResponse {
        track,
        count: words.len(),
        words: words.into_iter().collect(),
    })
    .into_response())
}
