use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::clock::is_valid_offset;
use super::{require_user, ServiceError};
use crate::db::operations::tracks;
use crate::db::operations::users::{self as store, UserProfile};
use crate::db::DatabaseProxy;

pub async fn update_profile(
    proxy: &DatabaseProxy,
    user_id: &str,
    timezone_offset_minutes: i32,
    test_track: Option<&str>,
    now: DateTime<Utc>,
) -> Result<UserProfile, ServiceError> {
    if user_id.trim().is_empty() {
        return Err(ServiceError::Invalid("user id must not be empty".to_string()));
    }
    if !is_valid_offset(timezone_offset_minutes) {
        return Err(ServiceError::Invalid(format!(
            "timezone offset {timezone_offset_minutes} is outside UTC-12:00..UTC+14:00"
        )));
    }

    let test_track = test_track.map(str::trim).filter(|t| !t.is_empty());
    let profile = store::upsert_user(proxy, user_id, timezone_offset_minutes, test_track, now).await?;
    tracing::info!(user_id, timezone_offset_minutes, test_track = ?profile.test_track, "profile updated");
    Ok(profile)
}

pub async fn profile(proxy: &DatabaseProxy, user_id: &str) -> Result<UserProfile, ServiceError> {
    require_user(proxy, user_id).await
}

/// Store a track's vocabulary, trimming entries and dropping blanks and
/// duplicates
pub async fn replace_track(
    proxy: &DatabaseProxy,
    track: &str,
    words: &[String],
) -> Result<BTreeSet<String>, ServiceError> {
    let track = track.trim();
    if track.is_empty() {
        return Err(ServiceError::Invalid("track name must not be empty".to_string()));
    }

    let words: BTreeSet<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    let count = tracks::replace_track_words(proxy, track, &words).await?;
    tracing::info!(track, count, "track vocabulary replaced");
    Ok(words)
}

pub async fn track_words(proxy: &DatabaseProxy, track: &str) -> Result<BTreeSet<String>, ServiceError> {
    Ok(tracks::list_track_words(proxy, track.trim()).await?)
}
