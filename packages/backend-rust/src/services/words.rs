use chrono::{DateTime, Utc};
use lexis_algo::{DecayModel, RetentionStatus};
use serde::Serialize;

use super::clock::local_today;
use super::{require_user, ServiceError};
use crate::db::operations::words::{self as store, SavedWord};
use crate::db::DatabaseProxy;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStatus {
    #[serde(flatten)]
    pub word: SavedWord,
    pub review_count: usize,
    pub status: RetentionStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueWord {
    pub word: String,
    pub word_id: String,
    pub retention: f64,
    pub next_review_at: DateTime<Utc>,
    pub days_until_due: i64,
}

fn normalize_word(word: &str) -> Result<&str, ServiceError> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Invalid("word must not be empty".to_string()));
    }
    Ok(trimmed)
}

async fn require_saved_word(
    proxy: &DatabaseProxy,
    user_id: &str,
    word: &str,
) -> Result<SavedWord, ServiceError> {
    store::get_saved_word(proxy, user_id, word)
        .await?
        .ok_or_else(|| ServiceError::WordNotFound(word.to_string()))
}

pub async fn save_word(
    proxy: &DatabaseProxy,
    user_id: &str,
    word: &str,
    now: DateTime<Utc>,
) -> Result<SavedWord, ServiceError> {
    let word = normalize_word(word)?;
    require_user(proxy, user_id).await?;

    let saved = store::save_word(proxy, user_id, word, now).await?;
    tracing::debug!(user_id, word, word_id = %saved.id, "word saved");
    Ok(saved)
}

pub async fn mark_known(
    proxy: &DatabaseProxy,
    user_id: &str,
    word: &str,
    is_known: bool,
) -> Result<SavedWord, ServiceError> {
    let word = normalize_word(word)?;
    require_user(proxy, user_id).await?;

    if !store::mark_known(proxy, user_id, word, is_known).await? {
        return Err(ServiceError::WordNotFound(word.to_string()));
    }
    require_saved_word(proxy, user_id, word).await
}

/// Append a review and return the word's updated status. `reviewed_at`
/// defaults to `now` and may not lie in the future or before the save.
pub async fn record_review(
    proxy: &DatabaseProxy,
    model: &DecayModel,
    user_id: &str,
    word: &str,
    success: bool,
    reviewed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<WordStatus, ServiceError> {
    let word = normalize_word(word)?;
    let user = require_user(proxy, user_id).await?;
    let saved = require_saved_word(proxy, user_id, word).await?;

    let reviewed_at = reviewed_at.unwrap_or(now);
    if reviewed_at > now {
        return Err(ServiceError::Invalid("review time lies in the future".to_string()));
    }
    if reviewed_at < saved.created_at {
        return Err(ServiceError::Invalid(
            "review time precedes the moment the word was saved".to_string(),
        ));
    }

    store::record_review(proxy, &saved.id, reviewed_at, success).await?;
    tracing::debug!(user_id, word, success, "review recorded");

    status_of(proxy, model, saved, user.timezone_offset_minutes, now).await
}

pub async fn word_status(
    proxy: &DatabaseProxy,
    model: &DecayModel,
    user_id: &str,
    word: &str,
    now: DateTime<Utc>,
) -> Result<WordStatus, ServiceError> {
    let word = normalize_word(word)?;
    let user = require_user(proxy, user_id).await?;
    let saved = require_saved_word(proxy, user_id, word).await?;
    status_of(proxy, model, saved, user.timezone_offset_minutes, now).await
}

/// Saved, not-known words due for review at `now`; most forgotten first
pub async fn due_words(
    proxy: &DatabaseProxy,
    model: &DecayModel,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<DueWord>, ServiceError> {
    let user = require_user(proxy, user_id).await?;
    let offset = user.timezone_offset_minutes;
    let records = store::list_saved_words_with_reviews(proxy, user_id).await?;

    let mut due: Vec<DueWord> = records
        .into_iter()
        .filter_map(|(word, record)| {
            let status = model.retention_status(&record.reviews, record.created_at, now);
            let status = local_status(status, offset, now);
            status.is_due.then(|| DueWord {
                word,
                word_id: record.id,
                retention: status.retention,
                next_review_at: status.next_review_at,
                days_until_due: status.days_until_due,
            })
        })
        .collect();

    due.sort_by(|a, b| {
        a.retention
            .total_cmp(&b.retention)
            .then_with(|| a.word.cmp(&b.word))
    });

    Ok(due)
}

async fn status_of(
    proxy: &DatabaseProxy,
    model: &DecayModel,
    saved: SavedWord,
    offset_minutes: i32,
    now: DateTime<Utc>,
) -> Result<WordStatus, ServiceError> {
    let reviews = store::list_reviews(proxy, &saved.id).await?;
    let status = model.retention_status(&reviews, saved.created_at, now);
    let status = local_status(status, offset_minutes, now);
    Ok(WordStatus {
        review_count: reviews.len(),
        word: saved,
        status,
    })
}

/// Count days until due on the user's calendar rather than UTC's
fn local_status(mut status: RetentionStatus, offset_minutes: i32, now: DateTime<Utc>) -> RetentionStatus {
    status.days_until_due =
        (local_today(status.next_review_at, offset_minutes) - local_today(now, offset_minutes)).num_days();
    status
}
