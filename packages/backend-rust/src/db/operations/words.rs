use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use lexis_algo::{ReviewEvent, WordRecord};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, StoreError};
use crate::db::DatabaseProxy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWord {
    pub id: String,
    pub user_id: String,
    pub word: String,
    pub created_at: DateTime<Utc>,
    pub is_known: bool,
}

impl SavedWord {
    fn from_row(row: &SqliteRow) -> Result<Self, StoreError> {
        let created_at: String = row.try_get("createdAt")?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("userId")?,
            word: row.try_get("word")?,
            created_at: parse_timestamp(&created_at, "createdAt")?,
            is_known: row.try_get("isKnown")?,
        })
    }

    pub fn into_record(self, reviews: Vec<ReviewEvent>) -> WordRecord {
        WordRecord {
            id: self.id,
            created_at: self.created_at,
            reviews,
            is_known: self.is_known,
        }
    }
}

/// Save a word for a user. Saving an already-saved word returns the
/// existing row untouched.
pub async fn save_word(
    proxy: &DatabaseProxy,
    user_id: &str,
    word: &str,
    now: DateTime<Utc>,
) -> Result<SavedWord, StoreError> {
    sqlx::query(
        r#"
        INSERT INTO "saved_words" ("id", "userId", "word", "createdAt", "isKnown")
        VALUES (?, ?, ?, ?, 0)
        ON CONFLICT ("userId", "word") DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(word)
    .bind(format_timestamp(now))
    .execute(proxy.pool())
    .await?;

    get_saved_word(proxy, user_id, word)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            entity: "saved word",
            key: word.to_string(),
        })
}

pub async fn get_saved_word(
    proxy: &DatabaseProxy,
    user_id: &str,
    word: &str,
) -> Result<Option<SavedWord>, StoreError> {
    let row = sqlx::query(
        r#"
        SELECT "id", "userId", "word", "createdAt", "isKnown"
        FROM "saved_words" WHERE "userId" = ? AND "word" = ? LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(word)
    .fetch_optional(proxy.pool())
    .await?;

    row.as_ref().map(SavedWord::from_row).transpose()
}

/// Returns false when the word is not saved
pub async fn mark_known(
    proxy: &DatabaseProxy,
    user_id: &str,
    word: &str,
    is_known: bool,
) -> Result<bool, StoreError> {
    let result = sqlx::query(r#"UPDATE "saved_words" SET "isKnown" = ? WHERE "userId" = ? AND "word" = ?"#)
        .bind(is_known)
        .bind(user_id)
        .bind(word)
        .execute(proxy.pool())
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn record_review(
    proxy: &DatabaseProxy,
    saved_word_id: &str,
    reviewed_at: DateTime<Utc>,
    success: bool,
) -> Result<ReviewEvent, StoreError> {
    sqlx::query(
        r#"INSERT INTO "reviews" ("id", "savedWordId", "reviewedAt", "success") VALUES (?, ?, ?, ?)"#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(saved_word_id)
    .bind(format_timestamp(reviewed_at))
    .bind(success)
    .execute(proxy.pool())
    .await?;

    Ok(ReviewEvent::new(reviewed_at, success))
}

/// Review history of one saved word, oldest first
pub async fn list_reviews(proxy: &DatabaseProxy, saved_word_id: &str) -> Result<Vec<ReviewEvent>, StoreError> {
    let rows = sqlx::query(
        r#"
        SELECT "reviewedAt", "success" FROM "reviews"
        WHERE "savedWordId" = ?
        ORDER BY "reviewedAt", "id"
        "#,
    )
    .bind(saved_word_id)
    .fetch_all(proxy.pool())
    .await?;

    rows.iter().map(review_from_row).collect()
}

/// Every saved word that is not marked known, keyed by word, with its
/// review history
pub async fn list_saved_words_with_reviews(
    proxy: &DatabaseProxy,
    user_id: &str,
) -> Result<BTreeMap<String, WordRecord>, StoreError> {
    let word_rows = sqlx::query(
        r#"
        SELECT "id", "userId", "word", "createdAt", "isKnown"
        FROM "saved_words" WHERE "userId" = ? AND "isKnown" = 0
        "#,
    )
    .bind(user_id)
    .fetch_all(proxy.pool())
    .await?;

    let review_rows = sqlx::query(
        r#"
        SELECT r."savedWordId", r."reviewedAt", r."success"
        FROM "reviews" r
        JOIN "saved_words" s ON s."id" = r."savedWordId"
        WHERE s."userId" = ? AND s."isKnown" = 0
        ORDER BY r."reviewedAt", r."id"
        "#,
    )
    .bind(user_id)
    .fetch_all(proxy.pool())
    .await?;

    let mut reviews: BTreeMap<String, Vec<ReviewEvent>> = BTreeMap::new();
    for row in &review_rows {
        let saved_word_id: String = row.try_get("savedWordId")?;
        reviews.entry(saved_word_id).or_default().push(review_from_row(row)?);
    }

    let mut records = BTreeMap::new();
    for row in &word_rows {
        let saved = SavedWord::from_row(row)?;
        let history = reviews.remove(&saved.id).unwrap_or_default();
        records.insert(saved.word.clone(), saved.into_record(history));
    }

    Ok(records)
}

/// Every saved word, known ones included
pub async fn list_all_saved_words(proxy: &DatabaseProxy, user_id: &str) -> Result<BTreeSet<String>, StoreError> {
    let words: Vec<String> =
        sqlx::query_scalar(r#"SELECT "word" FROM "saved_words" WHERE "userId" = ?"#)
            .bind(user_id)
            .fetch_all(proxy.pool())
            .await?;

    Ok(words.into_iter().collect())
}

/// Words saved within `[start, end)` and not marked known
pub async fn words_saved_between(
    proxy: &DatabaseProxy,
    user_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<BTreeSet<String>, StoreError> {
    let words: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT "word" FROM "saved_words"
        WHERE "userId" = ? AND "isKnown" = 0 AND "createdAt" >= ? AND "createdAt" < ?
        "#,
    )
    .bind(user_id)
    .bind(format_timestamp(start))
    .bind(format_timestamp(end))
    .fetch_all(proxy.pool())
    .await?;

    Ok(words.into_iter().collect())
}

/// Words with at least one review within `[start, end)`
pub async fn words_reviewed_between(
    proxy: &DatabaseProxy,
    user_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<BTreeSet<String>, StoreError> {
    let words: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT s."word"
        FROM "reviews" r
        JOIN "saved_words" s ON s."id" = r."savedWordId"
        WHERE s."userId" = ? AND r."reviewedAt" >= ? AND r."reviewedAt" < ?
        "#,
    )
    .bind(user_id)
    .bind(format_timestamp(start))
    .bind(format_timestamp(end))
    .fetch_all(proxy.pool())
    .await?;

    Ok(words.into_iter().collect())
}

fn review_from_row(row: &SqliteRow) -> Result<ReviewEvent, StoreError> {
    let reviewed_at: String = row.try_get("reviewedAt")?;
    Ok(ReviewEvent::new(
        parse_timestamp(&reviewed_at, "reviewedAt")?,
        row.try_get("success")?,
    ))
}
