use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use super::{format_timestamp, parse_timestamp, StoreError};
use crate::db::DatabaseProxy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    /// Minutes east of UTC used to resolve the learner's calendar day
    pub timezone_offset_minutes: i32,
    pub test_track: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn upsert_user(
    proxy: &DatabaseProxy,
    user_id: &str,
    timezone_offset_minutes: i32,
    test_track: Option<&str>,
    now: DateTime<Utc>,
) -> Result<UserProfile, StoreError> {
    sqlx::query(
        r#"
        INSERT INTO "users" ("id", "timezoneOffsetMinutes", "testTrack", "createdAt")
        VALUES (?, ?, ?, ?)
        ON CONFLICT ("id") DO UPDATE SET
            "timezoneOffsetMinutes" = excluded."timezoneOffsetMinutes",
            "testTrack" = excluded."testTrack"
        "#,
    )
    .bind(user_id)
    .bind(timezone_offset_minutes)
    .bind(test_track)
    .bind(format_timestamp(now))
    .execute(proxy.pool())
    .await?;

    get_user(proxy, user_id)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            entity: "user",
            key: user_id.to_string(),
        })
}

pub async fn get_user(proxy: &DatabaseProxy, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
    let row = sqlx::query(
        r#"
        SELECT "id", "timezoneOffsetMinutes", "testTrack", "createdAt"
        FROM "users" WHERE "id" = ? LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(proxy.pool())
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let created_at: String = row.try_get("createdAt")?;
    Ok(Some(UserProfile {
        id: row.try_get("id")?,
        timezone_offset_minutes: row.try_get("timezoneOffsetMinutes")?,
        test_track: row.try_get("testTrack")?,
        created_at: parse_timestamp(&created_at, "createdAt")?,
    }))
}
