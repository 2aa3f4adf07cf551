use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use lexis_algo::{DailyScheduleEntry, PlanMetadata, StudyPlan};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{format_timestamp, from_json, parse_date, parse_timestamp, to_json, StoreError};
use crate::db::DatabaseProxy;

/// A persisted plan with its bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSchedule {
    pub id: String,
    pub user_id: String,
    pub target_end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub plan: StudyPlan,
}

/// Swap the user's plan for `plan`. The old schedule and every daily row
/// are removed and the new ones written in a single transaction, so readers
/// never observe a mix of two plans.
pub async fn replace_schedule(
    proxy: &DatabaseProxy,
    user_id: &str,
    target_end_date: NaiveDate,
    plan: &StudyPlan,
    now: DateTime<Utc>,
) -> Result<String, StoreError> {
    let schedule_id = Uuid::new_v4().to_string();
    let metadata = to_json(&plan.metadata, "metadata")?;

    let mut tx = proxy.pool().begin().await?;

    sqlx::query(
        r#"
        DELETE FROM "daily_schedules"
        WHERE "scheduleId" IN (SELECT "id" FROM "schedules" WHERE "userId" = ?)
        "#,
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(r#"DELETE FROM "schedules" WHERE "userId" = ?"#)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO "schedules" ("id", "userId", "targetEndDate", "metadata", "createdAt")
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&schedule_id)
    .bind(user_id)
    .bind(target_end_date.to_string())
    .bind(metadata)
    .bind(format_timestamp(now))
    .execute(&mut *tx)
    .await?;

    for (date, entry) in &plan.daily_schedules {
        sqlx::query(
            r#"
            INSERT INTO "daily_schedules"
                ("id", "scheduleId", "date", "newWords", "testPractice", "nonTestPractice")
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&schedule_id)
        .bind(date.to_string())
        .bind(to_json(&entry.new_words, "newWords")?)
        .bind(to_json(&entry.test_practice, "testPractice")?)
        .bind(to_json(&entry.non_test_practice, "nonTestPractice")?)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(schedule_id)
}

pub async fn get_schedule(proxy: &DatabaseProxy, user_id: &str) -> Result<Option<StoredSchedule>, StoreError> {
    // Schedule and daily rows come from one snapshot
    let mut tx = proxy.pool().begin().await?;

    let row = sqlx::query(
        r#"
        SELECT "id", "userId", "targetEndDate", "metadata", "createdAt"
        FROM "schedules" WHERE "userId" = ? LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.commit().await?;
        return Ok(None);
    };

    let id: String = row.try_get("id")?;
    let target_end_date: String = row.try_get("targetEndDate")?;
    let created_at: String = row.try_get("createdAt")?;
    let metadata: String = row.try_get("metadata")?;
    let metadata: PlanMetadata = from_json(&metadata, "metadata")?;

    let daily_rows = sqlx::query(
        r#"
        SELECT "date", "newWords", "testPractice", "nonTestPractice"
        FROM "daily_schedules" WHERE "scheduleId" = ?
        ORDER BY "date"
        "#,
    )
    .bind(&id)
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    let mut daily_schedules = BTreeMap::new();
    for daily in &daily_rows {
        let entry = entry_from_row(daily)?;
        daily_schedules.insert(entry.date, entry);
    }

    Ok(Some(StoredSchedule {
        id,
        user_id: row.try_get("userId")?,
        target_end_date: parse_date(&target_end_date, "targetEndDate")?,
        created_at: parse_timestamp(&created_at, "createdAt")?,
        plan: StudyPlan {
            daily_schedules,
            metadata,
        },
    }))
}

pub async fn get_daily_entry(
    proxy: &DatabaseProxy,
    user_id: &str,
    date: NaiveDate,
) -> Result<Option<DailyScheduleEntry>, StoreError> {
    let row = sqlx::query(
        r#"
        SELECT d."date", d."newWords", d."testPractice", d."nonTestPractice"
        FROM "daily_schedules" d
        JOIN "schedules" s ON s."id" = d."scheduleId"
        WHERE s."userId" = ? AND d."date" = ?
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(date.to_string())
    .fetch_optional(proxy.pool())
    .await?;

    row.as_ref().map(entry_from_row).transpose()
}

fn entry_from_row(row: &SqliteRow) -> Result<DailyScheduleEntry, StoreError> {
    let date: String = row.try_get("date")?;
    let new_words: String = row.try_get("newWords")?;
    let test_practice: String = row.try_get("testPractice")?;
    let non_test_practice: String = row.try_get("nonTestPractice")?;

    Ok(DailyScheduleEntry {
        date: parse_date(&date, "date")?,
        new_words: from_json(&new_words, "newWords")?,
        test_practice: from_json(&test_practice, "testPractice")?,
        non_test_practice: from_json(&non_test_practice, "nonTestPractice")?,
    })
}
