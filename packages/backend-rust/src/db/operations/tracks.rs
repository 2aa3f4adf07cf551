use std::collections::BTreeSet;

use crate::db::operations::StoreError;
use crate::db::DatabaseProxy;

/// Replace the whole vocabulary of an exam track; returns the new word count
pub async fn replace_track_words(
    proxy: &DatabaseProxy,
    track: &str,
    words: &BTreeSet<String>,
) -> Result<usize, StoreError> {
    let mut tx = proxy.pool().begin().await?;

    sqlx::query(r#"DELETE FROM "test_vocabulary" WHERE "track" = ?"#)
        .bind(track)
        .execute(&mut *tx)
        .await?;

    for word in words {
        sqlx::query(r#"INSERT INTO "test_vocabulary" ("track", "word") VALUES (?, ?)"#)
            .bind(track)
            .bind(word)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(words.len())
}

pub async fn list_track_words(proxy: &DatabaseProxy, track: &str) -> Result<BTreeSet<String>, StoreError> {
    let words: Vec<String> = sqlx::query_scalar(
        r#"SELECT "word" FROM "test_vocabulary" WHERE "track" = ? ORDER BY "word""#,
    )
    .bind(track)
    .fetch_all(proxy.pool())
    .await?;

    Ok(words.into_iter().collect())
}
