pub mod schedule;
pub mod tracks;
pub mod users;
pub mod words;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("column {column} holds malformed data: {reason}")]
    Corrupt { column: &'static str, reason: String },
    #[error("cannot encode {column}: {source}")]
    Encode {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
}

/// Fixed-width UTC timestamps so lexical order matches time order
pub(crate) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(raw: &str, column: &'static str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            column,
            reason: e.to_string(),
        })
}

pub(crate) fn parse_date(raw: &str, column: &'static str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| StoreError::Corrupt {
        column,
        reason: e.to_string(),
    })
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T, column: &'static str) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode { column, source })
}

pub(crate) fn from_json<T: serde::de::DeserializeOwned>(
    raw: &str,
    column: &'static str,
) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
        column,
        reason: e.to_string(),
    })
}
