pub mod clock;
pub mod schedule;
pub mod users;
pub mod words;

use lexis_algo::PlanError;
use thiserror::Error;

use crate::db::operations::users::{get_user, UserProfile};
use crate::db::operations::StoreError;
use crate::db::DatabaseProxy;
use crate::response::AppError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("word '{0}' is not saved")]
    WordNotFound(String),
    #[error("no study plan for user {0}")]
    ScheduleNotFound(String),
    #[error("{0}")]
    Invalid(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Store(e) => AppError::internal(e.to_string()),
            ServiceError::Plan(e) => AppError::validation(e.to_string()),
            ServiceError::Invalid(message) => AppError::validation(message),
            e @ (ServiceError::UserNotFound(_)
            | ServiceError::WordNotFound(_)
            | ServiceError::ScheduleNotFound(_)) => AppError::not_found(e.to_string()),
        }
    }
}

pub(crate) async fn require_user(proxy: &DatabaseProxy, user_id: &str) -> Result<UserProfile, ServiceError> {
    get_user(proxy, user_id)
        .await?
        .ok_or_else(|| ServiceError::UserNotFound(user_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    #[test]
    fn test_error_mapping() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let plan: AppError = ServiceError::Plan(PlanError::InvalidTargetDate {
            today: day,
            target_end_date: day,
        })
        .into();
        assert_eq!(plan.status(), StatusCode::BAD_REQUEST);
        assert_eq!(plan.code(), "VALIDATION_ERROR");

        let missing: AppError = ServiceError::WordNotFound("apple".into()).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let store: AppError = ServiceError::Store(StoreError::NotFound {
            entity: "user",
            key: "u".into(),
        })
        .into();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.code(), "INTERNAL_ERROR");
    }
}
