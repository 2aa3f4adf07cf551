use chrono::{DateTime, NaiveDate, Utc};
use lexis_algo::{calc_schedule, DailyScheduleEntry, DecayModel, PlanInputs, PROJECTED_REVIEW_COUNT};

use super::clock::{local_day_bounds, local_today};
use super::{require_user, ServiceError};
use crate::db::operations::schedule::{self as store, StoredSchedule};
use crate::db::operations::{tracks, words};
use crate::db::DatabaseProxy;

/// Snapshot everything the planner needs for one user at `now`
pub async fn load_study_inputs(
    proxy: &DatabaseProxy,
    user_id: &str,
    target_end_date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<PlanInputs, ServiceError> {
    let user = require_user(proxy, user_id).await?;
    let offset = user.timezone_offset_minutes;
    let today = local_today(now, offset);
    let (day_start, day_end) = local_day_bounds(today, offset);

    let all_test_words = match user.test_track.as_deref() {
        Some(track) => tracks::list_track_words(proxy, track).await?,
        None => Default::default(),
    };

    Ok(PlanInputs {
        today,
        target_end_date,
        all_test_words,
        saved_words_with_reviews: words::list_saved_words_with_reviews(proxy, user_id).await?,
        words_saved_today: words::words_saved_between(proxy, user_id, day_start, day_end).await?,
        words_reviewed_today: words::words_reviewed_between(proxy, user_id, day_start, day_end).await?,
        all_saved_words: Some(words::list_all_saved_words(proxy, user_id).await?),
    })
}

/// Regenerate and persist the user's study plan
pub async fn initiate_schedule(
    proxy: &DatabaseProxy,
    model: &DecayModel,
    user_id: &str,
    target_end_date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<StoredSchedule, ServiceError> {
    let inputs = load_study_inputs(proxy, user_id, target_end_date, now).await?;

    let plan = calc_schedule(&inputs, |past, created_at| {
        model.project_reviews(past, created_at, PROJECTED_REVIEW_COUNT)
    })?;

    let schedule_id = store::replace_schedule(proxy, user_id, target_end_date, &plan, now).await?;

    tracing::info!(
        user_id,
        schedule_id = %schedule_id,
        today = %inputs.today,
        target_end_date = %target_end_date,
        days = plan.metadata.days_remaining,
        new_words = plan.metadata.total_new_words,
        daily_new_words = plan.metadata.daily_new_words,
        test_practice = plan.metadata.test_practice_words_count,
        non_test_practice = plan.metadata.non_test_practice_words_count,
        "study plan regenerated"
    );

    Ok(StoredSchedule {
        id: schedule_id,
        user_id: user_id.to_string(),
        target_end_date,
        created_at: now,
        plan,
    })
}

pub async fn current_schedule(proxy: &DatabaseProxy, user_id: &str) -> Result<StoredSchedule, ServiceError> {
    require_user(proxy, user_id).await?;
    store::get_schedule(proxy, user_id)
        .await?
        .ok_or_else(|| ServiceError::ScheduleNotFound(user_id.to_string()))
}

/// Today's entry of the stored plan, resolved in the user's offset. Days
/// outside the plan come back empty.
pub async fn today_entry(
    proxy: &DatabaseProxy,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<DailyScheduleEntry, ServiceError> {
    let user = require_user(proxy, user_id).await?;
    let today = local_today(now, user.timezone_offset_minutes);

    if store::get_schedule(proxy, user_id).await?.is_none() {
        return Err(ServiceError::ScheduleNotFound(user_id.to_string()));
    }

    Ok(store::get_daily_entry(proxy, user_id, today)
        .await?
        .unwrap_or_else(|| DailyScheduleEntry::empty(today)))
}
