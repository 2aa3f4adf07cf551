//! Projected Review Schedule
//!
//! Optimistic forecast of a word's future reviews: starting from its real
//! history, repeatedly ask the scheduler for the next review date and
//! pretend the learner succeeds there.

use chrono::{DateTime, Utc};

use crate::decay::DecayModel;
use crate::sanitize::history_from_pairs;
use crate::types::{ReviewEvent, PROJECTED_REVIEW_COUNT};

impl DecayModel {
    /// `count` future checkpoints, each assumed successful
    pub fn project_reviews(
        &self,
        past_schedule: &[(DateTime<Utc>, bool)],
        created_at: DateTime<Utc>,
        count: usize,
    ) -> Vec<(DateTime<Utc>, bool)> {
        let mut history: Vec<ReviewEvent> = history_from_pairs(past_schedule);
        let mut projected = Vec::with_capacity(count);

        for _ in 0..count {
            let next = self.next_review_date(&history, created_at);
            history.push(ReviewEvent::new(next, true));
            projected.push((next, true));
        }

        projected
    }
}

/// Seven optimistic future reviews using the default model
pub fn get_schedule(
    past_schedule: &[(DateTime<Utc>, bool)],
    created_at: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, bool)> {
    DecayModel::default().project_reviews(past_schedule, created_at, PROJECTED_REVIEW_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_projects_seven_successes() {
        let schedule = get_schedule(&[], created());
        assert_eq!(schedule.len(), PROJECTED_REVIEW_COUNT);
        assert!(schedule.iter().all(|(_, success)| *success));
    }

    #[test]
    fn test_new_word_projection_days() {
        let days: Vec<i64> = get_schedule(&[], created())
            .iter()
            .map(|(at, _)| (*at - created()).num_days())
            .collect();
        assert_eq!(days, vec![4, 10, 21, 43, 87, 174, 347]);
    }

    #[test]
    fn test_projection_is_strictly_increasing() {
        let past = vec![
            (created() + Duration::days(3), false),
            (created() + Duration::days(8), true),
        ];
        let schedule = get_schedule(&past, created());
        for pair in schedule.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
        assert!(schedule[0].0 > past[1].0);
    }

    #[test]
    fn test_projection_continues_from_history() {
        let first = get_schedule(&[], created());
        let resumed = get_schedule(&first[..2], created());
        assert_eq!(&resumed[..5], &first[2..]);
    }

    #[test]
    fn test_custom_count() {
        let model = DecayModel::default();
        assert!(model.project_reviews(&[], created(), 0).is_empty());
        assert_eq!(model.project_reviews(&[], created(), 3).len(), 3);
    }
}
