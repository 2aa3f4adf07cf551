//! Review Scheduler
//!
//! Finds the first day at which simulated retention falls to the forget
//! threshold. The forward walk uses exactly the same per-day step as
//! [`DecayModel::retention`], so querying retention at the returned date
//! yields a value at (or just below) the threshold.

use chrono::{DateTime, Duration, Utc};

use crate::decay::{Anchor, DecayModel};
use crate::sanitize::sorted_history;
use crate::types::{RetentionStatus, ReviewEvent};

impl DecayModel {
    /// Next date the word should be reviewed, given its full history
    ///
    /// Walks forward day by day from the last review (or creation). If the
    /// threshold is never crossed within the cap, returns start + cap.
    pub fn next_review_date(
        &self,
        review_history: &[ReviewEvent],
        created_at: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let history = sorted_history(review_history);
        let anchor = Anchor::resolve(&history, None, created_at);
        self.next_review_from(&anchor)
    }

    fn next_review_from(&self, anchor: &Anchor) -> DateTime<Utc> {
        let threshold = self.forget_threshold();
        let cap = i64::from(self.config().max_days);
        let start = anchor.date();

        let mut retention = 1.0;
        for offset in 1..=cap {
            let day = start + Duration::days(offset);
            retention = self.step(retention, day, anchor.clock);
            if retention <= threshold {
                return anchor.time + Duration::days(offset);
            }
        }

        anchor.time + Duration::days(cap)
    }

    /// Retention now plus the next due date, considering only reviews that
    /// have already happened at `now`
    pub fn retention_status(
        &self,
        review_history: &[ReviewEvent],
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> RetentionStatus {
        let history = sorted_history(review_history);
        let anchor = Anchor::resolve(&history, Some(now), created_at);

        let retention = self.retention(&history, now, created_at);
        let next_review_at = self.next_review_from(&anchor);
        let days_until_due = (next_review_at.date_naive() - now.date_naive()).num_days();

        RetentionStatus {
            retention,
            next_review_at,
            is_due: retention <= self.forget_threshold() || next_review_at <= now,
            days_until_due,
        }
    }
}

/// Next review date using the default model
pub fn get_next_review_date_new(
    review_history: &[ReviewEvent],
    created_at: DateTime<Utc>,
) -> DateTime<Utc> {
    DecayModel::default().next_review_date(review_history, created_at)
}
