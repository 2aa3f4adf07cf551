//! Common Types and Constants
//!
//! Shared data structures used across the retention, scheduling and
//! study-plan modules.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Retention at or below this value means the word is due for review
pub const FORGET_THRESHOLD: f64 = 0.25;

/// Safety cap for the day-by-day forward simulation (two years)
pub const MAX_SCHEDULE_DAYS: u32 = 730;

/// Number of optimistic future checkpoints produced per word
pub const PROJECTED_REVIEW_COUNT: usize = 7;

/// Elapsed-day boundaries where the decay rate steps down
pub const DECAY_BAND_DAYS: [i64; 5] = [7, 14, 28, 56, 112];

/// Daily decay rate for each band: week one, then after each boundary.
/// The last entry applies from day 112 and halves every time the elapsed
/// period doubles.
pub const DECAY_BAND_RATES: [f64; 6] = [0.35, 0.2, 0.1, 0.05, 0.025, 0.0125];

/// Upper bound on rate halvings past the last band (keeps the loop finite
/// for absurd inputs)
pub const MAX_RATE_HALVINGS: u32 = 48;

// ==================== Review History ====================

/// A single review outcome
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    /// When the review finished
    pub timestamp: DateTime<Utc>,
    /// Whether the learner recalled the word
    pub success: bool,
}

impl ReviewEvent {
    pub fn new(timestamp: DateTime<Utc>, success: bool) -> Self {
        Self { timestamp, success }
    }
}

impl From<(DateTime<Utc>, bool)> for ReviewEvent {
    fn from((timestamp, success): (DateTime<Utc>, bool)) -> Self {
        Self { timestamp, success }
    }
}

impl From<&ReviewEvent> for (DateTime<Utc>, bool) {
    fn from(event: &ReviewEvent) -> Self {
        (event.timestamp, event.success)
    }
}

/// A saved word together with its review history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    /// Storage identifier
    pub id: String,
    /// When the learner saved the word
    pub created_at: DateTime<Utc>,
    /// Review outcomes, oldest first
    #[serde(default)]
    pub reviews: Vec<ReviewEvent>,
    /// Known words are filtered out before planning
    #[serde(default)]
    pub is_known: bool,
}

impl WordRecord {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            reviews: Vec::new(),
            is_known: false,
        }
    }

    pub fn with_reviews(mut self, reviews: Vec<ReviewEvent>) -> Self {
        self.reviews = reviews;
        self
    }

    /// Review history in the `(timestamp, success)` shape used by projection
    pub fn review_pairs(&self) -> Vec<(DateTime<Utc>, bool)> {
        self.reviews.iter().map(Into::into).collect()
    }
}

// ==================== Study Plan ====================

/// One practice review scheduled on a given day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeEntry {
    pub word: String,
    /// `None` for words introduced by this plan and not saved yet
    pub word_id: Option<String>,
    /// 1-based ordinal of this review in the word's lifetime
    pub review_number: u32,
}

/// Everything scheduled for one calendar day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyScheduleEntry {
    pub date: NaiveDate,
    pub new_words: Vec<String>,
    pub test_practice: Vec<PracticeEntry>,
    pub non_test_practice: Vec<PracticeEntry>,
}

impl DailyScheduleEntry {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            new_words: Vec::new(),
            test_practice: Vec::new(),
            non_test_practice: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.new_words.is_empty() && self.test_practice.is_empty() && self.non_test_practice.is_empty()
    }
}

/// Plan-level counters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetadata {
    pub days_remaining: i64,
    pub total_new_words: usize,
    pub daily_new_words: usize,
    pub test_practice_words_count: usize,
    pub non_test_practice_words_count: usize,
}

/// Day-indexed study plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub daily_schedules: BTreeMap<NaiveDate, DailyScheduleEntry>,
    pub metadata: PlanMetadata,
}

impl StudyPlan {
    /// Schedule for a given day, if the day lies inside the plan
    pub fn day(&self, date: NaiveDate) -> Option<&DailyScheduleEntry> {
        self.daily_schedules.get(&date)
    }

    /// Every new word in calendar order
    pub fn all_new_words(&self) -> impl Iterator<Item = &String> {
        self.daily_schedules.values().flat_map(|d| d.new_words.iter())
    }
}

// ==================== Retention Status ====================

/// Snapshot of a single word's memory state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionStatus {
    /// Retention in [0, 1]
    pub retention: f64,
    /// First date at which retention crosses the forget threshold
    pub next_review_at: DateTime<Utc>,
    /// Whether the word should be reviewed now
    pub is_due: bool,
    /// Whole days until `next_review_at` (negative when overdue)
    pub days_until_due: i64,
}
