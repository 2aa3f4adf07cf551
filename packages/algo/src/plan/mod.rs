//! Study Plan Builder
//!
//! Pure, deterministic day-by-day plan from today until the exam date.
//!
//! Steps:
//! 1. Split saved words into exam (test) and non-exam practice words
//! 2. Build the new-word pool: exam words never saved, plus exam words saved
//!    earlier today
//! 3. Spread the pool evenly (ceiling division) across the remaining days
//! 4. Project every saved word's future reviews and every newly introduced
//!    word's first reviews, and file them under the day they fall due
//!
//! Today may contain words the learner already touched today; days after
//! today never do, so regenerating the plan later the same day is stable.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{DailyScheduleEntry, PlanMetadata, PracticeEntry, StudyPlan, WordRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("target end date {target_end_date} must be after today ({today})")]
    InvalidTargetDate {
        today: NaiveDate,
        target_end_date: NaiveDate,
    },
}

/// Fully materialized inputs for one plan generation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInputs {
    pub today: NaiveDate,
    pub target_end_date: NaiveDate,
    pub all_test_words: BTreeSet<String>,
    /// Saved words with history; known words already removed
    pub saved_words_with_reviews: BTreeMap<String, WordRecord>,
    pub words_saved_today: BTreeSet<String>,
    pub words_reviewed_today: BTreeSet<String>,
    /// Every saved word including known ones; defaults to the keys of
    /// `saved_words_with_reviews`
    #[serde(default)]
    pub all_saved_words: Option<BTreeSet<String>>,
}

// ==================== Practice Book ====================

struct PracticeTrack {
    word_id: Option<String>,
    /// day -> review number; the earliest review wins when several collapse
    /// onto the same day
    due: BTreeMap<NaiveDate, u32>,
}

#[derive(Default)]
struct PracticeBook {
    words: BTreeMap<String, PracticeTrack>,
}

impl PracticeBook {
    fn add(
        &mut self,
        word: &str,
        word_id: Option<&str>,
        past_reviews: usize,
        projected: &[(DateTime<Utc>, bool)],
        window: (NaiveDate, NaiveDate),
    ) {
        let (today, end) = window;
        let track = self
            .words
            .entry(word.to_string())
            .or_insert_with(|| PracticeTrack {
                word_id: word_id.map(str::to_string),
                due: BTreeMap::new(),
            });

        for (index, (at, _)) in projected.iter().enumerate() {
            let day = at.date_naive();
            if day > end {
                continue;
            }
            let review_number = u32::try_from(past_reviews + index + 1).unwrap_or(u32::MAX);
            track.due.entry(day.max(today)).or_insert(review_number);
        }
    }

    fn due_on(&self, day: NaiveDate) -> Vec<PracticeEntry> {
        self.words
            .iter()
            .filter_map(|(word, track)| {
                track.due.get(&day).map(|&review_number| PracticeEntry {
                    word: word.clone(),
                    word_id: track.word_id.clone(),
                    review_number,
                })
            })
            .collect()
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

// ==================== Plan Builder ====================

/// Build the study plan
///
/// `get_schedule_fn` receives a `(timestamp, success)` history and the
/// creation time, and returns projected future reviews. Production code
/// passes [`crate::projection::get_schedule`].
pub fn calc_schedule<F>(inputs: &PlanInputs, get_schedule_fn: F) -> Result<StudyPlan, PlanError>
where
    F: Fn(&[(DateTime<Utc>, bool)], DateTime<Utc>) -> Vec<(DateTime<Utc>, bool)>,
{
    let today = inputs.today;
    let end = inputs.target_end_date;
    let days_remaining = (end - today).num_days();
    if days_remaining <= 0 {
        return Err(PlanError::InvalidTargetDate {
            today,
            target_end_date: end,
        });
    }

    let test_words = &inputs.all_test_words;
    let saved = &inputs.saved_words_with_reviews;

    let derived_saved: BTreeSet<String>;
    let all_saved = match inputs.all_saved_words.as_ref() {
        Some(words) => words,
        None => {
            derived_saved = saved.keys().cloned().collect();
            &derived_saved
        }
    };

    let (test_practice_words, non_test_practice_words): (Vec<&String>, Vec<&String>) =
        saved.keys().partition(|word| test_words.contains(*word));

    let mut pool: BTreeSet<&str> = test_words
        .difference(all_saved)
        .map(String::as_str)
        .collect();
    pool.extend(
        inputs
            .words_saved_today
            .intersection(test_words)
            .map(String::as_str),
    );
    let total_new_words = pool.len();

    let words_done_today: BTreeSet<&str> = inputs
        .words_saved_today
        .union(&inputs.words_reviewed_today)
        .filter(|word| test_words.contains(*word))
        .map(String::as_str)
        .collect();

    let day_count = usize::try_from(days_remaining).unwrap_or(usize::MAX);
    let daily_new_words = total_new_words.div_ceil(day_count).max(1);

    let window = (today, end);
    let mut test_book = PracticeBook::default();
    let mut non_test_book = PracticeBook::default();

    for (word, record) in saved {
        let history = record.review_pairs();
        let projected = get_schedule_fn(&history, record.created_at);
        let book = if test_words.contains(word) {
            &mut test_book
        } else {
            &mut non_test_book
        };
        book.add(word, Some(record.id.as_str()), history.len(), &projected, window);
    }

    let mut remaining: VecDeque<&str> = pool.into_iter().collect();
    let mut allocated_today: BTreeSet<&str> = BTreeSet::new();
    let mut daily_schedules = BTreeMap::new();

    for day_offset in 0..days_remaining {
        let current_day = today + Duration::days(day_offset);

        let mut new_words: Vec<String> = Vec::with_capacity(daily_new_words);
        while new_words.len() < daily_new_words {
            let Some(word) = remaining.pop_front() else {
                break;
            };
            if day_offset > 0 && (allocated_today.contains(word) || words_done_today.contains(word)) {
                continue;
            }
            if day_offset == 0 {
                allocated_today.insert(word);
            }
            new_words.push(word.to_string());
        }

        let introduced_at = start_of_day(current_day);
        for word in &new_words {
            let projected = get_schedule_fn(&[], introduced_at);
            test_book.add(word, None, 0, &projected, window);
        }

        daily_schedules.insert(
            current_day,
            DailyScheduleEntry {
                date: current_day,
                new_words,
                test_practice: test_book.due_on(current_day),
                non_test_practice: non_test_book.due_on(current_day),
            },
        );
    }

    Ok(StudyPlan {
        daily_schedules,
        metadata: PlanMetadata {
            days_remaining,
            total_new_words,
            daily_new_words,
            test_practice_words_count: test_practice_words.len(),
            non_test_practice_words_count: non_test_practice_words.len(),
        },
    })
}
