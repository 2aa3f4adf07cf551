//! Retention Decay Model
//!
//! Core theory:
//! - Every review (or the moment a word is saved) resets retention to 100%
//!   for the rest of that calendar day
//! - From the reset point, retention decays exponentially one day at a time
//! - The daily decay rate is a step function of the days elapsed since the
//!   last *failed* review (or since the word was saved). Successful reviews
//!   move the reset point but keep the rate clock running, so words that
//!   survive longer decay more slowly.
//!
//! Mathematical formulas:
//! - Retention after n days: R = Π exp(-k(t_i - c)) for i = 1..n
//!   - t_i: i-th simulated day after the reset point
//!   - c: day of the last failure (or creation)
//!   - k(d): banded decay rate, halving every time d doubles past day 112

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::sanitize::{clamp_unit, sorted_history, validate_config, ConfigError};
use crate::types::{
    ReviewEvent, DECAY_BAND_DAYS, DECAY_BAND_RATES, FORGET_THRESHOLD, MAX_RATE_HALVINGS,
    MAX_SCHEDULE_DAYS,
};

// ==================== Configuration ====================

/// Tunable constants of the retention model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayConfig {
    /// Retention at or below this value is "forgotten"
    pub forget_threshold: f64,
    /// Forward simulation cap in days
    pub max_days: u32,
    /// Elapsed-day boundaries between bands, strictly increasing
    pub band_days: [i64; 5],
    /// One rate per band, non-increasing
    pub band_rates: [f64; 6],
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            forget_threshold: FORGET_THRESHOLD,
            max_days: MAX_SCHEDULE_DAYS,
            band_days: DECAY_BAND_DAYS,
            band_rates: DECAY_BAND_RATES,
        }
    }
}

// ==================== Reset Point ====================

/// Where a simulation starts: the last review at or before the cutoff (or
/// creation), plus the day the rate clock was last reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub time: DateTime<Utc>,
    pub clock: NaiveDate,
}

impl Anchor {
    /// `history` must already be sorted. Reviews after `cutoff` are ignored.
    pub(crate) fn resolve(
        history: &[ReviewEvent],
        cutoff: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut time = created_at;
        let mut clock = created_at.date_naive();

        for event in history {
            if cutoff.is_some_and(|c| event.timestamp > c) {
                break;
            }
            time = event.timestamp;
            if !event.success {
                clock = event.timestamp.date_naive();
            }
        }

        Self { time, clock }
    }

    pub(crate) fn date(&self) -> NaiveDate {
        self.time.date_naive()
    }
}

// ==================== Decay Model ====================

/// Banded exponential-decay retention model
#[derive(Clone, Debug, Default)]
pub struct DecayModel {
    config: DecayConfig,
}

impl DecayModel {
    pub fn new(config: DecayConfig) -> Result<Self, ConfigError> {
        validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecayConfig {
        &self.config
    }

    pub fn forget_threshold(&self) -> f64 {
        self.config.forget_threshold
    }

    /// Daily decay constant after `days_elapsed` days without a failure
    pub fn decay_rate(&self, days_elapsed: i64) -> f64 {
        let bands = &self.config.band_days;
        let rates = &self.config.band_rates;

        for (index, &boundary) in bands.iter().enumerate() {
            if days_elapsed < boundary {
                return rates[index];
            }
        }

        let mut rate = rates[rates.len() - 1];
        let mut period = bands[bands.len() - 1].saturating_mul(2);
        let mut halvings = 0;
        while days_elapsed >= period && halvings < MAX_RATE_HALVINGS {
            rate /= 2.0;
            period = period.saturating_mul(2);
            halvings += 1;
        }
        rate
    }

    /// Retention after one more simulated day
    pub(crate) fn step(&self, retention: f64, day: NaiveDate, clock: NaiveDate) -> f64 {
        let elapsed = (day - clock).num_days();
        retention * (-self.decay_rate(elapsed)).exp()
    }

    /// Retention `days` days after the anchor's reset point
    pub(crate) fn simulate(&self, anchor: &Anchor, days: i64) -> f64 {
        let start = anchor.date();
        let mut retention = 1.0;
        for offset in 1..=days {
            let day = start + chrono::Duration::days(offset);
            retention = self.step(retention, day, anchor.clock);
        }
        retention
    }

    /// Retention in [0, 1] at `target_date`
    pub fn retention(
        &self,
        review_history: &[ReviewEvent],
        target_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> f64 {
        if target_date < created_at {
            return 0.0;
        }

        let target_day = target_date.date_naive();
        if target_day == created_at.date_naive() {
            return 1.0;
        }

        let history = sorted_history(review_history);
        let anchor = Anchor::resolve(&history, Some(target_date), created_at);
        let days = (target_day - anchor.date()).num_days();
        if days <= 0 {
            return 1.0;
        }

        clamp_unit(self.simulate(&anchor, days))
    }
}

/// Daily decay constant using the default bands
pub fn get_decay_rate(days_elapsed: i64) -> f64 {
    DecayModel::default().decay_rate(days_elapsed)
}

/// Retention at `target_date` using the default model
pub fn calculate_retention(
    review_history: &[ReviewEvent],
    target_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> f64 {
    DecayModel::default().retention(review_history, target_date, created_at)
}
