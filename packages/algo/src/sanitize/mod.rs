//! Data Sanitization
//!
//! Input normalization and numerical stability utilities.
//!
//! Functions:
//! - Review history ordering
//! - Probability clamping
//! - Decay configuration validation

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::decay::DecayConfig;
use crate::types::ReviewEvent;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("forget threshold must be in (0, 1), got {0}")]
    Threshold(f64),
    #[error("simulation cap must be at least one day")]
    ZeroCap,
    #[error("decay band boundaries must be positive and strictly increasing")]
    BandBoundaries,
    #[error("decay rate at band {index} must be positive and finite, got {rate}")]
    InvalidRate { index: usize, rate: f64 },
    #[error("decay rates must be non-increasing (band {index} rises above the previous band)")]
    IncreasingRate { index: usize },
}

/// Review history sorted by timestamp (stable for equal timestamps)
pub fn sorted_history(history: &[ReviewEvent]) -> Vec<ReviewEvent> {
    let mut sorted = history.to_vec();
    sorted.sort_by_key(|e| e.timestamp);
    sorted
}

/// Convert `(timestamp, success)` pairs into sorted review events
pub fn history_from_pairs(pairs: &[(DateTime<Utc>, bool)]) -> Vec<ReviewEvent> {
    let mut events: Vec<ReviewEvent> = pairs.iter().copied().map(ReviewEvent::from).collect();
    events.sort_by_key(|e| e.timestamp);
    events
}

/// Clamp to [0, 1], treating NaN as 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Reject configurations that would break the model's monotonicity
pub fn validate_config(config: &DecayConfig) -> Result<(), ConfigError> {
    if !(config.forget_threshold > 0.0 && config.forget_threshold < 1.0) {
        return Err(ConfigError::Threshold(config.forget_threshold));
    }
    if config.max_days == 0 {
        return Err(ConfigError::ZeroCap);
    }

    let mut prev_boundary = 0;
    for &boundary in &config.band_days {
        if boundary <= prev_boundary {
            return Err(ConfigError::BandBoundaries);
        }
        prev_boundary = boundary;
    }

    for (index, &rate) in config.band_rates.iter().enumerate() {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ConfigError::InvalidRate { index, rate });
        }
        if index > 0 && rate > config.band_rates[index - 1] {
            return Err(ConfigError::IncreasingRate { index });
        }
    }

    Ok(())
}
