//! # lexis-algo - vocabulary study planning core
//!
//! Pure Rust implementation of the scheduling algorithms:
//!
//! - **Decay Model** - banded exponential forgetting curve
//! - **Review Scheduler** - when retention crosses the forget threshold
//! - **Projected Schedule** - optimistic future review checkpoints
//! - **Study Plan** - day-by-day allocation of new words and practice
//!
//! ## Design
//!
//! - **No I/O** - every function is deterministic over its explicit inputs
//! - **Injected projection** - the plan builder takes the review projector
//!   as a callback so it can be tested in isolation
//! - **Reproducible output** - ordered collections everywhere, so identical
//!   inputs serialize identically
//!
//! ## Modules
//!
//! - [`decay`] - decay rates and retention (`get_decay_rate`, `calculate_retention`)
//! - [`scheduler`] - next review date (`get_next_review_date_new`)
//! - [`projection`] - future review checkpoints (`get_schedule`)
//! - [`plan`] - study plan builder (`calc_schedule`)
//! - [`sanitize`] - history ordering and config validation
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use chrono::NaiveDate;
//! use lexis_algo::{calc_schedule, get_schedule, PlanInputs};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let inputs = PlanInputs {
//!     today,
//!     target_end_date: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
//!     all_test_words: ["abate", "bolster", "cogent"].iter().map(|w| w.to_string()).collect::<BTreeSet<_>>(),
//!     ..PlanInputs::default()
//! };
//!
//! let plan = calc_schedule(&inputs, get_schedule).unwrap();
//! assert_eq!(plan.metadata.daily_new_words, 1);
//! assert_eq!(plan.day(today).unwrap().new_words, vec!["abate"]);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod decay;
pub mod plan;
pub mod projection;
pub mod sanitize;
pub mod scheduler;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use decay::{calculate_retention, get_decay_rate, DecayConfig, DecayModel};

pub use scheduler::get_next_review_date_new;

pub use projection::get_schedule;

pub use plan::{calc_schedule, PlanError, PlanInputs};

pub use sanitize::ConfigError;
