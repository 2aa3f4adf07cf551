use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use lexis_algo::DecayModel;

use crate::db::DatabaseProxy;

#[derive(Clone)]
pub struct AppState {
    db: DatabaseProxy,
    model: Arc<DecayModel>,
    started_at: Instant,
    fixed_now: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(db: DatabaseProxy, model: DecayModel) -> Self {
        Self {
            db,
            model: Arc::new(model),
            started_at: Instant::now(),
            fixed_now: None,
        }
    }

    /// Pin the wall clock, for deterministic tests
    pub fn with_fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn db(&self) -> &DatabaseProxy {
        &self.db
    }

    pub fn model(&self) -> &DecayModel {
        &self.model
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
