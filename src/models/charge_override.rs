//! Charge overrides: timed or open-ended "charge now" requests.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::lazy_datetime;

/// A charge override as reported by the API. An override with no end time is
/// an open-ended manual-mode switch.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeOverride {
    pub ppid: Option<String>,
    #[serde(default, deserialize_with = "lazy_datetime::deserialize")]
    pub requested_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lazy_datetime::deserialize")]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lazy_datetime::deserialize")]
    pub ends_at: Option<DateTime<Utc>>,
}

impl ChargeOverride {
    /// Is a timed override currently running?
    pub fn active(&self) -> bool {
        self.ends_at.is_some_and(|ends_at| ends_at > Utc::now())
    }

    /// Time left on the override, or `None` when it is not active.
    pub fn remaining_time(&self) -> Option<Duration> {
        if !self.active() {
            return None;
        }
        self.ends_at.map(|ends_at| ends_at - Utc::now())
    }
}
