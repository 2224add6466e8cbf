//! Charge schedules.

use serde::{Deserialize, Serialize};

/// Whether a schedule slot is currently enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStatus {
    /// True when the slot is active.
    #[serde(default)]
    pub is_active: bool,
}

/// One weekly charge-schedule slot. Days run 1 (Monday) to 7 (Sunday); times
/// are `HH:MM:SS` strings in the pod's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Server-assigned identifier. New schedules are sent without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScheduleStatus>,
}

impl Schedule {
    /// Is this schedule slot active?
    pub fn is_active(&self) -> bool {
        self.status.is_some_and(|s| s.is_active)
    }

    /// Build the seven-day schedule body used when toggling charging: one slot
    /// per day from 00:00:00 to 00:00:01, all with the given enabled state.
    pub fn weekly(enabled: bool) -> Vec<Schedule> {
        (1..=7)
            .map(|day| Schedule {
                uid: None,
                start_day: Some(day),
                start_time: Some("00:00:00".to_string()),
                end_day: Some(day),
                end_time: Some("00:00:01".to_string()),
                status: Some(ScheduleStatus { is_active: enabled }),
            })
            .collect()
    }
}
