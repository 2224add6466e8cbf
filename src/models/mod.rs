//! Typed representations of Pod Point API entities.

pub mod charge;
pub mod charge_mode;
pub mod charge_override;
pub mod connectivity;
pub mod firmware;
pub mod pod;
pub mod schedule;
pub mod user;

pub use charge::Charge;
pub use charge_mode::ChargeMode;
pub use charge_override::ChargeOverride;
pub use connectivity::ConnectivityStatus;
pub use firmware::Firmware;
pub use pod::Pod;
pub use schedule::{Schedule, ScheduleStatus};
pub use user::User;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

/// Parse an API timestamp, tolerating the `Z` suffix the API uses.
/// Unparseable values are logged and dropped rather than failing the whole
/// entity.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(error) => {
            warn!(raw, %error, "could not parse timestamp");
            None
        }
    }
}

/// Deserializer for optional, possibly malformed API timestamps.
pub(crate) mod lazy_datetime {
    use super::*;
    use serde::Deserializer;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }
}

/// `{"pods": [...]}` listing envelope. A missing key decodes to no pods.
#[derive(Debug, Deserialize)]
pub(crate) struct PodsEnvelope {
    #[serde(default)]
    pub pods: Vec<Pod>,
}

/// `{"charges": [...]}` listing envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ChargesEnvelope {
    #[serde(default)]
    pub charges: Vec<Charge>,
}

/// `{"data": [...]}` firmware envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct FirmwareEnvelope {
    #[serde(default)]
    pub data: Vec<Firmware>,
}

/// `{"users": {...}}` current-user envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    #[serde(default)]
    pub users: Option<User>,
}
