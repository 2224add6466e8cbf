//! Charger connectivity status.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::lazy_datetime;

/// Connectivity report for a charger, covering each EVSE it exposes.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityStatus {
    pub ppid: Option<String>,
    #[serde(default, rename = "connectedComponents")]
    pub connected_components: Vec<String>,
    #[serde(default)]
    pub evses: Vec<Evse>,
}

impl ConnectivityStatus {
    /// Connectivity status of the first EVSE, e.g. `ONLINE`.
    pub fn connectivity_status(&self) -> Option<&str> {
        self.evses
            .first()?
            .connectivity_state
            .as_ref()?
            .connectivity_status
            .as_deref()
    }

    /// Last message time of the first EVSE.
    pub fn last_message_at(&self) -> Option<DateTime<Utc>> {
        self.evses.first()?.connectivity_state.as_ref()?.last_message_at
    }

    /// Charging state of the first connector on the first EVSE.
    pub fn charging_state(&self) -> Option<&str> {
        self.evses
            .first()?
            .connectors
            .first()?
            .charging_state
            .as_deref()
    }

    /// Whether the first EVSE is currently offering energy.
    pub fn offering_energy(&self) -> Option<bool> {
        self.evses
            .first()?
            .energy_offer_status
            .as_ref()?
            .is_offering_energy
    }
}

/// One EV supply equipment entry on a charger.
#[derive(Debug, Clone, Deserialize)]
pub struct Evse {
    pub id: Option<i64>,
    pub architecture: Option<String>,
    #[serde(rename = "connectivityState")]
    pub connectivity_state: Option<ConnectivityState>,
    #[serde(default)]
    pub connectors: Vec<EvseConnector>,
    #[serde(rename = "energyOfferStatus")]
    pub energy_offer_status: Option<EnergyOfferStatus>,
}

/// Link-level state of an EVSE.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityState {
    pub protocol: Option<String>,
    #[serde(rename = "connectivityStatus")]
    pub connectivity_status: Option<String>,
    #[serde(rename = "signalStrength")]
    pub signal_strength: Option<i64>,
    #[serde(
        default,
        rename = "lastMessageAt",
        deserialize_with = "lazy_datetime::deserialize"
    )]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "connectionStartedAt",
        deserialize_with = "lazy_datetime::deserialize"
    )]
    pub connection_started_at: Option<DateTime<Utc>>,
    #[serde(rename = "connectionQuality")]
    pub connection_quality: Option<i64>,
}

/// Per-connector charging state on an EVSE.
#[derive(Debug, Clone, Deserialize)]
pub struct EvseConnector {
    pub id: Option<i64>,
    pub door: Option<String>,
    #[serde(rename = "chargingState")]
    pub charging_state: Option<String>,
}

/// Whether the charger is offering energy, and why not when it isn't.
#[derive(Debug, Clone, Deserialize)]
pub struct EnergyOfferStatus {
    #[serde(rename = "isOfferingEnergy")]
    pub is_offering_energy: Option<bool>,
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lazy_datetime::deserialize")]
    pub until: Option<DateTime<Utc>>,
    #[serde(rename = "randomDelay")]
    pub random_delay: Option<i64>,
    #[serde(rename = "doNotCache")]
    pub do_not_cache: Option<bool>,
}
