//! Pods: physical charger units and their nested structures.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::lazy_datetime;
use super::schedule::Schedule;

/// A Pod Point charger unit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pod {
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Printed pod identifier, e.g. `PSL-123456`.
    pub ppid: Option<String>,
    pub payg: Option<bool>,
    pub home: Option<bool>,
    pub public: Option<bool>,
    #[serde(rename = "evZone")]
    pub ev_zone: Option<bool>,
    pub address_id: Option<i64>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lazy_datetime::deserialize")]
    pub commissioned_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lazy_datetime::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lazy_datetime::deserialize")]
    pub last_contact_at: Option<DateTime<Utc>>,
    pub contactless_enabled: Option<bool>,
    /// Unit id used by the schedule, firmware, and override endpoints.
    pub unit_id: Option<i64>,
    pub timezone: Option<String>,
    pub price: Option<i64>,
    pub model: Option<PodModel>,
    pub location: Option<Location>,
    #[serde(default)]
    pub statuses: Vec<PodStatus>,
    #[serde(default)]
    pub unit_connectors: Vec<UnitConnector>,
    #[serde(default)]
    pub charge_schedules: Vec<Schedule>,
}

/// Hardware model information for a pod.
#[derive(Debug, Clone, Deserialize)]
pub struct PodModel {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub vendor: Option<String>,
    #[serde(default)]
    pub supports_payg: bool,
    #[serde(default)]
    pub supports_ocpp: bool,
    #[serde(default)]
    pub supports_contactless: bool,
    pub image_url: Option<String>,
}

/// Geographic position of a pod.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
}

/// Per-door status of a pod, e.g. `Available` or `Charging`.
#[derive(Debug, Clone, Deserialize)]
pub struct PodStatus {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub key_name: Option<String>,
    pub label: Option<String>,
    pub door: Option<String>,
    pub door_id: Option<i64>,
}

/// `{"connector": {...}}` wrapper the API uses around connectors.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConnector {
    pub connector: Option<Connector>,
}

/// A physical connector on a pod.
#[derive(Debug, Clone, Deserialize)]
pub struct Connector {
    pub id: Option<i64>,
    pub door: Option<String>,
    pub door_id: Option<i64>,
    pub power: Option<i64>,
    pub current: Option<i64>,
    pub voltage: Option<i64>,
    pub charge_method: Option<String>,
    pub has_cable: Option<bool>,
    pub socket: Option<Socket>,
}

/// The socket fitted to a connector.
#[derive(Debug, Clone, Deserialize)]
pub struct Socket {
    #[serde(rename = "type")]
    pub socket_type: Option<String>,
    pub description: Option<String>,
    pub ocpp_name: Option<String>,
    pub ocpp_code: Option<i64>,
}
