//! Charge history records.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::lazy_datetime;

/// One charging session from the history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Charge {
    pub id: Option<i64>,
    #[serde(default)]
    pub kwh_used: f64,
    /// Overall duration in minutes.
    #[serde(default)]
    pub duration: i64,
    #[serde(default, deserialize_with = "lazy_datetime::deserialize")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lazy_datetime::deserialize")]
    pub ends_at: Option<DateTime<Utc>>,
    pub energy_cost: Option<i64>,
    pub charging_duration: Option<ChargingDuration>,
    pub billing_event: Option<BillingEvent>,
    pub location: Option<ChargeLocation>,
    pub pod: Option<ChargePod>,
    pub organisation: Option<Organisation>,
}

impl Charge {
    /// Was this a home charge? `None` when no location was reported.
    pub fn home(&self) -> Option<bool> {
        self.location.as_ref().and_then(|l| l.home)
    }
}

/// Time actually spent charging, with the API's display formatting.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargingDuration {
    pub raw: Option<i64>,
    #[serde(default)]
    pub formatted: Vec<ChargeDurationFormat>,
}

impl std::fmt::Display for ChargingDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.formatted.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// One `value`/`unit` pair of a formatted duration, e.g. `11 minutes`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeDurationFormat {
    pub value: Option<String>,
    pub unit: Option<String>,
}

impl std::fmt::Display for ChargeDurationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = [self.value.as_deref(), self.unit.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Billing details attached to a charge.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingEvent {
    pub id: Option<i64>,
    pub amount: Option<serde_json::Value>,
    pub currency: Option<String>,
    #[serde(default)]
    pub exchange_rate: f64,
    pub presentment_amount: Option<serde_json::Value>,
    pub presentment_currency: Option<String>,
}

/// Where the charge took place.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeLocation {
    pub id: Option<i64>,
    pub home: Option<bool>,
    pub timezone: Option<String>,
    pub address: Option<ChargeAddress>,
}

/// Address of a charge location.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeAddress {
    pub id: Option<i64>,
    pub business_name: Option<String>,
}

/// The pod a charge ran on.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChargePod {
    pub id: Option<i64>,
}

/// The organisation a public charge was billed through.
#[derive(Debug, Clone, Deserialize)]
pub struct Organisation {
    pub id: Option<i64>,
    pub name: Option<String>,
}
