//! The account owner: user, account, vehicle, and home unit.

use serde::Deserialize;

use super::pod::Pod;

/// The authenticated Pod Point user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "hasHomeCharge")]
    pub has_home_charge: Option<i64>,
    pub locale: Option<String>,
    #[serde(default)]
    pub preferences: Vec<UserPreference>,
    pub account: Option<UserAccount>,
    pub vehicle: Option<Vehicle>,
    pub unit: Option<UserUnit>,
}

/// A single user preference entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPreference {
    #[serde(rename = "unitOfDistance")]
    pub unit_of_distance: Option<String>,
}

/// Billing account attached to the user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAccount {
    pub user_id: Option<i64>,
    pub uid: Option<String>,
    /// Balance in minor currency units.
    pub balance: Option<i64>,
    pub currency: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub billing_address: Option<Address>,
}

/// A postal address.
#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    pub business_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub town: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

/// An image in the API's three resolutions.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    #[serde(rename = "@1x")]
    pub half_size: Option<String>,
    #[serde(rename = "@2x")]
    pub seventy_five_percent: Option<String>,
    #[serde(rename = "@3x")]
    pub original: Option<String>,
}

/// The user's registered vehicle.
#[derive(Debug, Clone, Deserialize)]
pub struct Vehicle {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub capacity: Option<i64>,
    #[serde(rename = "batteryCapacity")]
    pub battery_capacity: Option<f64>,
    #[serde(rename = "startYear")]
    pub start_year: Option<i64>,
    #[serde(rename = "endYear")]
    pub end_year: Option<i64>,
    pub image: Option<Image>,
    pub make: Option<VehicleMake>,
}

/// Vehicle manufacturer.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleMake {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub logo: Option<Image>,
}

/// The user's home charger unit, with its pod when included.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUnit {
    pub id: Option<i64>,
    pub ppid: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub architecture: Option<String>,
    pub pod: Option<Pod>,
}
