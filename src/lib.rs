//! # podpoint-client
//!
//! Rust client library for the Pod Point EV charger cloud API.
//!
//! Authenticates a user against the vendor's identity provider, maintains the
//! backend application session, and exposes typed operations over pods,
//! charges, schedules, firmware, users, and charge overrides.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use podpoint_client::{PodPointClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = PodPointClient::new("user@example.com", "secret");
//!
//!     // Check the account credentials work
//!     if client.credentials_verified().await? {
//!         let pods = client.all_pods().await?;
//!         println!("found {} pod(s)", pods.len());
//!
//!         // Allow charging at any time on the first pod
//!         if let Some(pod) = pods.first() {
//!             client.set_schedule(false, pod).await?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Tokens and sessions are refreshed on demand: every operation goes through
//! [`auth::AuthManager::ensure_valid`], which reuses the held credential while
//! it is fresh and otherwise performs the refresh-or-login plus session
//! exchanges exactly once, even under concurrent callers.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;

// Re-exports for ergonomic usage
pub use auth::{AuthManager, AuthSnapshot, Credential, IssuedToken, Session};
pub use client::{PodPointClient, PodPointClientBuilder, DEFAULT_POD_INCLUDES};
pub use error::{Error, ErrorKind, Result};
pub use models::{
    Charge, ChargeMode, ChargeOverride, ConnectivityStatus, Firmware, Pod, Schedule,
    ScheduleStatus, User,
};
