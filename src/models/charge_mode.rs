//! The current charging mode of a pod.

use serde::{Deserialize, Serialize};

/// How a pod decides when to offer energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeMode {
    /// Charge whenever a vehicle is plugged in; schedules are ignored.
    Manual,
    /// Follow the configured charge schedules.
    Smart,
    /// A timed override is running; schedules resume when it ends.
    Override,
}

impl std::fmt::Display for ChargeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargeMode::Manual => write!(f, "Manual"),
            ChargeMode::Smart => write!(f, "Smart"),
            ChargeMode::Override => write!(f, "Override"),
        }
    }
}
