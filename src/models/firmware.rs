//! Firmware information for a charger unit.

use serde::Deserialize;

/// Firmware state reported for one unit.
#[derive(Debug, Clone, Deserialize)]
pub struct Firmware {
    pub serial_number: Option<String>,
    pub version_info: Option<FirmwareVersion>,
    pub update_status: Option<FirmwareStatus>,
}

/// Installed firmware version.
#[derive(Debug, Clone, Deserialize)]
pub struct FirmwareVersion {
    pub manifest_id: Option<String>,
}

/// Pending-update state.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FirmwareStatus {
    #[serde(default)]
    pub is_update_available: bool,
}

impl Firmware {
    /// The installed firmware version, when reported.
    pub fn firmware_version(&self) -> Option<&str> {
        self.version_info.as_ref()?.manifest_id.as_deref()
    }

    /// Whether an update is available; `None` when the API omitted the status.
    pub fn update_available(&self) -> Option<bool> {
        self.update_status.map(|s| s.is_update_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_firmware() {
        let firmware: Firmware = serde_json::from_str(
            r#"{
                "serial_number": "123456789",
                "version_info": {"manifest_id": "A30P-3.1.22-00001"},
                "update_status": {"is_update_available": false}
            }"#,
        )
        .unwrap();

        assert_eq!(firmware.serial_number.as_deref(), Some("123456789"));
        assert_eq!(firmware.firmware_version(), Some("A30P-3.1.22-00001"));
        assert_eq!(firmware.update_available(), Some(false));
    }

    #[test]
    fn test_empty_firmware() {
        let firmware: Firmware = serde_json::from_str("{}").unwrap();
        assert!(firmware.serial_number.is_none());
        assert!(firmware.firmware_version().is_none());
        assert!(firmware.update_available().is_none());
    }
}
