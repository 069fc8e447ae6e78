//! Serializable result shapes for the operation surface.
//!
//! Field names are camelCase so a transport adapter can forward these
//! values as-is.

use serde::{Deserialize, Serialize};
use uhf_core::{Error, TagRead};
use uhf_protocol::codec;

/// Result of `init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    pub success: bool,
    pub message: String,
    /// Hardware version, `"unknown"` when no probe reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<String>,
}

impl InitResponse {
    pub(crate) fn ok(message: impl Into<String>, hardware: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            hardware: Some(hardware.into()),
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            hardware: None,
        }
    }
}

/// `{success, error}` result of a single command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    pub success: bool,
    /// Stable error code, see [`Error::code`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationStatus {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            message: None,
        }
    }

    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        Self {
            success: false,
            error: Some(error.code().to_string()),
            message: Some(error.to_string()),
        }
    }

    /// Map any operation result onto `{success, error}`.
    ///
    /// ```
    /// use uhf_core::Error;
    /// use uhf_reader::response::OperationStatus;
    ///
    /// let status = OperationStatus::from_result(&Err::<(), _>(Error::NotInitialized));
    /// assert!(!status.success);
    /// assert_eq!(status.error.as_deref(), Some("NOT_INITIALIZED"));
    /// ```
    #[must_use]
    pub fn from_result<T>(result: &Result<T, Error>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::from_error(e),
        }
    }
}

/// Result of `getPower`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerLevels {
    pub read_power: i32,
    pub write_power: i32,
}

/// Result of `getTemperature`; the error form is a soft failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemperatureReading {
    Reading { temperature: f32, epc: String },
    Unavailable { error: String },
}

impl TemperatureReading {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Reading { .. })
    }
}

/// Result of `readTagData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDataResponse {
    pub success: bool,
    /// Bank contents as uppercase hex.
    pub data: String,
}

impl TagDataResponse {
    #[must_use]
    pub fn new(data: &[u8]) -> Self {
        Self {
            success: true,
            data: codec::hex_encode(data),
        }
    }
}

/// One entry of `inventoryOnce`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub epc: String,
    pub rssi: i32,
    pub count: u32,
}

impl From<&TagRead> for InventoryEntry {
    fn from(tag: &TagRead) -> Self {
        Self {
            epc: tag.epc_hex(),
            rssi: tag.rssi,
            count: tag.read_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerButtonResponse {
    pub success: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingResponse {
    pub is_reading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeStatusResponse {
    pub initialized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_status_ok_json() {
        let status = OperationStatus::from_result(&Ok::<_, Error>(()));
        assert_eq!(serde_json::to_value(status).unwrap(), json!({"success": true}));
    }

    #[test]
    fn test_operation_status_rejected() {
        let error = Error::Rejected {
            code: 4,
            name: "MT_CMD_NO_TAG_ERR".to_string(),
        };
        let status = OperationStatus::from_result(&Err::<(), _>(error));
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "MT_CMD_NO_TAG_ERR");
    }

    #[test]
    fn test_init_response_json() {
        let response = InitResponse::ok("Reader initialized successfully", "UHF-1.2");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "message": "Reader initialized successfully",
                "hardware": "UHF-1.2"
            })
        );

        let failed = InitResponse::failed("Failed to connect: no module");
        assert!(serde_json::to_value(&failed).unwrap().get("hardware").is_none());
    }

    #[test]
    fn test_temperature_reading_shapes() {
        let reading = TemperatureReading::Reading {
            temperature: 21.5,
            epc: "E200".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&reading).unwrap(),
            json!({"temperature": 21.5, "epc": "E200"})
        );

        let missing = TemperatureReading::Unavailable {
            error: "No temperature tags found".to_string(),
        };
        assert!(!missing.is_available());
        assert_eq!(
            serde_json::to_value(&missing).unwrap(),
            json!({"error": "No temperature tags found"})
        );
    }

    #[test]
    fn test_power_levels_json() {
        let levels = PowerLevels {
            read_power: 26,
            write_power: 20,
        };
        assert_eq!(
            serde_json::to_value(levels).unwrap(),
            json!({"readPower": 26, "writePower": 20})
        );
    }
}
