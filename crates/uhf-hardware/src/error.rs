//! Faults raised by reader modules and notification sources.
//!
//! A driver call can fail in two distinct ways: the hardware answers with a
//! non-OK status code ([`HardwareError::Status`]), or the call itself breaks
//! (disconnection, I/O, timeouts). The controller reports the first kind
//! verbatim and wraps the second kind as a driver fault.

use crate::types::ReaderStatus;

/// Result of a driver call.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Everything a driver call can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HardwareError {
    /// Hardware executed the command and reported a non-OK status.
    #[error("Reader status: {}", .0.name())]
    Status(ReaderStatus),

    /// The module's serial link is gone.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// The module did not answer in time.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The module firmware lacks this command.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Garbled or truncated reply from the module.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Power-up or handshake failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Registering or removing a notification receiver failed.
    #[error("Subscription failed: {message}")]
    SubscriptionFailed { message: String },

    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    pub fn subscription(message: impl Into<String>) -> Self {
        Self::SubscriptionFailed {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Turn a raw status into a result, `Ok` only for [`ReaderStatus::Ok`].
    pub fn check(status: ReaderStatus) -> Result<()> {
        if status.is_ok() {
            Ok(())
        } else {
            Err(Self::Status(status))
        }
    }
}

impl From<HardwareError> for uhf_core::Error {
    fn from(error: HardwareError) -> Self {
        match error {
            HardwareError::Status(status) => uhf_core::Error::Rejected {
                code: status.code(),
                name: status.name().to_string(),
            },
            other => uhf_core::Error::Driver(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("UHF module");
        assert!(matches!(error, HardwareError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: UHF module");
    }

    #[test]
    fn test_status_error_display() {
        let error = HardwareError::Status(ReaderStatus::CmdNoTag);
        assert_eq!(error.to_string(), "Reader status: MT_CMD_NO_TAG_ERR");
    }

    #[test]
    fn test_check_status() {
        assert!(HardwareError::check(ReaderStatus::Ok).is_ok());
        assert_eq!(
            HardwareError::check(ReaderStatus::CmdFailed),
            Err(HardwareError::Status(ReaderStatus::CmdFailed))
        );
    }

    #[test]
    fn test_status_maps_to_rejected() {
        let error: uhf_core::Error = HardwareError::Status(ReaderStatus::CmdFailed).into();
        assert_eq!(
            error,
            uhf_core::Error::Rejected {
                code: 3,
                name: "MT_CMD_FAILED_ERR".to_string()
            }
        );
        assert_eq!(error.code(), "MT_CMD_FAILED_ERR");
    }

    #[test]
    fn test_fault_maps_to_driver_error() {
        let error: uhf_core::Error = HardwareError::timeout(1000).into();
        assert_eq!(
            error,
            uhf_core::Error::Driver("Operation timeout after 1000ms".to_string())
        );
        assert_eq!(error.code(), "DRIVER_ERROR");
    }
}
