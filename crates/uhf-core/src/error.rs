use thiserror::Error;

/// Controller-facing error taxonomy.
///
/// Every reader and barcode operation returns this error instead of
/// panicking. The variants fall into three groups:
///
/// - precondition errors, raised before any hardware call
///   ([`Error::NotInitialized`], [`Error::InvalidParameter`],
///   [`Error::ZeroKillPassword`]);
/// - hardware-reported status codes ([`Error::Rejected`]);
/// - driver faults ([`Error::Driver`]).
///
/// None of them leave the session in a partially transitioned state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Precondition errors
    #[error("Reader not initialized")]
    NotInitialized,

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Cannot kill tag with zero password")]
    ZeroKillPassword,

    // Hardware errors
    #[error("Hardware rejected command: {name} ({code})")]
    Rejected { code: i32, name: String },

    #[error("Driver error: {0}")]
    Driver(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code reported in the `error` field of operation results.
    ///
    /// Hardware rejections report the driver's own status name so the code
    /// maps 1:1 onto the vendor status.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::ZeroKillPassword => "INVALID_PASSWORD",
            Self::Rejected { name, .. } => name,
            Self::Driver(_) => "DRIVER_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the error was raised before any hardware call was made.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized | Self::InvalidParameter { .. } | Self::ZeroKillPassword
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::NotInitialized.code(), "NOT_INITIALIZED");
        assert_eq!(
            Error::invalid_parameter("readPower", "out of range").code(),
            "INVALID_PARAMETER"
        );
        assert_eq!(Error::ZeroKillPassword.code(), "INVALID_PASSWORD");
        assert_eq!(Error::Driver("boom".into()).code(), "DRIVER_ERROR");
        assert_eq!(Error::Config("bad".into()).code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_rejected_reports_hardware_name() {
        let error = Error::Rejected {
            code: 3,
            name: "MT_CMD_FAILED_ERR".to_string(),
        };
        assert_eq!(error.code(), "MT_CMD_FAILED_ERR");
        assert_eq!(
            error.to_string(),
            "Hardware rejected command: MT_CMD_FAILED_ERR (3)"
        );
        assert!(!error.is_precondition());
    }

    #[test]
    fn test_precondition_classification() {
        assert!(Error::NotInitialized.is_precondition());
        assert!(Error::ZeroKillPassword.is_precondition());
        assert!(Error::invalid_parameter("timeout", "not allowed").is_precondition());
        assert!(!Error::Driver("io".into()).is_precondition());
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = Error::invalid_parameter("mode", "must be 0 or 1");
        assert_eq!(error.to_string(), "Invalid parameter 'mode': must be 0 or 1");
    }
}
