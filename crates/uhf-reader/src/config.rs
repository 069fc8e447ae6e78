//! Session and trigger configuration.
//!
//! Plain structs with defaults; override fields with struct-literal update
//! syntax and call `validate()` before handing them to a session.
//!
//! ```
//! use uhf_reader::config::ReaderConfig;
//!
//! let config = ReaderConfig {
//!     poll_interval_ms: 50,
//!     ..ReaderConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uhf_core::constants::{
    DEFAULT_EVENT_BUFFER, DEFAULT_POWER_DBM, INVENTORY_POLL_INTERVAL_MS, MAX_POWER_DBM,
    MIN_POWER_DBM, SUPPRESSED_SCAN_KEYS, TIMED_POLL_TIMEOUT_MS, TRIGGER_KEY_CODES,
};
use uhf_core::{Error, Result};

/// Reader session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Power in dBm applied by `init` as a connectivity probe.
    pub default_power: i32,

    /// Pause between inventory polls.
    pub poll_interval_ms: u64,

    /// Timeout of the timed poll primitive.
    pub timed_poll_timeout_ms: u16,

    /// Use the module's async-reading mode and realtime polls for
    /// continuous inventory. When off, the loop issues timed polls.
    pub realtime_inventory: bool,

    /// Capacity of the inventory event channel.
    pub event_buffer: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_power: DEFAULT_POWER_DBM,
            poll_interval_ms: INVENTORY_POLL_INTERVAL_MS,
            timed_poll_timeout_ms: TIMED_POLL_TIMEOUT_MS,
            realtime_inventory: true,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl ReaderConfig {
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_POWER_DBM..=MAX_POWER_DBM).contains(&self.default_power) {
            return Err(Error::Config(format!(
                "default_power must be between {MIN_POWER_DBM} and {MAX_POWER_DBM}, got {}",
                self.default_power
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be positive".to_string()));
        }
        if self.timed_poll_timeout_ms == 0 {
            return Err(Error::Config(
                "timed_poll_timeout_ms must be positive".to_string(),
            ));
        }
        if self.event_buffer == 0 {
            return Err(Error::Config("event_buffer must be positive".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Physical trigger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// Key codes that toggle inventory.
    pub trigger_keys: Vec<u16>,

    /// Scan keys whose firmware handling is suppressed while attached.
    pub suppressed_scan_keys: Vec<u16>,

    /// Whether the trigger starts enabled.
    pub enabled: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            trigger_keys: TRIGGER_KEY_CODES.to_vec(),
            suppressed_scan_keys: SUPPRESSED_SCAN_KEYS.to_vec(),
            enabled: true,
        }
    }
}

impl ButtonConfig {
    /// # Errors
    ///
    /// Returns `Error::Config` if no trigger key is configured.
    pub fn validate(&self) -> Result<()> {
        if self.trigger_keys.is_empty() {
            return Err(Error::Config("trigger_keys must not be empty".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_trigger(&self, code: u16) -> bool {
        self.trigger_keys.contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_config_default() {
        let config = ReaderConfig::default();
        assert_eq!(config.default_power, 26);
        assert_eq!(config.poll_interval(), Duration::from_millis(30));
        assert_eq!(config.timed_poll_timeout_ms, 50);
        assert!(config.realtime_inventory);
        assert_eq!(config.event_buffer, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reader_config_rejects_power() {
        let config = ReaderConfig {
            default_power: 40,
            ..ReaderConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_reader_config_rejects_zero_buffer() {
        let config = ReaderConfig {
            event_buffer: 0,
            ..ReaderConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_reader_config_partial_json() {
        let config: ReaderConfig =
            serde_json::from_str(r#"{"poll_interval_ms": 60, "realtime_inventory": false}"#)
                .unwrap();
        assert_eq!(config.poll_interval_ms, 60);
        assert!(!config.realtime_inventory);
        assert_eq!(config.default_power, 26);
    }

    #[test]
    fn test_button_config_default() {
        let config = ButtonConfig::default();
        assert!(config.is_trigger(133));
        assert!(config.is_trigger(134));
        assert!(config.is_trigger(137));
        assert!(!config.is_trigger(66));
        assert_eq!(config.suppressed_scan_keys, vec![134, 137]);
        assert!(config.enabled);
    }

    #[test]
    fn test_button_config_requires_keys() {
        let config = ButtonConfig {
            trigger_keys: Vec::new(),
            ..ButtonConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
