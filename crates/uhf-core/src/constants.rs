//! Controller-wide constants.
//!
//! Power limits, default command parameters, inventory loop timing, the
//! physical trigger key set, and the barcode scanner's accepted settings.
//! The values come from the handheld's vendor SDK conventions; changing them
//! changes what is sent to the hardware.
//!
//! # Usage
//!
//! ```
//! use uhf_core::constants::*;
//!
//! fn power_ok(dbm: i32) -> bool {
//!     (MIN_POWER_DBM..=MAX_POWER_DBM).contains(&dbm)
//! }
//!
//! assert!(power_ok(DEFAULT_POWER_DBM));
//! assert!(!power_ok(34));
//! ```

// ============================================================================
// Power
// ============================================================================

/// Minimum accepted read/write power in dBm.
pub const MIN_POWER_DBM: i32 = 5;

/// Maximum accepted read/write power in dBm.
pub const MAX_POWER_DBM: i32 = 33;

/// Power applied by `init` as a connectivity probe.
pub const DEFAULT_POWER_DBM: i32 = 26;

// ============================================================================
// Command Defaults
// ============================================================================

/// Default timeout for tag access commands (read, write, lock, kill).
pub const DEFAULT_COMMAND_TIMEOUT_MS: u16 = 1000;

/// Default timeout for a one-shot inventory.
pub const DEFAULT_INVENTORY_ONCE_TIMEOUT_MS: u16 = 100;

/// Default number of 16-bit words read by `read_tag_data`.
pub const DEFAULT_READ_LENGTH_WORDS: u16 = 6;

/// Access password used when the caller does not supply one.
pub const DEFAULT_PASSWORD_HEX: &str = "00000000";

/// Length of access and kill passwords in bytes.
pub const PASSWORD_LENGTH: usize = 4;

/// Hardware version reported when the driver returns none.
pub const UNKNOWN_HARDWARE_VERSION: &str = "Unknown";

// ============================================================================
// Inventory Loop
// ============================================================================

/// Pause between two inventory polls.
///
/// Bounds CPU usage and event rate while keeping the loop responsive to
/// cancellation.
pub const INVENTORY_POLL_INTERVAL_MS: u64 = 30;

/// Timeout passed to the timed poll primitive when realtime mode is off.
pub const TIMED_POLL_TIMEOUT_MS: u16 = 50;

/// Capacity of the tag event channel.
pub const DEFAULT_EVENT_BUFFER: usize = 100;

// ============================================================================
// Physical Keys
// ============================================================================

/// Android `KEYCODE_F3`, trigger on C510x handhelds.
pub const KEYCODE_F3: u16 = 133;

/// Android `KEYCODE_F4`, trigger on 6100 handhelds and PDA scan key 1.
pub const KEYCODE_F4: u16 = 134;

/// Android `KEYCODE_F7`, trigger on H3100 handhelds and PDA scan key 2.
pub const KEYCODE_F7: u16 = 137;

/// Key codes recognized as the physical inventory trigger.
pub const TRIGGER_KEY_CODES: [u16; 3] = [KEYCODE_F3, KEYCODE_F4, KEYCODE_F7];

/// Scan keys whose firmware default handling is suppressed while the
/// trigger controller is registered.
pub const SUPPRESSED_SCAN_KEYS: [u16; 2] = [KEYCODE_F4, KEYCODE_F7];

// ============================================================================
// Barcode Scanner
// ============================================================================

/// Scan timeouts accepted by the barcode scanner, in milliseconds.
pub const BARCODE_TIMEOUTS_MS: [u16; 10] = [
    1000, 2000, 3000, 4000, 5000, 6000, 7000, 8000, 9000, 10000,
];

/// Scan timeout used when the caller does not supply one.
pub const DEFAULT_BARCODE_TIMEOUT_MS: u16 = 5000;
