use crate::{
    Result,
    constants::{BARCODE_TIMEOUTS_MS, MAX_POWER_DBM, MIN_POWER_DBM, PASSWORD_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level reader session state.
///
/// ```text
/// Uninitialized ──init──► Ready ──start──► Scanning
///                          ▲  ◄──stop───────┘
///        Closed ◄──close───┴────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderState {
    /// No hardware handle has been acquired yet.
    Uninitialized,
    /// Hardware handle acquired, no inventory running.
    Ready,
    /// Continuous inventory running.
    Scanning,
    /// Hardware handle released.
    Closed,
}

impl ReaderState {
    /// Whether the session holds a hardware handle.
    #[must_use]
    pub fn is_initialized(self) -> bool {
        matches!(self, Self::Ready | Self::Scanning)
    }

    /// Whether continuous inventory is running.
    #[must_use]
    pub fn is_reading(self) -> bool {
        self == Self::Scanning
    }
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "Uninitialized",
            Self::Ready => "Ready",
            Self::Scanning => "Scanning",
            Self::Closed => "Closed",
        };
        write!(f, "{s}")
    }
}

/// Barcode scanner sub-session state, independent of [`ReaderState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeState {
    Uninitialized,
    Initialized,
    Scanning,
    Closed,
}

impl BarcodeState {
    #[must_use]
    pub fn is_initialized(self) -> bool {
        matches!(self, Self::Initialized | Self::Scanning)
    }
}

/// A single tag observation produced by an inventory poll.
///
/// Reads are not deduplicated; the same EPC shows up once per poll hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRead {
    /// EPC bytes, typically 12.
    pub epc: Vec<u8>,
    /// Received signal strength.
    pub rssi: i32,
    /// How many times the tag answered during the poll.
    pub read_count: u32,
    /// Antenna that saw the tag, 0 if unknown.
    pub antenna_id: u8,
}

impl TagRead {
    /// Get the EPC as an uppercase hexadecimal string.
    #[must_use]
    pub fn epc_hex(&self) -> String {
        hex::encode_upper(&self.epc)
    }
}

/// Validated read/write power pair in dBm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerConfig {
    read_power: u8,
    write_power: u8,
}

impl PowerConfig {
    /// Create a power pair, both values must be within 5..=33 dBm.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` naming the first value out of range.
    pub fn new(read_power: i32, write_power: i32) -> Result<Self> {
        Ok(Self {
            read_power: Self::validate("readPower", read_power)?,
            write_power: Self::validate("writePower", write_power)?,
        })
    }

    fn validate(name: &str, dbm: i32) -> Result<u8> {
        if !(MIN_POWER_DBM..=MAX_POWER_DBM).contains(&dbm) {
            return Err(Error::invalid_parameter(
                name,
                format!("Power must be between {MIN_POWER_DBM} and {MAX_POWER_DBM}, got {dbm}"),
            ));
        }
        // Range check above guarantees the value fits.
        Ok(dbm as u8)
    }

    #[must_use]
    pub fn read_power(&self) -> u8 {
        self.read_power
    }

    #[must_use]
    pub fn write_power(&self) -> u8 {
        self.write_power
    }
}

/// Operating region, as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionCode {
    Usa,
    Eu,
    Chn,
    Korea,
    /// Hardware reported a region with no symbolic name.
    Unknown,
}

impl RegionCode {
    /// Regions that can be requested by name.
    pub const SETTABLE: [RegionCode; 4] = [Self::Usa, Self::Eu, Self::Chn, Self::Korea];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usa => "USA",
            Self::Eu => "EU",
            Self::Chn => "CHN",
            Self::Korea => "KOREA",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag memory bank selector, serialized as its numeric selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum BankId {
    Reserved = 0,
    Epc = 1,
    Tid = 2,
    User = 3,
}

impl BankId {
    /// Default bank for reads.
    pub const READ_DEFAULT: BankId = BankId::Epc;

    /// Default bank for writes.
    pub const WRITE_DEFAULT: BankId = BankId::User;

    /// Create a bank from its numeric selector.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` for values other than 0-3.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Reserved),
            1 => Ok(Self::Epc),
            2 => Ok(Self::Tid),
            3 => Ok(Self::User),
            _ => Err(Error::invalid_parameter(
                "bank",
                format!("Bank must be 0-3, got {value}"),
            )),
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for BankId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value)
    }
}

impl From<BankId> for u8 {
    fn from(bank: BankId) -> Self {
        bank.as_u8()
    }
}

/// Memory region or password targeted by a lock command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockObject {
    Epc,
    Tid,
    User,
    AccessPassword,
    KillPassword,
}

impl LockObject {
    pub const ALL: [LockObject; 5] = [
        Self::Epc,
        Self::Tid,
        Self::User,
        Self::AccessPassword,
        Self::KillPassword,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Epc => "EPC",
            Self::Tid => "TID",
            Self::User => "USER",
            Self::AccessPassword => "ACCESS_PASSWORD",
            Self::KillPassword => "KILL_PASSWORD",
        }
    }
}

/// Action applied by a lock command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockAction {
    Lock,
    Unlock,
    PermaLock,
}

impl LockAction {
    pub const ALL: [LockAction; 3] = [Self::Lock, Self::Unlock, Self::PermaLock];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lock => "LOCK",
            Self::Unlock => "UNLOCK",
            Self::PermaLock => "PERMA_LOCK",
        }
    }
}

/// 32-bit access or kill password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Password([u8; PASSWORD_LENGTH]);

impl Password {
    /// The all-zero password, also the Gen2 factory default.
    pub const ZERO: Password = Password([0; PASSWORD_LENGTH]);

    #[must_use]
    pub const fn new(bytes: [u8; PASSWORD_LENGTH]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PASSWORD_LENGTH] {
        &self.0
    }
}

/// Fully resolved lock command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRequest {
    pub object: LockObject,
    pub action: LockAction,
    pub password: Password,
    pub timeout_ms: u16,
}

/// Poll primitive used by the inventory loop.
///
/// `RealTime` is only valid while the hardware is in async-reading mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryMode {
    #[default]
    Timed,
    RealTime,
}

/// Where the barcode scanner delivers its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScanMode {
    /// Results are broadcast to registered receivers (mode 0).
    Broadcast = 0,
    /// Results are typed into the focused input field (mode 1).
    FocusInput = 1,
}

impl ScanMode {
    /// # Errors
    /// Returns `Error::InvalidParameter` for values other than 0 and 1.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Broadcast),
            1 => Ok(Self::FocusInput),
            _ => Err(Error::invalid_parameter(
                "mode",
                format!("Mode must be 0 or 1, got {value}"),
            )),
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Barcode scan timeout, restricted to whole seconds from 1 to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarcodeTimeout(u16);

impl BarcodeTimeout {
    /// # Errors
    /// Returns `Error::InvalidParameter` if `ms` is not one of the accepted
    /// values; it is never clamped.
    pub fn new(ms: u32) -> Result<Self> {
        BARCODE_TIMEOUTS_MS
            .iter()
            .find(|allowed| u32::from(**allowed) == ms)
            .map(|allowed| Self(*allowed))
            .ok_or_else(|| {
                Error::invalid_parameter(
                    "timeout",
                    format!("Timeout must be one of: {BARCODE_TIMEOUTS_MS:?}, got {ms}"),
                )
            })
    }

    #[must_use]
    pub fn as_millis(self) -> u16 {
        self.0
    }
}

/// Edge of a physical key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    Down,
    Up,
}
