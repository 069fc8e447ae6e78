//! Wire-level types exchanged with the UHF reader module.
//!
//! These mirror what the vendor driver speaks: numeric status codes, region
//! configuration bytes, Gen2 lock payloads and raw tag buffers. The reader
//! crate translates them to and from the caller-facing types in `uhf-core`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uhf_core::{KeyAction, TagRead};

/// Status code returned by every driver command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReaderStatus {
    Ok,
    IoErr,
    InternalDevErr,
    CmdFailed,
    CmdNoTag,
    OpNotSupported,
    InvalidPara,
    InvalidReaderHandle,
    HardwareAlert,
    /// Status code the driver does not document.
    Other(i32),
}

impl ReaderStatus {
    /// Decode a raw status code.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::IoErr,
            2 => Self::InternalDevErr,
            3 => Self::CmdFailed,
            4 => Self::CmdNoTag,
            5 => Self::OpNotSupported,
            6 => Self::InvalidPara,
            7 => Self::InvalidReaderHandle,
            8 => Self::HardwareAlert,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::IoErr => 1,
            Self::InternalDevErr => 2,
            Self::CmdFailed => 3,
            Self::CmdNoTag => 4,
            Self::OpNotSupported => 5,
            Self::InvalidPara => 6,
            Self::InvalidReaderHandle => 7,
            Self::HardwareAlert => 8,
            Self::Other(code) => code,
        }
    }

    /// Vendor name of the status, reported verbatim to callers.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ok => "MT_OK_ERR",
            Self::IoErr => "MT_IO_ERR",
            Self::InternalDevErr => "MT_INTERNAL_DEV_ERR",
            Self::CmdFailed => "MT_CMD_FAILED_ERR",
            Self::CmdNoTag => "MT_CMD_NO_TAG_ERR",
            Self::OpNotSupported => "MT_OP_NOT_SUPPORTED",
            Self::InvalidPara => "MT_INVALID_PARA",
            Self::InvalidReaderHandle => "MT_INVALID_READER_HANDLE",
            Self::HardwareAlert => "MT_HARDWARE_ALERT_ERR",
            Self::Other(_) => "MT_UNKNOWN_ERR",
        }
    }

    #[must_use]
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for ReaderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Regulatory region as configured in the module.
///
/// The module knows more regions than callers can name; the extra ones are
/// reported back as `UNKNOWN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionConf {
    /// North America (FCC).
    Na,
    /// Europe (ETSI).
    Eu,
    /// Korea.
    Kr,
    /// India.
    In,
    /// Japan.
    Jp,
    /// China.
    Prc,
    /// Europe, upper band.
    Eu3,
    /// Open region, all channels.
    Open,
    /// Region byte not listed above.
    Other(u8),
}

impl RegionConf {
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => Self::Na,
            0x02 => Self::Eu,
            0x03 => Self::Kr,
            0x04 => Self::In,
            0x05 => Self::Jp,
            0x06 => Self::Prc,
            0x08 => Self::Eu3,
            0xFF => Self::Open,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Na => 0x01,
            Self::Eu => 0x02,
            Self::Kr => 0x03,
            Self::In => 0x04,
            Self::Jp => 0x05,
            Self::Prc => 0x06,
            Self::Eu3 => 0x08,
            Self::Open => 0xFF,
            Self::Other(code) => code,
        }
    }
}

/// Gen2 lock target as the driver enumerates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockObjectCode {
    KillPassword,
    AccessPassword,
    /// EPC memory.
    Bank1,
    /// TID memory.
    Bank2,
    /// User memory.
    Bank3,
}

impl LockObjectCode {
    /// Driver flag value for the lock target.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::KillPassword => 0x01,
            Self::AccessPassword => 0x02,
            Self::Bank1 => 0x04,
            Self::Bank2 => 0x08,
            Self::Bank3 => 0x10,
        }
    }

    /// Position of the object's two-bit field inside the Gen2 lock payload.
    fn field_shift(self) -> u32 {
        match self {
            Self::KillPassword => 8,
            Self::AccessPassword => 6,
            Self::Bank1 => 4,
            Self::Bank2 => 2,
            Self::Bank3 => 0,
        }
    }
}

/// Lock operation kind for a single lock target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockKind {
    Unlock,
    Lock,
    PermaLock,
}

impl LockKind {
    fn action_bits(self) -> u32 {
        match self {
            Self::Unlock => 0b00,
            Self::Lock => 0b10,
            Self::PermaLock => 0b11,
        }
    }
}

/// One of the fifteen lock types the driver accepts.
///
/// A lock type pairs a target with an operation and encodes to the 20-bit
/// Gen2 lock payload: the upper ten bits are the mask, the lower ten bits
/// the action.
///
/// ```
/// use uhf_hardware::types::{LockKind, LockObjectCode, LockTypeCode};
///
/// let lock = LockTypeCode::new(LockObjectCode::Bank1, LockKind::Lock);
/// assert_eq!(lock.payload(), 0b00_0011_0000_00_0010_0000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockTypeCode {
    object: LockObjectCode,
    kind: LockKind,
}

impl LockTypeCode {
    #[must_use]
    pub const fn new(object: LockObjectCode, kind: LockKind) -> Self {
        Self { object, kind }
    }

    #[must_use]
    pub fn object(self) -> LockObjectCode {
        self.object
    }

    #[must_use]
    pub fn kind(self) -> LockKind {
        self.kind
    }

    /// Gen2 mask/action payload.
    #[must_use]
    pub fn payload(self) -> u32 {
        let shift = self.object.field_shift();
        let mask = 0b11 << shift;
        let action = self.kind.action_bits() << shift;
        (mask << 10) | action
    }
}

/// Tag as returned by an inventory primitive.
///
/// `epc_id` is the driver's buffer; only the first `epc_len` bytes belong to
/// the EPC.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTag {
    pub epc_id: Vec<u8>,
    pub epc_len: u16,
    pub rssi: i32,
    pub read_cnt: u32,
    pub antenna_id: u8,
}

impl RawTag {
    /// Build a raw tag whose buffer holds exactly the EPC.
    #[must_use]
    pub fn new(epc: Vec<u8>, rssi: i32) -> Self {
        Self {
            epc_len: u16::try_from(epc.len()).unwrap_or(u16::MAX),
            epc_id: epc,
            rssi,
            read_cnt: 1,
            antenna_id: 1,
        }
    }

    /// EPC bytes, clipped to the reported length.
    #[must_use]
    pub fn epc(&self) -> &[u8] {
        let len = usize::from(self.epc_len).min(self.epc_id.len());
        &self.epc_id[..len]
    }

    /// Convert to the caller-facing tag observation.
    #[must_use]
    pub fn to_tag_read(&self) -> TagRead {
        TagRead {
            epc: self.epc().to_vec(),
            rssi: self.rssi,
            read_count: self.read_cnt,
            antenna_id: self.antenna_id,
        }
    }
}

/// Temperature sensing tag chip family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureFamily {
    Yuehe,
    Yilian,
}

/// Temperature reported by a sensing tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureTag {
    pub epc_id: Vec<u8>,
    pub epc_len: u16,
    /// Degrees Celsius.
    pub temperature: f32,
}

impl TemperatureTag {
    #[must_use]
    pub fn epc(&self) -> &[u8] {
        let len = usize::from(self.epc_len).min(self.epc_id.len());
        &self.epc_id[..len]
    }
}

/// Physical key transition delivered by the key notification source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: u16,
    pub action: KeyAction,
}

impl KeyEvent {
    #[must_use]
    pub fn down(code: u16) -> Self {
        Self {
            code,
            action: KeyAction::Down,
        }
    }

    #[must_use]
    pub fn up(code: u16) -> Self {
        Self {
            code,
            action: KeyAction::Up,
        }
    }
}

/// Barcode decoder result as delivered by the scanner service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeScan {
    pub data: Vec<u8>,
}
