//! Events pushed to the session's consumers.
//!
//! Each stream has a single consumer and preserves emission order:
//!
//! - inventory: [`InventoryEvent`] from the background loop;
//! - button: [`ButtonEvent`] from the trigger controller;
//! - barcode: [`BarcodeEvent`] from the barcode session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uhf_core::{Error, KeyAction, TagRead};
use uhf_protocol::codec;

/// Event delivered by the inventory loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InventoryEvent {
    /// One tag seen by one poll.
    TagRead(TagRead),

    /// A poll failed; the loop keeps running.
    Error {
        /// Stable error code, see [`Error::code`].
        code: String,
        message: String,
    },
}

impl InventoryEvent {
    pub(crate) fn error(error: &Error) -> Self {
        Self::Error {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }

    /// The tag, if this is a tag event.
    #[must_use]
    pub fn tag(&self) -> Option<&TagRead> {
        match self {
            Self::TagRead(tag) => Some(tag),
            Self::Error { .. } => None,
        }
    }
}

/// Wire form of a tag observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagReport {
    /// EPC as uppercase hex.
    pub epc: String,
    pub rssi: i32,
    pub count: u32,
    pub antenna: u8,
}

impl From<&TagRead> for TagReport {
    fn from(tag: &TagRead) -> Self {
        Self {
            epc: tag.epc_hex(),
            rssi: tag.rssi,
            count: tag.read_count,
            antenna: tag.antenna_id,
        }
    }
}

/// Physical trigger notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonEvent {
    pub key_code: u16,
    pub action: KeyAction,
    /// Reading state after the event was handled.
    pub is_reading: bool,
}

/// Decoded barcode relayed from the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeEvent {
    /// Decoded text; invalid UTF-8 is replaced.
    pub barcode: String,
    /// Raw decoder bytes as uppercase hex.
    pub raw_data: String,
    /// Raw byte count.
    pub length: usize,
    /// Capture time, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl BarcodeEvent {
    #[must_use]
    pub fn from_raw(data: &[u8], timestamp: DateTime<Utc>) -> Self {
        Self {
            barcode: String::from_utf8_lossy(data).into_owned(),
            raw_data: codec::hex_encode(data),
            length: data.len(),
            timestamp,
        }
    }
}
