//! Parameters of the multi-argument tag commands.
//!
//! Every field has the handheld app's default, so a partially filled JSON
//! object deserializes into a complete request.

use serde::{Deserialize, Serialize};
use uhf_core::BankId;
use uhf_core::constants::{DEFAULT_COMMAND_TIMEOUT_MS, DEFAULT_READ_LENGTH_WORDS};

/// Parameters of `readTagData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReadRequest {
    pub bank: BankId,
    /// Start address in 16-bit words.
    pub start_addr: u32,
    /// Number of 16-bit words to read.
    pub length: u16,
    /// Access password as hex; absent means all zeros.
    pub password: Option<String>,
    #[serde(rename = "timeout")]
    pub timeout_ms: u16,
}

impl Default for ReadRequest {
    fn default() -> Self {
        Self {
            bank: BankId::READ_DEFAULT,
            start_addr: 0,
            length: DEFAULT_READ_LENGTH_WORDS,
            password: None,
            timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
        }
    }
}

/// Parameters of `writeTagData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WriteRequest {
    pub bank: BankId,
    pub start_addr: u32,
    /// Payload as hex, a whole number of words.
    pub data: String,
    pub password: Option<String>,
    #[serde(rename = "timeout")]
    pub timeout_ms: u16,
}

impl Default for WriteRequest {
    fn default() -> Self {
        Self {
            bank: BankId::WRITE_DEFAULT,
            start_addr: 0,
            data: String::new(),
            password: None,
            timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
        }
    }
}

/// Parameters of `setInventoryFilter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterRequest {
    /// Pattern as hex.
    #[serde(rename = "filterData")]
    pub data: String,
    pub bank: BankId,
    pub start_addr: u32,
    /// Keep matching tags when `true`, non-matching ones when `false`.
    pub matching: bool,
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self {
            data: String::new(),
            bank: BankId::Epc,
            start_addr: 0,
            matching: true,
        }
    }
}
