//! Hex and fixed-width encodings used on every read/write path.
//!
//! Callers pass tag data as hex strings. Spaces are ignored and digits are
//! case-insensitive on input; output is always uppercase with two digits per
//! byte.
//!
//! ```
//! use uhf_protocol::codec::{hex_decode, hex_encode};
//!
//! assert_eq!(hex_encode(&[]), "");
//! assert_eq!(hex_decode("de ad BE ef").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
//! assert!(hex_decode("ABC").is_err());
//! ```

use uhf_core::constants::PASSWORD_LENGTH;
use uhf_core::{Error, Password};

/// Encoding failures for caller-supplied data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid hex string: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Password must be 4 bytes, got {0}")]
    PasswordLength(usize),

    #[error("Data must be a whole number of 16-bit words, got {0} bytes")]
    OddByteCount(usize),

    #[error("Data must not be empty")]
    Empty,

    #[error("Data too long: {0} bytes")]
    TooLong(usize),
}

impl CodecError {
    /// Report the failure against the named operation parameter.
    #[must_use]
    pub fn into_parameter(self, name: &str) -> Error {
        Error::invalid_parameter(name, self.to_string())
    }
}

impl From<CodecError> for Error {
    fn from(error: CodecError) -> Self {
        error.into_parameter("data")
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Encode bytes as uppercase hex.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decode a hex string, ignoring spaces.
///
/// # Errors
///
/// Returns `CodecError::Hex` if the cleaned string has odd length or
/// contains a non-hex character.
pub fn hex_decode(input: &str) -> Result<Vec<u8>> {
    let clean: String = input.chars().filter(|c| *c != ' ').collect();
    Ok(hex::decode(clean)?)
}

/// Parse an access or kill password.
///
/// An absent or blank password is the all-zero password.
///
/// # Errors
///
/// Returns an error unless the input decodes to exactly four bytes.
pub fn parse_password(input: Option<&str>) -> Result<Password> {
    let Some(input) = input.filter(|s| !s.trim().is_empty()) else {
        return Ok(Password::ZERO);
    };

    let bytes = hex_decode(input)?;
    let fixed: [u8; PASSWORD_LENGTH] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CodecError::PasswordLength(bytes.len()))?;
    Ok(Password::new(fixed))
}

/// Decode a word-aligned payload and return it with its word count.
///
/// # Errors
///
/// Returns an error for malformed hex, an empty payload, an odd byte count,
/// or more words than a single command can carry.
pub fn decode_words(input: &str) -> Result<(Vec<u8>, u16)> {
    let bytes = hex_decode(input)?;
    if bytes.is_empty() {
        return Err(CodecError::Empty);
    }
    if bytes.len() % 2 != 0 {
        return Err(CodecError::OddByteCount(bytes.len()));
    }
    let words = u16::try_from(bytes.len() / 2).map_err(|_| CodecError::TooLong(bytes.len()))?;
    Ok((bytes, words))
}

/// Decode an EPC for `write_tag_epc`; EPCs are word aligned.
///
/// # Errors
///
/// Same as [`decode_words`].
pub fn decode_epc(input: &str) -> Result<Vec<u8>> {
    decode_words(input).map(|(bytes, _)| bytes)
}
