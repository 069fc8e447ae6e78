//! Command parameter encoding for the UHF reader.
//!
//! Two pure layers sit between caller input and driver calls:
//!
//! - [`codec`] turns hex strings into bytes and back, and enforces the fixed
//!   widths of passwords, EPCs and word-aligned payloads;
//! - [`resolver`] maps symbolic names (regions, lock objects, lock actions)
//!   onto the driver's parameter codes with a total fallback.
//!
//! # Examples
//!
//! ```
//! use uhf_protocol::{codec, resolver};
//! use uhf_hardware::RegionConf;
//!
//! let epc = codec::hex_decode("e200 0017 220a").unwrap();
//! assert_eq!(codec::hex_encode(&epc), "E2000017220A");
//!
//! assert_eq!(resolver::resolve_region("korea"), RegionConf::Kr);
//! assert_eq!(resolver::resolve_region("mars"), RegionConf::Na);
//! ```

pub mod codec;
pub mod resolver;

pub use codec::{CodecError, hex_decode, hex_encode};
pub use resolver::{resolve_lock, resolve_region};
