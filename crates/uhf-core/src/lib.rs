//! Shared vocabulary for the handheld UHF reader controller.
//!
//! Types here are used by every other crate in the workspace: reader and
//! barcode states, tag reads, validated power levels, memory banks, lock
//! requests, and the controller-facing [`Error`] taxonomy.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
