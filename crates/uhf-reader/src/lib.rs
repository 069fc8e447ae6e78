//! Session controller for a handheld UHF RFID reader and its barcode scanner.
//!
//! The crate sits between a caller (typically an RPC adapter) and the
//! hardware traits of `uhf-hardware`:
//!
//! - [`session::ReaderSession`] owns the reader module and the
//!   Uninitialized/Ready/Scanning/Closed state machine;
//! - [`inventory`] runs the background polling loop while scanning;
//! - [`button::ButtonController`] maps the physical trigger onto the same
//!   session entry points callers use;
//! - [`barcode::BarcodeSession`] drives the barcode scanner independently.
//!
//! Events flow out through channels, one consumer per stream; results of
//! synchronous operations are plain values, with serializable shapes in
//! [`response`].
//!
//! # Examples
//!
//! ```
//! use uhf_hardware::mock::MockUhf;
//! use uhf_reader::{ReaderConfig, ReaderSession};
//!
//! #[tokio::main]
//! async fn main() -> uhf_core::Result<()> {
//!     let (connector, _module) = MockUhf::new();
//!     let (mut session, _events) = ReaderSession::new(connector, ReaderConfig::default())?;
//!
//!     let response = session.init().await;
//!     assert!(response.success);
//!
//!     session.set_power(20, 20).await?;
//!     assert!(session.kill_tag("00000000", 1000).await.is_err());
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod barcode;
pub mod button;
pub mod config;
pub mod events;
pub mod inventory;
pub mod request;
pub mod response;
pub mod session;

pub use barcode::BarcodeSession;
pub use button::ButtonController;
pub use config::{ButtonConfig, ReaderConfig};
pub use events::{BarcodeEvent, ButtonEvent, InventoryEvent, TagReport};
pub use request::{FilterRequest, ReadRequest, WriteRequest};
pub use session::ReaderSession;
