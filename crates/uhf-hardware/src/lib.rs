//! Hardware abstraction layer for the handheld's UHF reader module and
//! system services.
//!
//! The controller in `uhf-reader` never talks to the vendor driver directly.
//! It goes through the traits in [`traits`], which a vendor binding
//! implements on the device and the [`mock`] module implements for tests and
//! the demo CLI.
//!
//! ```no_run
//! use uhf_hardware::traits::{UhfConnector, UhfDriver};
//! use uhf_hardware::Result;
//!
//! async fn probe<C: UhfConnector>(connector: &C) -> Result<Option<String>> {
//!     let mut driver = connector.connect().await?;
//!     let version = driver.hardware_version().await?;
//!     driver.close().await?;
//!     Ok(version)
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] with [`HardwareError`].
//! Converting into [`uhf_core::Error`] keeps the module's status name so
//! callers see the vendor code unchanged.
//!
//! # Thread Safety
//!
//! All traits require `Send + Sync` and driver futures are `Send`, so an
//! acquired driver can be shared with a spawned inventory task.

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{Callback, NotificationSource, SignalBus, SystemSignal, UhfConnector, UhfDriver};
pub use types::{
    BarcodeScan, KeyEvent, LockKind, LockObjectCode, LockTypeCode, RawTag, ReaderStatus,
    RegionConf, TemperatureFamily, TemperatureTag,
};
