//! Hardware seams of the handheld.
//!
//! Four collaborators sit behind these traits:
//!
//! - [`UhfConnector`] acquires the reader module and yields a [`UhfDriver`];
//! - [`UhfDriver`] executes reader commands against the acquired module;
//! - [`NotificationSource`] delivers asynchronous key and barcode events;
//! - [`SignalBus`] sends fire-and-forget control signals to system services.
//!
//! Driver methods return `impl Future + Send` so a session can hand the
//! driver to a spawned inventory task. Implementations can still be written
//! with plain `async fn`.
//!
//! # Object Safety
//!
//! [`UhfDriver`] is not object-safe. Use generics, or the enum wrappers in
//! [`devices`](crate::devices) where a concrete type is required.

use crate::error::Result;
use crate::types::{
    LockObjectCode, LockTypeCode, RawTag, RegionConf, TemperatureFamily, TemperatureTag,
};
use std::future::Future;
use std::sync::Arc;
use uhf_core::{BankId, Password, ScanMode};

/// Command interface of an acquired UHF reader module.
///
/// Every command either completes with the data it asked for, or fails with
/// [`HardwareError::Status`](crate::HardwareError::Status) carrying the
/// module's status code, or with a transport fault.
pub trait UhfDriver: Send + Sync {
    /// Query the module hardware version, `None` if the module reports none.
    fn hardware_version(&mut self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Apply read and write power in dBm.
    fn set_power(&mut self, read: u8, write: u8) -> impl Future<Output = Result<()>> + Send;

    /// Read back the power levels; the module may return fewer than two
    /// entries when it cannot report them.
    fn get_power(&mut self) -> impl Future<Output = Result<Vec<i32>>> + Send;

    fn set_region(&mut self, region: RegionConf) -> impl Future<Output = Result<()>> + Send;

    fn get_region(&mut self) -> impl Future<Output = Result<RegionConf>> + Send;

    /// Switch the module into async-reading mode, required before realtime
    /// polls.
    fn async_start_reading(&mut self) -> impl Future<Output = Result<()>> + Send;

    fn async_stop_reading(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Run one timed inventory round.
    fn inventory_by_timer(
        &mut self,
        timeout_ms: u16,
    ) -> impl Future<Output = Result<Vec<RawTag>>> + Send;

    /// Fetch tags seen since the previous call while in async-reading mode.
    fn inventory_realtime(&mut self) -> impl Future<Output = Result<Vec<RawTag>>> + Send;

    /// Read `words` 16-bit words starting at word `start_addr`.
    fn read_tag_data(
        &mut self,
        bank: BankId,
        start_addr: u32,
        words: u16,
        password: Password,
        timeout_ms: u16,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Write `data` (exactly `words` 16-bit words) at word `start_addr`.
    fn write_tag_data(
        &mut self,
        bank: BankId,
        start_addr: u32,
        data: &[u8],
        words: u16,
        password: Password,
        timeout_ms: u16,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Replace the EPC of the singulated tag, adjusting its PC word.
    fn write_tag_epc(
        &mut self,
        epc: &[u8],
        password: Password,
        timeout_ms: u16,
    ) -> impl Future<Output = Result<()>> + Send;

    fn lock_tag(
        &mut self,
        object: LockObjectCode,
        lock_type: LockTypeCode,
        password: Password,
        timeout_ms: u16,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Permanently disable the singulated tag.
    fn kill_tag(
        &mut self,
        password: Password,
        timeout_ms: u16,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Inventory temperature sensing tags of one chip family.
    fn temperature_tags(
        &mut self,
        family: TemperatureFamily,
    ) -> impl Future<Output = Result<Vec<TemperatureTag>>> + Send;

    /// Restrict inventory to tags whose `bank` matches (or, with
    /// `matching == false`, does not match) `data` at bit address
    /// `start_addr`.
    fn set_inventory_filter(
        &mut self,
        data: &[u8],
        bank: BankId,
        start_addr: u32,
        matching: bool,
    ) -> impl Future<Output = Result<()>> + Send;

    fn cancel_inventory_filter(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Frequency hopping table in kHz.
    fn frequency_points(&mut self) -> impl Future<Output = Result<Vec<u32>>> + Send;

    fn set_frequency_points(&mut self, points: &[u32])
    -> impl Future<Output = Result<()>> + Send;

    /// Release the module. Called once per acquisition.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Acquires the reader module.
pub trait UhfConnector: Send + Sync {
    type Driver: UhfDriver + 'static;

    /// Open the module and return a driver bound to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the module is absent or already held elsewhere.
    fn connect(&self) -> impl Future<Output = Result<Self::Driver>> + Send;
}

/// Callback invoked for every delivered notification.
pub type Callback<E> = Box<dyn Fn(E) + Send + Sync + 'static>;

/// Asynchronous event source with at most one registered receiver.
///
/// Callbacks may run on any thread; they must hand the event off quickly.
pub trait NotificationSource<E>: Send + Sync {
    /// Register `callback`, replacing any previous registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the registration.
    fn subscribe(&self, callback: Callback<E>) -> Result<()>;

    /// Remove the current registration. Removing nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the removal.
    fn unsubscribe(&self) -> Result<()>;
}

/// Control signal sent to the handheld's system services.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SystemSignal {
    /// Power up the barcode scanner.
    ScanInit,
    /// Choose where decoded barcodes are delivered.
    SetScanMode(ScanMode),
    /// Trigger one barcode scan.
    ScanCommand,
    /// Abort the barcode scan in flight.
    StopScan,
    /// Power down the barcode scanner.
    CloseScan,
    /// Set the barcode scan timeout in milliseconds.
    ScanTimeout(u16),
    /// Enable or disable firmware handling of the listed scan keys.
    KeySet { keys: Vec<u16>, enabled: bool },
}

impl SystemSignal {
    /// Broadcast action the signal is delivered as.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::ScanInit => "com.rfid.SCAN_INIT",
            Self::SetScanMode(_) => "com.rfid.SET_SCAN_MODE",
            Self::ScanCommand => "com.rfid.SCAN_CMD",
            Self::StopScan => "com.rfid.STOP_SCAN",
            Self::CloseScan => "com.rfid.CLOSE_SCAN",
            Self::ScanTimeout(_) => "com.rfid.SCAN_TIME",
            Self::KeySet { .. } => "com.rfid.KEY_SET",
        }
    }
}

/// Fire-and-forget channel to system services.
pub trait SignalBus: Send + Sync {
    /// Send `signal`. Delivery is not acknowledged.
    ///
    /// # Errors
    ///
    /// Returns an error only if the signal could not be handed to the bus.
    fn send(&self, signal: SystemSignal) -> Result<()>;
}

impl<T: SignalBus + ?Sized> SignalBus for Arc<T> {
    fn send(&self, signal: SystemSignal) -> Result<()> {
        (**self).send(signal)
    }
}
