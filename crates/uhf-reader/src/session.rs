//! Reader session controller.
//!
//! A [`ReaderSession`] owns the acquired reader module and the session
//! state machine. Every reader operation goes through it, whether it comes
//! from a caller or from the physical trigger, so there is one authoritative
//! state.
//!
//! # States
//!
//! ```text
//! Uninitialized ──init──► Ready ──start_inventory──► Scanning
//!                          ▲  ◄──stop_inventory───────┘
//!        Closed ◄──close───┴──────────────────────────┘
//! ```
//!
//! - `init` from `Closed` acquires the module again.
//! - `start_inventory` while `Scanning` and `stop_inventory` outside
//!   `Scanning` are no-op successes.
//! - `close` is idempotent.
//!
//! # Concurrency
//!
//! The module accepts one command at a time. The driver sits behind an async
//! mutex shared only with the inventory loop, so session commands issued
//! while scanning wait for the current poll to finish. Leaving `Scanning`
//! joins the loop before anything else touches the module.
//!
//! # Errors
//!
//! Operations return [`uhf_core::Error`]. Precondition failures
//! (`NotInitialized`, `InvalidParameter`, `ZeroKillPassword`) are raised
//! before any hardware call. A failed hardware call leaves the session state
//! unchanged.
//!
//! # Examples
//!
//! ```
//! use uhf_hardware::mock::MockUhf;
//! use uhf_hardware::types::RawTag;
//! use uhf_reader::config::ReaderConfig;
//! use uhf_reader::session::ReaderSession;
//!
//! #[tokio::main]
//! async fn main() -> uhf_core::Result<()> {
//!     let (connector, handle) = MockUhf::new();
//!     handle.set_field(vec![RawTag::new(vec![0xE2, 0x00, 0x00, 0x01], -48)]);
//!
//!     let (mut session, mut events) = ReaderSession::new(connector, ReaderConfig::default())?;
//!     assert!(session.init().await.success);
//!
//!     session.start_inventory().await?;
//!     let event = events.recv().await.expect("tag event");
//!     assert_eq!(event.tag().map(|tag| tag.epc_hex()).as_deref(), Some("E2000001"));
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

use crate::config::ReaderConfig;
use crate::events::InventoryEvent;
use crate::inventory::{InventoryHandle, LoopSettings};
use crate::request::{FilterRequest, ReadRequest, WriteRequest};
use crate::response::{InitResponse, PowerLevels, TemperatureReading};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};
use uhf_core::constants::{DEFAULT_INVENTORY_ONCE_TIMEOUT_MS, UNKNOWN_HARDWARE_VERSION};
use uhf_core::{Error, InventoryMode, PowerConfig, ReaderState, RegionCode, Result, TagRead};
use uhf_hardware::{TemperatureFamily, UhfConnector, UhfDriver};
use uhf_protocol::{codec, resolver};

/// Temperature tag families, in the order they are tried.
const TEMPERATURE_FAMILIES: [TemperatureFamily; 2] =
    [TemperatureFamily::Yuehe, TemperatureFamily::Yilian];

const NO_TEMPERATURE_TAGS: &str = "No temperature tags found";

/// Controller for one handheld reader module.
pub struct ReaderSession<C: UhfConnector> {
    connector: C,
    config: ReaderConfig,
    probe_power: PowerConfig,
    state: ReaderState,
    mode: InventoryMode,
    driver: Option<Arc<Mutex<C::Driver>>>,
    hardware_version: Option<String>,
    inventory: Option<InventoryHandle>,
    events: mpsc::Sender<InventoryEvent>,
}

impl<C: UhfConnector> ReaderSession<C> {
    /// Create an uninitialized session and the receiver of its inventory
    /// events.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` does not validate.
    pub fn new(connector: C, config: ReaderConfig) -> Result<(Self, mpsc::Receiver<InventoryEvent>)> {
        config.validate()?;
        let probe_power = PowerConfig::new(config.default_power, config.default_power)?;
        let (events, rx) = mpsc::channel(config.event_buffer);

        let session = Self {
            connector,
            config,
            probe_power,
            state: ReaderState::Uninitialized,
            mode: InventoryMode::Timed,
            driver: None,
            hardware_version: None,
            inventory: None,
            events,
        };
        Ok((session, rx))
    }

    /// Current state; a `Scanning` session whose loop has exited on its own
    /// reports `Ready`.
    #[must_use]
    pub fn state(&self) -> ReaderState {
        if self.state == ReaderState::Scanning && self.loop_exited() {
            ReaderState::Ready
        } else {
            self.state
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    #[must_use]
    pub fn is_reading(&self) -> bool {
        self.state().is_reading()
    }

    /// The loop task ended without being stopped, e.g. because the event
    /// receiver was dropped.
    fn loop_exited(&self) -> bool {
        self.inventory.as_ref().is_none_or(InventoryHandle::is_finished)
    }

    /// Poll primitive the inventory loop uses, `Timed` outside `Scanning`.
    #[must_use]
    pub fn inventory_mode(&self) -> InventoryMode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn driver(&self) -> Result<&Arc<Mutex<C::Driver>>> {
        match &self.driver {
            Some(driver) if self.state.is_initialized() => Ok(driver),
            _ => Err(Error::NotInitialized),
        }
    }

    fn hardware_label(&self) -> String {
        self.hardware_version
            .clone()
            .unwrap_or_else(|| "unknown".to_string())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Acquire the module and probe it.
    ///
    /// The module counts as responding if either the hardware version query
    /// or applying the default power succeeds. Failures are reported in the
    /// response, never raised. Calling `init` on an initialized session
    /// returns success without reacquiring.
    pub async fn init(&mut self) -> InitResponse {
        if self.state.is_initialized() {
            debug!("Reader already initialized");
            return InitResponse::ok("Reader already initialized", self.hardware_label());
        }

        info!("Initializing UHF reader");
        let mut driver = match self.connector.connect().await {
            Ok(driver) => driver,
            Err(e) => {
                error!("Failed to connect to UHF module: {}", e);
                return InitResponse::failed(format!("Failed to connect: {e}"));
            }
        };

        let version = match driver.hardware_version().await {
            Ok(version) => version,
            Err(e) => {
                warn!("Hardware version probe failed: {}", e);
                None
            }
        };
        let power = self.probe_power;
        let power_applied = match driver
            .set_power(power.read_power(), power.write_power())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Default power probe failed: {}", e);
                false
            }
        };
        debug!(
            "Init probes: version={:?}, power_applied={}",
            version, power_applied
        );

        if version.is_none() && !power_applied {
            if let Err(e) = driver.close().await {
                warn!("Failed to release unresponsive module: {}", e);
            }
            error!("UHF module acquired but not responding");
            return InitResponse::failed("Reader instance created but not responding");
        }

        self.hardware_version = version;
        self.driver = Some(Arc::new(Mutex::new(driver)));
        self.mode = InventoryMode::Timed;
        self.state = ReaderState::Ready;
        info!("Reader initialized (hardware: {})", self.hardware_label());

        InitResponse::ok("Reader initialized successfully", self.hardware_label())
    }

    /// Stop inventory if running, release the module, and enter `Closed`.
    ///
    /// Closing a session that holds no module does nothing.
    ///
    /// # Errors
    ///
    /// Never fails; a module that refuses to close is logged and dropped.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(inventory) = self.inventory.take() {
            inventory.stop().await;
        }

        let Some(driver) = self.driver.take() else {
            debug!("Close requested with no module held");
            return Ok(());
        };

        if let Err(e) = driver.lock().await.close().await {
            warn!("Error closing UHF module: {}", e);
        }

        self.hardware_version = None;
        self.mode = InventoryMode::Timed;
        self.state = ReaderState::Closed;
        info!("Reader closed");
        Ok(())
    }

    /// Query the module's hardware version.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` outside `Ready`/`Scanning`, or the
    /// driver's error.
    pub async fn hardware_version(&mut self) -> Result<String> {
        let version = self.driver()?.lock().await.hardware_version().await?;
        if version.is_some() {
            self.hardware_version.clone_from(&version);
        }
        Ok(version.unwrap_or_else(|| UNKNOWN_HARDWARE_VERSION.to_string()))
    }

    // ------------------------------------------------------------------
    // Inventory
    // ------------------------------------------------------------------

    /// Start continuous inventory.
    ///
    /// With `realtime_inventory` configured the module is switched into
    /// async-reading mode first and the loop issues realtime polls;
    /// otherwise it issues timed polls. A loop that already exited on its
    /// own is reaped first and replaced.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` unless `Ready` or `Scanning`, or the
    /// driver's error if async-reading mode cannot be entered. On error the
    /// session stays `Ready`.
    pub async fn start_inventory(&mut self) -> Result<()> {
        match self.state {
            ReaderState::Scanning if !self.loop_exited() => {
                debug!("Inventory already running");
                return Ok(());
            }
            ReaderState::Scanning => {
                warn!("Inventory loop exited on its own, restarting");
                self.stop_inventory().await?;
            }
            ReaderState::Ready => {}
            ReaderState::Uninitialized | ReaderState::Closed => return Err(Error::NotInitialized),
        }

        let driver = Arc::clone(self.driver()?);
        let mode = if self.config.realtime_inventory {
            driver.lock().await.async_start_reading().await?;
            InventoryMode::RealTime
        } else {
            InventoryMode::Timed
        };

        let settings = LoopSettings {
            mode,
            poll_interval: self.config.poll_interval(),
            timed_poll_timeout_ms: self.config.timed_poll_timeout_ms,
        };
        self.inventory = Some(InventoryHandle::spawn(driver, settings, self.events.clone()));
        self.mode = mode;
        self.state = ReaderState::Scanning;
        info!("Inventory started ({:?})", mode);
        Ok(())
    }

    /// Stop continuous inventory and wait for the loop to exit.
    ///
    /// Once this returns no further inventory event is sent.
    ///
    /// # Errors
    ///
    /// Never fails; leaving async-reading mode is best effort.
    pub async fn stop_inventory(&mut self) -> Result<()> {
        if self.state != ReaderState::Scanning {
            debug!("Inventory not running");
            return Ok(());
        }

        if let Some(inventory) = self.inventory.take() {
            inventory.stop().await;
        }

        if self.mode == InventoryMode::RealTime {
            if let Err(e) = self.driver()?.lock().await.async_stop_reading().await {
                warn!("Failed to leave async reading mode: {}", e);
            }
        }

        self.mode = InventoryMode::Timed;
        self.state = ReaderState::Ready;
        info!("Inventory stopped");
        Ok(())
    }

    /// Run one timed inventory round; no tags is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` outside `Ready`/`Scanning`, or the
    /// driver's error.
    pub async fn inventory_once(&mut self, timeout_ms: Option<u16>) -> Result<Vec<TagRead>> {
        let timeout_ms = timeout_ms.unwrap_or(DEFAULT_INVENTORY_ONCE_TIMEOUT_MS);
        let tags = self
            .driver()?
            .lock()
            .await
            .inventory_by_timer(timeout_ms)
            .await?;
        debug!("Single inventory found {} tags", tags.len());
        Ok(tags.iter().map(|tag| tag.to_tag_read()).collect())
    }

    // ------------------------------------------------------------------
    // Radio configuration
    // ------------------------------------------------------------------

    /// Apply read and write power, each within 5..=33 dBm.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for an out-of-range value before
    /// touching the module.
    pub async fn set_power(&mut self, read_power: i32, write_power: i32) -> Result<()> {
        let driver = self.driver()?;
        let power = PowerConfig::new(read_power, write_power)?;
        driver
            .lock()
            .await
            .set_power(power.read_power(), power.write_power())
            .await?;
        debug!("Power set to {}/{} dBm", read_power, write_power);
        Ok(())
    }

    /// Read back power levels, `None` when the module cannot report both.
    pub async fn get_power(&mut self) -> Result<Option<PowerLevels>> {
        let levels = self.driver()?.lock().await.get_power().await?;
        Ok(match levels.as_slice() {
            [read_power, write_power, ..] => Some(PowerLevels {
                read_power: *read_power,
                write_power: *write_power,
            }),
            _ => None,
        })
    }

    /// Set the operating region by name; unknown names select USA.
    ///
    /// Returns the region actually applied.
    pub async fn set_region(&mut self, name: &str) -> Result<RegionCode> {
        let driver = self.driver()?;
        let region = resolver::parse_region(name);
        driver
            .lock()
            .await
            .set_region(resolver::region_conf(region))
            .await?;
        info!("Region set to {}", region);
        Ok(region)
    }

    pub async fn get_region(&mut self) -> Result<RegionCode> {
        let conf = self.driver()?.lock().await.get_region().await?;
        Ok(resolver::region_code(conf))
    }

    /// Read the first temperature sensing tag in the field.
    ///
    /// Each tag family is tried in turn; the first family that answers with
    /// a tag wins. When none does the result is a soft
    /// [`TemperatureReading::Unavailable`].
    pub async fn get_temperature(&mut self) -> Result<TemperatureReading> {
        let driver = self.driver()?;
        let mut driver = driver.lock().await;

        for family in TEMPERATURE_FAMILIES {
            match driver.temperature_tags(family).await {
                Ok(tags) => match tags.first() {
                    Some(tag) => {
                        return Ok(TemperatureReading::Reading {
                            temperature: tag.temperature,
                            epc: codec::hex_encode(tag.epc()),
                        });
                    }
                    None => debug!("No {:?} temperature tags", family),
                },
                Err(e) => warn!("{:?} temperature read failed: {}", family, e),
            }
        }

        warn!("{}", NO_TEMPERATURE_TAGS);
        Ok(TemperatureReading::Unavailable {
            error: NO_TEMPERATURE_TAGS.to_string(),
        })
    }

    /// Restrict inventory to tags matching a memory pattern.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for empty or malformed pattern hex.
    pub async fn set_inventory_filter(&mut self, request: &FilterRequest) -> Result<()> {
        let driver = self.driver()?;
        let data = codec::hex_decode(&request.data).map_err(|e| e.into_parameter("filterData"))?;
        if data.is_empty() {
            return Err(Error::invalid_parameter(
                "filterData",
                "Filter data must not be empty",
            ));
        }

        driver
            .lock()
            .await
            .set_inventory_filter(&data, request.bank, request.start_addr, request.matching)
            .await?;
        debug!("Inventory filter set on {:?}", request.bank);
        Ok(())
    }

    pub async fn cancel_inventory_filter(&mut self) -> Result<()> {
        self.driver()?
            .lock()
            .await
            .cancel_inventory_filter()
            .await?;
        debug!("Inventory filter cancelled");
        Ok(())
    }

    /// Frequency hopping table in kHz.
    pub async fn frequency_points(&mut self) -> Result<Vec<u32>> {
        Ok(self.driver()?.lock().await.frequency_points().await?)
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for an empty table.
    pub async fn set_frequency_points(&mut self, points: &[u32]) -> Result<()> {
        let driver = self.driver()?;
        if points.is_empty() {
            return Err(Error::invalid_parameter(
                "points",
                "At least one frequency point is required",
            ));
        }
        driver.lock().await.set_frequency_points(points).await?;
        info!("Frequency table set ({} points)", points.len());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tag access
    // ------------------------------------------------------------------

    /// Read `request.length` words from a tag memory bank.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for a zero length or a malformed
    /// password, or the module's status if it rejects the read.
    pub async fn read_tag_data(&mut self, request: &ReadRequest) -> Result<Vec<u8>> {
        let driver = self.driver()?;
        if request.length == 0 {
            return Err(Error::invalid_parameter(
                "length",
                "Length must be at least one word",
            ));
        }
        let password = codec::parse_password(request.password.as_deref())
            .map_err(|e| e.into_parameter("password"))?;

        let data = driver
            .lock()
            .await
            .read_tag_data(
                request.bank,
                request.start_addr,
                request.length,
                password,
                request.timeout_ms,
            )
            .await?;
        debug!(
            "Read {} bytes from {:?} at word {}",
            data.len(),
            request.bank,
            request.start_addr
        );
        Ok(data)
    }

    /// Write a word-aligned hex payload to a tag memory bank.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for malformed, empty, or odd-length
    /// data or a malformed password.
    pub async fn write_tag_data(&mut self, request: &WriteRequest) -> Result<()> {
        let driver = self.driver()?;
        let (data, words) =
            codec::decode_words(&request.data).map_err(|e| e.into_parameter("data"))?;
        let password = codec::parse_password(request.password.as_deref())
            .map_err(|e| e.into_parameter("password"))?;

        driver
            .lock()
            .await
            .write_tag_data(
                request.bank,
                request.start_addr,
                &data,
                words,
                password,
                request.timeout_ms,
            )
            .await?;
        debug!(
            "Wrote {} words to {:?} at word {}",
            words, request.bank, request.start_addr
        );
        Ok(())
    }

    /// Replace the EPC of the tag in the field.
    pub async fn write_tag_epc(
        &mut self,
        epc: &str,
        password: Option<&str>,
        timeout_ms: u16,
    ) -> Result<()> {
        let driver = self.driver()?;
        let epc = codec::decode_epc(epc).map_err(|e| e.into_parameter("epc"))?;
        let password = codec::parse_password(password).map_err(|e| e.into_parameter("password"))?;

        driver
            .lock()
            .await
            .write_tag_epc(&epc, password, timeout_ms)
            .await?;
        info!("EPC written: {}", codec::hex_encode(&epc));
        Ok(())
    }

    /// Lock, unlock, or permanently lock a memory region or password.
    ///
    /// Unknown names fall back to the EPC bank and the `LOCK` action.
    pub async fn lock_tag(
        &mut self,
        object: &str,
        action: &str,
        password: Option<&str>,
        timeout_ms: u16,
    ) -> Result<()> {
        let driver = self.driver()?;
        let password = codec::parse_password(password).map_err(|e| e.into_parameter("password"))?;
        let (object_code, lock_type) = resolver::resolve_lock(object, action);

        driver
            .lock()
            .await
            .lock_tag(object_code, lock_type, password, timeout_ms)
            .await?;
        info!("Tag locked: {:?} {:?}", lock_type.object(), lock_type.kind());
        Ok(())
    }

    /// Permanently disable the tag in the field.
    ///
    /// # Errors
    ///
    /// Returns `Error::ZeroKillPassword` for an empty or all-zero password
    /// without contacting the module.
    pub async fn kill_tag(&mut self, kill_password: &str, timeout_ms: u16) -> Result<()> {
        let driver = self.driver()?;
        let password = codec::parse_password(Some(kill_password))
            .map_err(|e| e.into_parameter("killPassword"))?;
        if password.is_zero() {
            return Err(Error::ZeroKillPassword);
        }

        driver.lock().await.kill_tag(password, timeout_ms).await?;
        warn!("Tag killed");
        Ok(())
    }
}

impl<C: UhfConnector> Drop for ReaderSession<C> {
    fn drop(&mut self) {
        if let Some(inventory) = &self.inventory {
            inventory.cancel();
        }
    }
}

impl<C: UhfConnector> std::fmt::Debug for ReaderSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSession")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("hardware_version", &self.hardware_version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uhf_hardware::mock::{MockCall, MockUhf, MockUhfHandle};
    use uhf_hardware::{HardwareError, ReaderStatus, TemperatureTag};

    async fn ready() -> (ReaderSession<MockUhf>, MockUhfHandle) {
        let (connector, handle) = MockUhf::new();
        let (mut session, _events) = ReaderSession::new(connector, ReaderConfig::default()).unwrap();
        assert!(session.init().await.success);
        handle.clear_calls();
        (session, handle)
    }

    #[tokio::test]
    async fn test_init_probes_module() {
        let (connector, handle) = MockUhf::new();
        let (mut session, _events) = ReaderSession::new(connector, ReaderConfig::default()).unwrap();

        let response = session.init().await;
        assert!(response.success);
        assert_eq!(response.message, "Reader initialized successfully");
        assert_eq!(response.hardware.as_deref(), Some("UHF-MOCK-1.0"));
        assert_eq!(session.state(), ReaderState::Ready);
        assert_eq!(
            handle.calls(),
            vec![
                MockCall::Connect,
                MockCall::HardwareVersion,
                MockCall::SetPower { read: 26, write: 26 },
            ]
        );
    }

    #[tokio::test]
    async fn test_init_succeeds_with_power_probe_only() {
        let (connector, _handle) = MockUhf::with_version(None);
        let (mut session, _events) = ReaderSession::new(connector, ReaderConfig::default()).unwrap();

        let response = session.init().await;
        assert!(response.success);
        assert_eq!(response.hardware.as_deref(), Some("unknown"));
    }

    #[tokio::test]
    async fn test_init_succeeds_with_version_probe_only() {
        let (connector, handle) = MockUhf::new();
        handle.fail_next("set_power", HardwareError::Status(ReaderStatus::CmdFailed));
        let (mut session, _events) = ReaderSession::new(connector, ReaderConfig::default()).unwrap();

        assert!(session.init().await.success);
        assert!(session.is_initialized());
    }

    #[tokio::test]
    async fn test_init_not_responding() {
        let (connector, handle) = MockUhf::with_version(None);
        handle.fail_next("set_power", HardwareError::timeout(1000));
        let (mut session, _events) = ReaderSession::new(connector, ReaderConfig::default()).unwrap();

        let response = session.init().await;
        assert!(!response.success);
        assert_eq!(response.message, "Reader instance created but not responding");
        assert_eq!(session.state(), ReaderState::Uninitialized);
        assert!(!handle.is_open());
    }

    #[tokio::test]
    async fn test_init_connect_failure() {
        let (connector, handle) = MockUhf::new();
        handle.fail_connect(HardwareError::disconnected("UHF module"));
        let (mut session, _events) = ReaderSession::new(connector, ReaderConfig::default()).unwrap();

        let response = session.init().await;
        assert!(!response.success);
        assert!(response.message.starts_with("Failed to connect"));
        assert_eq!(session.state(), ReaderState::Uninitialized);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let (mut session, handle) = ready().await;
        let response = session.init().await;

        assert!(response.success);
        assert_eq!(response.hardware.as_deref(), Some("UHF-MOCK-1.0"));
        assert!(handle.calls().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let (connector, _handle) = MockUhf::new();
        let config = ReaderConfig {
            poll_interval_ms: 0,
            ..ReaderConfig::default()
        };
        assert!(matches!(
            ReaderSession::new(connector, config),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_hardware_version_unknown() {
        let (connector, _handle) = MockUhf::with_version(None);
        let (mut session, _events) = ReaderSession::new(connector, ReaderConfig::default()).unwrap();
        session.init().await;

        assert_eq!(session.hardware_version().await.unwrap(), "Unknown");
    }

    #[tokio::test]
    async fn test_get_power_short_report() {
        let (mut session, handle) = ready().await;
        assert_eq!(
            session.get_power().await.unwrap(),
            Some(PowerLevels {
                read_power: 26,
                write_power: 26
            })
        );

        handle.set_power_report(vec![26]);
        assert_eq!(session.get_power().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_power_rejected_by_module() {
        let (mut session, handle) = ready().await;
        handle.fail_next("set_power", HardwareError::Status(ReaderStatus::CmdFailed));

        let error = session.set_power(20, 20).await.unwrap_err();
        assert_eq!(error.code(), "MT_CMD_FAILED_ERR");
        assert_eq!(session.state(), ReaderState::Ready);
    }

    #[tokio::test]
    async fn test_region_round_trip() {
        let (mut session, handle) = ready().await;

        assert_eq!(session.set_region("korea").await.unwrap(), RegionCode::Korea);
        assert_eq!(session.get_region().await.unwrap(), RegionCode::Korea);

        assert_eq!(session.set_region("ATLANTIS").await.unwrap(), RegionCode::Usa);

        handle.set_region(uhf_hardware::RegionConf::Jp);
        assert_eq!(session.get_region().await.unwrap(), RegionCode::Unknown);
    }

    #[tokio::test]
    async fn test_temperature_falls_back_to_second_family() {
        let (mut session, handle) = ready().await;
        handle.set_temperatures(
            TemperatureFamily::Yuehe,
            Err(HardwareError::unsupported("yuehe temperature")),
        );
        handle.set_temperatures(
            TemperatureFamily::Yilian,
            Ok(vec![TemperatureTag {
                epc_id: vec![0xE2, 0x80],
                epc_len: 2,
                temperature: 24.5,
            }]),
        );

        assert_eq!(
            session.get_temperature().await.unwrap(),
            TemperatureReading::Reading {
                temperature: 24.5,
                epc: "E280".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_temperature_unavailable_is_soft() {
        let (mut session, handle) = ready().await;

        let reading = session.get_temperature().await.unwrap();
        assert!(!reading.is_available());
        assert_eq!(
            handle.calls(),
            vec![
                MockCall::TemperatureTags(TemperatureFamily::Yuehe),
                MockCall::TemperatureTags(TemperatureFamily::Yilian),
            ]
        );
    }

    #[tokio::test]
    async fn test_filter_requires_pattern() {
        let (mut session, handle) = ready().await;
        let error = session
            .set_inventory_filter(&FilterRequest::default())
            .await
            .unwrap_err();
        assert_eq!(error.code(), "INVALID_PARAMETER");
        assert!(handle.calls().is_empty());

        let request = FilterRequest {
            data: "E200".to_string(),
            ..FilterRequest::default()
        };
        session.set_inventory_filter(&request).await.unwrap();
        assert_eq!(
            handle.filter(),
            Some((vec![0xE2, 0x00], uhf_core::BankId::Epc, 0, true))
        );

        session.cancel_inventory_filter().await.unwrap();
        assert_eq!(handle.filter(), None);
    }

    #[tokio::test]
    async fn test_frequency_points() {
        let (mut session, handle) = ready().await;
        assert_eq!(
            session.frequency_points().await.unwrap(),
            vec![902_750, 903_250, 903_750]
        );

        assert!(session.set_frequency_points(&[]).await.is_err());
        session.set_frequency_points(&[915_250]).await.unwrap();
        assert_eq!(handle.frequencies(), vec![915_250]);
    }

    #[tokio::test]
    async fn test_lock_tag_resolves_names() {
        let (mut session, handle) = ready().await;
        session
            .lock_tag("user", "perma_lock", Some("11223344"), 1000)
            .await
            .unwrap();

        let (object, lock_type) = resolver::resolve_lock("USER", "PERMA_LOCK");
        assert_eq!(handle.calls(), vec![MockCall::LockTag { object, lock_type }]);
    }

    #[tokio::test]
    async fn test_drop_cancels_inventory() {
        let (connector, handle) = MockUhf::new();
        let (mut session, _events) = ReaderSession::new(connector, ReaderConfig::default()).unwrap();
        session.init().await;
        session.start_inventory().await.unwrap();
        drop(session);

        tokio::time::sleep(std::time::Duration::from_millis(60)).await;
        let polls = handle.poll_count();
        tokio::time::sleep(std::time::Duration::from_millis(60)).await;
        assert_eq!(handle.poll_count(), polls);
    }
}
