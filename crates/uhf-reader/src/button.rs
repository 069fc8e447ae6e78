//! Physical trigger handling.
//!
//! The [`ButtonController`] turns trigger key notifications into inventory
//! start/stop calls on a [`ReaderSession`], through the same entry points a
//! caller uses.
//!
//! ```text
//! key source ──callback──► KeyEvent channel ──► on_physical_key ──► ReaderSession
//!                                                      │
//!                                                      └──► ButtonEvent channel
//! ```
//!
//! A key-down only reports the current reading state. A key-up toggles
//! inventory first and then reports the state after the toggle.
//!
//! # Examples
//!
//! ```
//! use uhf_hardware::mock::{MockKeySource, MockSignalBus, MockUhf};
//! use uhf_reader::button::ButtonController;
//! use uhf_reader::config::{ButtonConfig, ReaderConfig};
//! use uhf_reader::session::ReaderSession;
//!
//! #[tokio::main]
//! async fn main() -> uhf_core::Result<()> {
//!     let (connector, _module) = MockUhf::new();
//!     let (mut session, _tags) = ReaderSession::new(connector, ReaderConfig::default())?;
//!     session.init().await;
//!
//!     let (source, keys) = MockKeySource::new();
//!     let (mut button, _buttons) =
//!         ButtonController::new(source, MockSignalBus::new(), ButtonConfig::default())?;
//!     let mut pressed = button.attach()?;
//!
//!     keys.press(134);
//!     while let Ok(key) = pressed.try_recv() {
//!         button.on_physical_key(&mut session, key).await;
//!     }
//!     assert!(session.is_reading());
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

use crate::config::ButtonConfig;
use crate::events::ButtonEvent;
use crate::response::TriggerButtonResponse;
use crate::session::ReaderSession;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uhf_core::{Error, KeyAction, ReaderState, Result};
use uhf_hardware::{KeyEvent, NotificationSource, SignalBus, SystemSignal, UhfConnector};

/// Trigger key controller.
pub struct ButtonController<S, B>
where
    S: NotificationSource<KeyEvent>,
    B: SignalBus,
{
    source: S,
    bus: B,
    config: ButtonConfig,
    enabled: bool,
    attached: bool,
    events: mpsc::UnboundedSender<ButtonEvent>,
}

impl<S, B> ButtonController<S, B>
where
    S: NotificationSource<KeyEvent>,
    B: SignalBus,
{
    /// Create a detached controller and the receiver of its button events.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` does not validate.
    pub fn new(
        source: S,
        bus: B,
        config: ButtonConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ButtonEvent>)> {
        config.validate()?;
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            source,
            bus,
            enabled: config.enabled,
            config,
            attached: false,
            events,
        };
        Ok((controller, rx))
    }

    /// Subscribe to key notifications.
    ///
    /// Returns the stream of raw key events to feed back into
    /// [`on_physical_key`](Self::on_physical_key). Firmware handling of the
    /// configured scan keys is suppressed on a best-effort basis.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if already attached, leaving the existing
    /// receiver in place, or the source's error if it refuses the
    /// subscription.
    pub fn attach(&mut self) -> Result<mpsc::UnboundedReceiver<KeyEvent>> {
        if self.attached {
            return Err(Error::Config("trigger key receiver already attached".into()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.source.subscribe(Box::new(move |event: KeyEvent| {
            if tx.send(event).is_err() {
                debug!("Key event dropped, controller gone");
            }
        }))?;
        self.attached = true;
        info!("Trigger key receiver registered");

        self.set_scan_keys(false);
        Ok(rx)
    }

    /// Unsubscribe and restore firmware scan key handling.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        if let Err(e) = self.source.unsubscribe() {
            warn!("Failed to unregister trigger key receiver: {}", e);
        }
        self.attached = false;
        info!("Trigger key receiver unregistered");

        self.set_scan_keys(true);
    }

    fn set_scan_keys(&self, enabled: bool) {
        let signal = SystemSignal::KeySet {
            keys: self.config.suppressed_scan_keys.clone(),
            enabled,
        };
        match self.bus.send(signal) {
            Ok(()) => debug!("Scan keys {}", if enabled { "enabled" } else { "disabled" }),
            Err(e) => warn!("Failed to set scan keys enabled={}: {}", enabled, e),
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_trigger_button_enabled(&mut self, enabled: bool) -> TriggerButtonResponse {
        self.enabled = enabled;
        debug!("Trigger button enabled: {}", enabled);
        TriggerButtonResponse {
            success: true,
            enabled,
        }
    }

    #[must_use]
    pub fn is_trigger_button_enabled(&self) -> bool {
        self.enabled
    }

    /// Apply one key notification to `session`.
    ///
    /// Returns the emitted button event, or `None` if the key was ignored.
    pub async fn on_physical_key<C: UhfConnector>(
        &mut self,
        session: &mut ReaderSession<C>,
        key: KeyEvent,
    ) -> Option<ButtonEvent> {
        if !self.enabled || !self.config.is_trigger(key.code) {
            return None;
        }
        debug!("Trigger key {} {:?}", key.code, key.action);

        if key.action == KeyAction::Up {
            Self::toggle(session).await;
        }

        let event = ButtonEvent {
            key_code: key.code,
            action: key.action,
            is_reading: session.is_reading(),
        };
        if self.events.send(event).is_err() {
            debug!("Button event receiver dropped");
        }
        Some(event)
    }

    async fn toggle<C: UhfConnector>(session: &mut ReaderSession<C>) {
        match session.state() {
            ReaderState::Ready => {
                info!("Starting inventory from trigger");
                if let Err(e) = session.start_inventory().await {
                    warn!("Trigger failed to start inventory: {}", e);
                }
            }
            ReaderState::Scanning => {
                info!("Stopping inventory from trigger");
                if let Err(e) = session.stop_inventory().await {
                    warn!("Trigger failed to stop inventory: {}", e);
                }
            }
            ReaderState::Uninitialized | ReaderState::Closed => {
                warn!("Trigger ignored, reader not initialized");
            }
        }
    }
}

impl<S, B> Drop for ButtonController<S, B>
where
    S: NotificationSource<KeyEvent>,
    B: SignalBus,
{
    fn drop(&mut self) {
        self.detach();
    }
}
