//! Barcode scanner sub-session.
//!
//! The scanner is driven entirely by fire-and-forget signals; results come
//! back asynchronously through a notification source. Its state machine is
//! independent of the reader session:
//!
//! ```text
//! Uninitialized ──init──► Initialized ──start_scan──► Scanning
//!                          ▲  ◄──result / stop_scan─────┘
//!        Closed ◄──close───┴────────────────────────────┘
//! ```
//!
//! Each decoded barcode is relayed once on the [`BarcodeEvent`] channel.

use crate::events::BarcodeEvent;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uhf_core::{BarcodeState, BarcodeTimeout, Error, Result, ScanMode};
use uhf_hardware::{BarcodeScan, NotificationSource, SignalBus, SystemSignal};

fn lock(state: &Mutex<BarcodeState>) -> MutexGuard<'_, BarcodeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Controller for the handheld's barcode scanner.
pub struct BarcodeSession<S, B>
where
    S: NotificationSource<BarcodeScan>,
    B: SignalBus,
{
    source: S,
    bus: B,
    state: Arc<Mutex<BarcodeState>>,
    events: mpsc::UnboundedSender<BarcodeEvent>,
}

impl<S, B> BarcodeSession<S, B>
where
    S: NotificationSource<BarcodeScan>,
    B: SignalBus,
{
    /// Create an uninitialized session and the receiver of decoded barcodes.
    pub fn new(source: S, bus: B) -> (Self, mpsc::UnboundedReceiver<BarcodeEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            source,
            bus,
            state: Arc::new(Mutex::new(BarcodeState::Uninitialized)),
            events,
        };
        (session, rx)
    }

    #[must_use]
    pub fn state(&self) -> BarcodeState {
        *lock(&self.state)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state().is_initialized()
    }

    fn send(&self, signal: SystemSignal) -> Result<()> {
        let action = signal.action();
        self.bus.send(signal)?;
        debug!("Sent {}", action);
        Ok(())
    }

    /// Register for results and power up the scanner in broadcast mode.
    ///
    /// # Errors
    ///
    /// Returns an error if registration or a signal fails; the session then
    /// stays in its previous state.
    pub fn init(&mut self) -> Result<()> {
        if self.is_initialized() {
            debug!("Barcode scanner already initialized");
            return Ok(());
        }

        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        self.source.subscribe(Box::new(move |scan: BarcodeScan| {
            let event = BarcodeEvent::from_raw(&scan.data, Utc::now());
            debug!("Barcode received: {}", event.barcode);
            {
                let mut state = lock(&state);
                if *state == BarcodeState::Scanning {
                    *state = BarcodeState::Initialized;
                }
            }
            if events.send(event).is_err() {
                debug!("Barcode event receiver dropped");
            }
        }))?;

        let started = self
            .send(SystemSignal::ScanInit)
            .and_then(|()| self.send(SystemSignal::SetScanMode(ScanMode::Broadcast)));
        if let Err(e) = started {
            warn!("Barcode scanner init failed: {}", e);
            if let Err(e) = self.source.unsubscribe() {
                warn!("Failed to unregister barcode receiver: {}", e);
            }
            return Err(e);
        }

        *lock(&self.state) = BarcodeState::Initialized;
        info!("Barcode scanner initialized");
        Ok(())
    }

    /// Trigger one scan; the result arrives on the event channel.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` unless initialized.
    pub fn start_scan(&mut self) -> Result<()> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }
        self.send(SystemSignal::ScanCommand)?;
        *lock(&self.state) = BarcodeState::Scanning;
        debug!("Barcode scan started");
        Ok(())
    }

    /// Abort the scan in flight. Succeeds in every state.
    pub fn stop_scan(&mut self) -> Result<()> {
        if let Err(e) = self.send(SystemSignal::StopScan) {
            warn!("Failed to stop barcode scan: {}", e);
        }
        let mut state = lock(&self.state);
        if *state == BarcodeState::Scanning {
            *state = BarcodeState::Initialized;
        }
        debug!("Barcode scan stopped");
        Ok(())
    }

    /// Hand the scanner back to focus-input mode and power it down.
    ///
    /// Idempotent. Signal and unregistration failures are logged.
    pub fn close(&mut self) -> Result<()> {
        if self.state() == BarcodeState::Closed {
            return Ok(());
        }

        for signal in [
            SystemSignal::SetScanMode(ScanMode::FocusInput),
            SystemSignal::CloseScan,
        ] {
            if let Err(e) = self.send(signal) {
                warn!("Barcode close signal failed: {}", e);
            }
        }
        if let Err(e) = self.source.unsubscribe() {
            warn!("Failed to unregister barcode receiver: {}", e);
        }

        *lock(&self.state) = BarcodeState::Closed;
        info!("Barcode scanner closed");
        Ok(())
    }

    /// Select the delivery mode: 0 broadcast, 1 focus input.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for any other value.
    pub fn set_scan_mode(&mut self, mode: u8) -> Result<ScanMode> {
        let mode = ScanMode::from_u8(mode)?;
        self.send(SystemSignal::SetScanMode(mode))?;
        Ok(mode)
    }

    /// Set the scan timeout; only whole seconds from 1 s to 10 s are
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for any other value.
    pub fn set_timeout(&mut self, timeout_ms: u32) -> Result<BarcodeTimeout> {
        let timeout = BarcodeTimeout::new(timeout_ms)?;
        self.send(SystemSignal::ScanTimeout(timeout.as_millis()))?;
        Ok(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uhf_hardware::mock::{MockBarcodeSource, MockNotifierHandle, MockSignalBus};

    type Session = BarcodeSession<MockBarcodeSource, MockSignalBus>;

    fn session() -> (
        Session,
        mpsc::UnboundedReceiver<BarcodeEvent>,
        MockNotifierHandle<BarcodeScan>,
        MockSignalBus,
    ) {
        let (source, scanner) = MockBarcodeSource::new();
        let bus = MockSignalBus::new();
        let (session, events) = BarcodeSession::new(source, bus.clone());
        (session, events, scanner, bus)
    }

    #[test]
    fn test_init_sends_init_and_broadcast_mode() {
        let (mut session, _events, scanner, bus) = session();
        session.init().unwrap();

        assert_eq!(session.state(), BarcodeState::Initialized);
        assert!(scanner.is_subscribed());
        assert_eq!(
            bus.sent(),
            vec![
                SystemSignal::ScanInit,
                SystemSignal::SetScanMode(ScanMode::Broadcast)
            ]
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        let (mut session, _events, scanner, bus) = session();
        session.init().unwrap();
        session.init().unwrap();

        assert_eq!(scanner.subscribe_count(), 1);
        assert_eq!(bus.sent().len(), 2);
    }

    #[test]
    fn test_init_refused_registration() {
        let (mut session, _events, scanner, bus) = session();
        scanner.refuse_subscribe(true);

        assert!(session.init().is_err());
        assert_eq!(session.state(), BarcodeState::Uninitialized);
        assert!(bus.sent().is_empty());
    }

    #[test]
    fn test_start_scan_requires_init() {
        let (mut session, _events, _scanner, bus) = session();
        assert_eq!(session.start_scan(), Err(Error::NotInitialized));
        assert!(bus.sent().is_empty());
    }

    #[test]
    fn test_result_returns_to_initialized() {
        let (mut session, mut events, scanner, bus) = session();
        session.init().unwrap();
        session.start_scan().unwrap();
        assert_eq!(session.state(), BarcodeState::Scanning);
        assert_eq!(bus.actions().last(), Some(&"com.rfid.SCAN_CMD"));

        assert!(scanner.scan(b"4006381333931".to_vec()));
        assert_eq!(session.state(), BarcodeState::Initialized);

        let event = events.try_recv().unwrap();
        assert_eq!(event.barcode, "4006381333931");
        assert_eq!(event.length, 13);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_stop_scan_always_succeeds() {
        let (mut session, _events, _scanner, bus) = session();
        assert!(session.stop_scan().is_ok());
        assert_eq!(session.state(), BarcodeState::Uninitialized);
        assert_eq!(bus.sent(), vec![SystemSignal::StopScan]);
    }

    #[test]
    fn test_close_restores_focus_mode() {
        let (mut session, _events, scanner, bus) = session();
        session.init().unwrap();
        bus.clear();

        session.close().unwrap();
        assert_eq!(session.state(), BarcodeState::Closed);
        assert!(!scanner.is_subscribed());
        assert_eq!(
            bus.sent(),
            vec![
                SystemSignal::SetScanMode(ScanMode::FocusInput),
                SystemSignal::CloseScan
            ]
        );

        session.close().unwrap();
        assert_eq!(bus.sent().len(), 2);
    }

    #[rstest]
    #[case(0, ScanMode::Broadcast)]
    #[case(1, ScanMode::FocusInput)]
    fn test_set_scan_mode(#[case] value: u8, #[case] expected: ScanMode) {
        let (mut session, _events, _scanner, bus) = session();
        assert_eq!(session.set_scan_mode(value).unwrap(), expected);
        assert_eq!(bus.sent(), vec![SystemSignal::SetScanMode(expected)]);
    }

    #[test]
    fn test_set_scan_mode_rejects_unknown() {
        let (mut session, _events, _scanner, bus) = session();
        assert_eq!(session.set_scan_mode(2).unwrap_err().code(), "INVALID_PARAMETER");
        assert!(bus.sent().is_empty());
    }

    #[rstest]
    #[case(1000, true)]
    #[case(5000, true)]
    #[case(10000, true)]
    #[case(0, false)]
    #[case(1500, false)]
    #[case(11000, false)]
    fn test_set_timeout(#[case] timeout_ms: u32, #[case] accepted: bool) {
        let (mut session, _events, _scanner, bus) = session();
        let result = session.set_timeout(timeout_ms);

        assert_eq!(result.is_ok(), accepted);
        if accepted {
            assert_eq!(
                bus.sent(),
                vec![SystemSignal::ScanTimeout(timeout_ms as u16)]
            );
        } else {
            assert!(bus.sent().is_empty());
        }
    }
}
