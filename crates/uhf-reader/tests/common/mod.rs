//! Shared fixtures for reader integration tests.
//!
//! Sessions are built against the mock module with a short poll interval so
//! flows settle quickly.

#![allow(dead_code)]

use std::time::Duration;
use tokio::sync::mpsc;
use uhf_hardware::RawTag;
use uhf_hardware::mock::{MockUhf, MockUhfHandle};
use uhf_reader::{InventoryEvent, ReaderConfig, ReaderSession};

/// Window in which a stopped session must stay silent.
pub const SILENCE_WINDOW: Duration = Duration::from_millis(100);

pub fn fast_config() -> ReaderConfig {
    ReaderConfig {
        poll_interval_ms: 5,
        ..ReaderConfig::default()
    }
}

pub fn tag(epc: &[u8], rssi: i32) -> RawTag {
    RawTag::new(epc.to_vec(), rssi)
}

pub fn session() -> (
    ReaderSession<MockUhf>,
    mpsc::Receiver<InventoryEvent>,
    MockUhfHandle,
) {
    let (connector, module) = MockUhf::new();
    let (session, events) = ReaderSession::new(connector, fast_config()).unwrap();
    (session, events, module)
}

/// An initialized session with its call log cleared.
pub async fn ready_session() -> (
    ReaderSession<MockUhf>,
    mpsc::Receiver<InventoryEvent>,
    MockUhfHandle,
) {
    let (mut session, events, module) = session();
    let response = session.init().await;
    assert!(response.success, "init failed: {}", response.message);
    module.clear_calls();
    (session, events, module)
}

/// Discard everything already queued.
pub fn drain(events: &mut mpsc::Receiver<InventoryEvent>) -> usize {
    let mut drained = 0;
    while events.try_recv().is_ok() {
        drained += 1;
    }
    drained
}

/// Assert that no event arrives within [`SILENCE_WINDOW`].
pub async fn assert_silent(events: &mut mpsc::Receiver<InventoryEvent>) {
    match tokio::time::timeout(SILENCE_WINDOW, events.recv()).await {
        Err(_) | Ok(None) => {}
        Ok(Some(event)) => panic!("unexpected event after stop: {event:?}"),
    }
}
