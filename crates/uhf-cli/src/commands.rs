//! Subcommand handlers.
//!
//! Every command runs the real session controllers against the mock
//! hardware from `uhf-hardware`, printing results as JSON lines on stdout.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};
use uhf_hardware::RawTag;
use uhf_hardware::devices::AnyUhfConnector;
use uhf_hardware::mock::{MockBarcodeSource, MockKeySource, MockSignalBus, MockUhf};
use uhf_protocol::codec;
use uhf_reader::response::InventoryEntry;
use uhf_reader::{
    BarcodeSession, ButtonConfig, ButtonController, InventoryEvent, ReaderConfig, ReaderSession,
    TagReport,
};

/// Default signal strength reported for simulated tags.
const SIMULATED_RSSI: i32 = -55;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn field(tags: &[String]) -> Result<Vec<RawTag>> {
    tags.iter()
        .map(|epc| {
            let bytes = codec::decode_epc(epc).with_context(|| format!("invalid EPC {epc:?}"))?;
            Ok(RawTag::new(bytes, SIMULATED_RSSI))
        })
        .collect()
}

/// Simulated module with `tags` in its field.
fn connector(tags: &[String]) -> Result<AnyUhfConnector> {
    let (connector, module) = MockUhf::new();
    module.set_field(field(tags)?);
    Ok(AnyUhfConnector::Mock(connector))
}

async fn ready_session(
    config: ReaderConfig,
    tags: &[String],
) -> Result<(
    ReaderSession<AnyUhfConnector>,
    tokio::sync::mpsc::Receiver<InventoryEvent>,
)> {
    let (mut session, events) = ReaderSession::new(connector(tags)?, config)?;
    let response = session.init().await;
    print_json(&response)?;
    if !response.success {
        bail!(response.message);
    }
    Ok((session, events))
}

pub async fn scan(
    config: ReaderConfig,
    tags: &[String],
    duration: Duration,
    power: Option<i32>,
    region: Option<&str>,
) -> Result<()> {
    let (mut session, mut events) = ready_session(config, tags).await?;

    if let Some(power) = power {
        session.set_power(power, power).await?;
    }
    if let Some(region) = region {
        let code = session.set_region(region).await?;
        info!("Region set to {:?}", code);
    }

    session.start_inventory().await?;
    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    let mut reads = 0usize;
    loop {
        tokio::select! {
            () = &mut deadline => break,
            event = events.recv() => match event {
                Some(InventoryEvent::TagRead(tag)) => {
                    reads += 1;
                    print_json(&TagReport::from(&tag))?;
                }
                Some(InventoryEvent::Error { code, message }) => {
                    warn!("Inventory error {}: {}", code, message);
                }
                Some(_) => {}
                None => break,
            },
        }
    }

    session.stop_inventory().await?;
    session.close().await?;
    info!("Inventory finished with {} reads", reads);
    Ok(())
}

pub async fn once(config: ReaderConfig, tags: &[String], timeout_ms: u16) -> Result<()> {
    let (mut session, _events) = ready_session(config, tags).await?;

    let seen = session.inventory_once(Some(timeout_ms)).await?;
    let entries: Vec<InventoryEntry> = seen.iter().map(InventoryEntry::from).collect();
    print_json(&entries)?;

    session.close().await?;
    Ok(())
}

pub fn barcode(data: &str, timeout_ms: Option<u32>) -> Result<()> {
    let (source, scanner) = MockBarcodeSource::new();
    let (mut session, mut barcodes) = BarcodeSession::new(source, MockSignalBus::new());

    session.init()?;
    if let Some(timeout_ms) = timeout_ms {
        session.set_timeout(timeout_ms)?;
    }
    session.start_scan()?;

    if !scanner.scan(data.as_bytes().to_vec()) {
        warn!("Barcode receiver is not registered");
    }
    while let Ok(event) = barcodes.try_recv() {
        print_json(&event)?;
    }

    session.close()?;
    Ok(())
}

pub async fn button(config: ReaderConfig, key: u16, presses: usize) -> Result<()> {
    let (mut session, _events) = ready_session(config, &[]).await?;
    let (source, keys) = MockKeySource::new();
    let (mut button, mut buttons) =
        ButtonController::new(source, MockSignalBus::new(), ButtonConfig::default())?;
    let mut pressed = button.attach()?;

    for _ in 0..presses {
        keys.press(key);
        while let Ok(event) = pressed.try_recv() {
            button.on_physical_key(&mut session, event).await;
        }
        while let Ok(event) = buttons.try_recv() {
            print_json(&event)?;
        }
    }

    if session.is_reading() {
        session.stop_inventory().await?;
    }
    button.detach();
    session.close().await?;
    Ok(())
}
