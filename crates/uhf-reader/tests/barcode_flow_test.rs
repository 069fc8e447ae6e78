//! Barcode scanner flows against the mock barcode source and signal bus.

use uhf_core::{BarcodeState, ScanMode};
use uhf_hardware::SystemSignal;
use uhf_hardware::mock::{MockBarcodeSource, MockSignalBus};
use uhf_reader::BarcodeSession;

#[test]
fn test_full_scan_cycle() {
    let (source, scanner) = MockBarcodeSource::new();
    let bus = MockSignalBus::new();
    let (mut session, mut barcodes) = BarcodeSession::new(source, bus.clone());

    session.init().unwrap();
    session.set_timeout(3000).unwrap();
    session.start_scan().unwrap();
    assert!(scanner.scan(b"9780201633610".to_vec()));
    session.start_scan().unwrap();
    assert!(scanner.scan(b"ABC-123".to_vec()));
    session.close().unwrap();

    let first = barcodes.try_recv().unwrap();
    let second = barcodes.try_recv().unwrap();
    assert_eq!(first.barcode, "9780201633610");
    assert_eq!(second.barcode, "ABC-123");
    assert_eq!(second.raw_data, "4142432D313233");
    assert!(first.timestamp <= second.timestamp);

    assert_eq!(
        bus.actions(),
        vec![
            "com.rfid.SCAN_INIT",
            "com.rfid.SET_SCAN_MODE",
            "com.rfid.SCAN_TIME",
            "com.rfid.SCAN_CMD",
            "com.rfid.SCAN_CMD",
            "com.rfid.SET_SCAN_MODE",
            "com.rfid.CLOSE_SCAN",
        ]
    );
    assert_eq!(session.state(), BarcodeState::Closed);
    assert!(!scanner.is_subscribed());
}

#[test]
fn test_results_after_close_are_not_delivered() {
    let (source, scanner) = MockBarcodeSource::new();
    let (mut session, mut barcodes) = BarcodeSession::new(source, MockSignalBus::new());

    session.init().unwrap();
    session.close().unwrap();

    assert!(!scanner.scan(b"12345".to_vec()));
    assert!(barcodes.try_recv().is_err());
}

#[test]
fn test_reinit_after_close() {
    let (source, scanner) = MockBarcodeSource::new();
    let bus = MockSignalBus::new();
    let (mut session, mut barcodes) = BarcodeSession::new(source, bus.clone());

    session.init().unwrap();
    session.close().unwrap();
    session.init().unwrap();

    assert!(session.is_initialized());
    assert_eq!(scanner.subscribe_count(), 2);
    assert_eq!(
        bus.sent().last(),
        Some(&SystemSignal::SetScanMode(ScanMode::Broadcast))
    );

    assert!(scanner.scan(b"5901234123457".to_vec()));
    assert_eq!(barcodes.try_recv().unwrap().length, 13);
}

#[test]
fn test_stop_scan_returns_to_initialized() {
    let (source, _scanner) = MockBarcodeSource::new();
    let (mut session, _barcodes) = BarcodeSession::new(source, MockSignalBus::new());

    session.init().unwrap();
    session.start_scan().unwrap();
    session.stop_scan().unwrap();
    assert_eq!(session.state(), BarcodeState::Initialized);
}
