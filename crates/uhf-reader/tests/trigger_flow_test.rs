//! Physical trigger flows: key notifications from the mock key source drive
//! inventory on a mock reader through the button controller.

mod common;

use uhf_core::{KeyAction, ReaderState};
use uhf_hardware::SystemSignal;
use uhf_hardware::mock::{MockKeySource, MockSignalBus};
use uhf_reader::{ButtonConfig, ButtonController, ButtonEvent};

#[tokio::test]
async fn test_press_toggles_inventory() {
    let (mut session, mut tags, module) = common::ready_session().await;
    module.set_field(vec![common::tag(&[0xE2, 0x00, 0x00, 0x42], -52)]);

    let (source, keys) = MockKeySource::new();
    let (mut button, mut buttons) =
        ButtonController::new(source, MockSignalBus::new(), ButtonConfig::default()).unwrap();
    let mut pressed = button.attach().unwrap();

    // First press: Ready -> Scanning.
    assert!(keys.press(134));
    while let Ok(key) = pressed.try_recv() {
        button.on_physical_key(&mut session, key).await;
    }
    assert_eq!(session.state(), ReaderState::Scanning);
    assert_eq!(
        buttons.try_recv().unwrap(),
        ButtonEvent {
            key_code: 134,
            action: KeyAction::Down,
            is_reading: false,
        }
    );
    assert_eq!(
        buttons.try_recv().unwrap(),
        ButtonEvent {
            key_code: 134,
            action: KeyAction::Up,
            is_reading: true,
        }
    );
    assert!(tags.recv().await.unwrap().tag().is_some());

    // Second press: Scanning -> Ready.
    assert!(keys.press(134));
    while let Ok(key) = pressed.try_recv() {
        button.on_physical_key(&mut session, key).await;
    }
    assert_eq!(session.state(), ReaderState::Ready);

    let down = buttons.try_recv().unwrap();
    let up = buttons.try_recv().unwrap();
    assert!(down.is_reading);
    assert!(!up.is_reading);

    common::drain(&mut tags);
    common::assert_silent(&mut tags).await;
}

#[tokio::test]
async fn test_trigger_and_caller_share_state() {
    let (mut session, _tags, _module) = common::ready_session().await;
    let (source, _keys) = MockKeySource::new();
    let (mut button, _buttons) =
        ButtonController::new(source, MockSignalBus::new(), ButtonConfig::default()).unwrap();

    session.start_inventory().await.unwrap();

    let event = button
        .on_physical_key(&mut session, uhf_hardware::KeyEvent::up(133))
        .await
        .unwrap();
    assert!(!event.is_reading);
    assert_eq!(session.state(), ReaderState::Ready);
}

#[tokio::test]
async fn test_custom_trigger_keys() {
    let (mut session, _tags, _module) = common::ready_session().await;
    let (source, _keys) = MockKeySource::new();
    let config = ButtonConfig {
        trigger_keys: vec![293],
        suppressed_scan_keys: Vec::new(),
        ..ButtonConfig::default()
    };
    let (mut button, _buttons) =
        ButtonController::new(source, MockSignalBus::new(), config).unwrap();

    assert!(
        button
            .on_physical_key(&mut session, uhf_hardware::KeyEvent::up(134))
            .await
            .is_none()
    );
    button
        .on_physical_key(&mut session, uhf_hardware::KeyEvent::up(293))
        .await
        .unwrap();
    assert!(session.is_reading());

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_attach_detach_signals() {
    let (source, keys) = MockKeySource::new();
    let bus = MockSignalBus::new();
    let (mut button, _buttons) =
        ButtonController::new(source, bus.clone(), ButtonConfig::default()).unwrap();

    let _pressed = button.attach().unwrap();
    drop(button);

    assert!(!keys.is_subscribed());
    assert_eq!(
        bus.sent(),
        vec![
            SystemSignal::KeySet {
                keys: vec![134, 137],
                enabled: false
            },
            SystemSignal::KeySet {
                keys: vec![134, 137],
                enabled: true
            },
        ]
    );
}
