mod common;

use std::cell::Cell;
use sak_toolbox_lib::device::{Device, DeviceError};
use sak_toolbox_lib::protocol::{Decoder, DeviceKind};
use sak_toolbox_lib::serial::{ScriptedTransport, SerialError};

#[test]
fn test_disconnect_never_connected_is_noop() {
    let mut device = Device::new();
    device.disconnect();
    device.disconnect();
    assert!(!device.is_connected());
    assert_eq!(device.last_error(), None);
    assert_eq!(device.kind(), None);
}

#[tokio::test]
async fn test_process_when_disconnected_is_empty() {
    let mut device = Device::with_settings("TEST0", DeviceKind::ScaleCas);
    for _ in 0..3 {
        assert_eq!(device.process().await.unwrap(), "");
    }
    assert_eq!(device.last_error(), None);
}

#[test]
fn test_connect_binds_decoder_for_kind() {
    let transport = ScriptedTransport::new("TEST0");
    let device = common::connected(DeviceKind::ScaleMassaKRequest, &transport);
    assert!(device.is_connected());
    assert_eq!(device.decoder(), Some(Decoder::MassaKRequest));
    assert_eq!(device.transport_config().map(|c| c.baud_rate), Some(57600));
    assert!(device.connected_at().is_some());
}

#[test]
fn test_opener_receives_port_and_resolved_config() {
    let seen_baud = Cell::new(0);
    let mut device = Device::with_settings("/dev/ttyS7", DeviceKind::ScaleMassaKRequest);
    device
        .connect_with(|port, config| {
            assert_eq!(port, "/dev/ttyS7");
            seen_baud.set(config.baud_rate);
            Ok(ScriptedTransport::new(port).boxed())
        })
        .unwrap();
    assert_eq!(seen_baud.get(), 57600);
}

#[test]
fn test_open_failure_records_last_error() {
    let mut device = Device::with_settings("COM99", DeviceKind::Scanner);
    let result =
        device.connect_with(|_, _| Err(SerialError::ConnectionFailed("port busy".to_string())));

    assert!(matches!(result, Err(DeviceError::SerialError(_))));
    assert!(!device.is_connected());
    assert_eq!(device.decoder(), None);
    assert_eq!(device.last_error(), Some("Connection failed: port busy"));
}

#[test]
fn test_connect_requires_port_and_kind() {
    let mut device = Device::new();
    let result = device.connect_with(|_, _| Ok(ScriptedTransport::new("x").boxed()));
    assert!(matches!(result, Err(DeviceError::InvalidConfiguration(_))));
    assert_eq!(
        device.last_error(),
        Some("Invalid device configuration: no device type selected")
    );

    device.set_kind(DeviceKind::Scanner).unwrap();
    let result = device.connect_with(|_, _| Ok(ScriptedTransport::new("x").boxed()));
    assert!(matches!(result, Err(DeviceError::InvalidConfiguration(_))));
    assert_eq!(
        device.last_error(),
        Some("Invalid device configuration: no port selected")
    );
    assert!(!device.is_connected());
}

#[test]
fn test_connect_twice_is_rejected() {
    let transport = ScriptedTransport::new("TEST0");
    let mut device = common::connected(DeviceKind::Scanner, &transport);

    let result = device.connect_with(|_, _| Ok(ScriptedTransport::new("other").boxed()));
    assert!(matches!(result, Err(DeviceError::AlreadyConnected)));
    assert!(device.is_connected());
    assert!(!transport.is_closed());
}

#[test]
fn test_kind_and_port_locked_while_connected() {
    let transport = ScriptedTransport::new("TEST0");
    let mut device = common::connected(DeviceKind::Scanner, &transport);

    assert!(matches!(device.set_kind(DeviceKind::EchoTest), Err(DeviceError::AlreadyConnected)));
    assert!(matches!(device.set_port("COM2"), Err(DeviceError::AlreadyConnected)));
    assert_eq!(device.kind(), Some(DeviceKind::Scanner));
    assert_eq!(device.decoder(), Some(Decoder::ScannerStream));

    device.disconnect();
    device.set_kind(DeviceKind::EchoTest).unwrap();
    assert_eq!(device.kind(), Some(DeviceKind::EchoTest));
}

#[test]
fn test_disconnect_closes_transport_and_unbinds_decoder() {
    let transport = ScriptedTransport::new("TEST0");
    let mut device = common::connected(DeviceKind::ScaleCas, &transport);

    device.disconnect();
    assert!(transport.is_closed());
    assert!(!device.is_connected());
    assert_eq!(device.decoder(), None);
    assert_eq!(device.transport_config(), None);

    device.disconnect();
    assert!(!device.is_connected());
}

#[tokio::test]
async fn test_transport_error_surfaces_and_records_last_error() {
    let transport = ScriptedTransport::new("TEST0");
    transport.push_read_error("cable unplugged");
    let mut device = common::connected(DeviceKind::Scanner, &transport);

    let result = device.process().await;
    assert!(matches!(result, Err(DeviceError::SerialError(SerialError::IoError(_)))));
    assert_eq!(device.last_error(), Some("IO error: cable unplugged"));
}
