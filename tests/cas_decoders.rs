mod common;

use sak_toolbox_lib::device::DeviceError;
use sak_toolbox_lib::protocol::{cas, DeviceKind};
use sak_toolbox_lib::serial::ScriptedTransport;

#[tokio::test]
async fn test_stream_skips_frame_in_progress() {
    let first = common::cas_frame("12.34");
    let second = common::cas_frame("56.78");
    let transport = ScriptedTransport::new("TEST0");
    transport.push_bytes(&first).push_bytes(&second);
    let mut device = common::connected(DeviceKind::ScaleCas, &transport);

    let reading = device.process().await.unwrap();
    assert_eq!(reading, common::cas_text(&second));
    assert!(reading.contains("56.78"));
    assert!(!reading.contains("12.34"));
    assert_eq!(transport.pending_reads(), 0);
}

#[tokio::test]
async fn test_stream_attached_mid_frame() {
    let first = common::cas_frame("12.34");
    let second = common::cas_frame("00.50");
    let third = common::cas_frame("99.99");
    let transport = ScriptedTransport::new("TEST0");
    transport
        .push_bytes(&first[9..])
        .push_bytes(&second)
        .push_bytes(&third);
    let mut device = common::connected(DeviceKind::ScaleCas, &transport);

    assert_eq!(device.process().await.unwrap(), common::cas_text(&second));
    // The terminator of `second` was consumed with it, so the search restarts
    // and the next frame's tail is skipped.
    assert_eq!(device.process().await.unwrap(), "");
}

#[tokio::test]
async fn test_stream_never_writes() {
    let transport = ScriptedTransport::new("TEST0");
    transport.push_bytes(&common::cas_frame("12.34")).push_bytes(&common::cas_frame("12.35"));
    let mut device = common::connected(DeviceKind::ScaleCas, &transport);

    device.process().await.unwrap();
    assert!(transport.writes().is_empty());
}

#[tokio::test]
async fn test_stream_timeout_before_terminator_is_empty() {
    let transport = ScriptedTransport::new("TEST0");
    transport.push_bytes(b"ST,GS,").push_timeout();
    let mut device = common::connected(DeviceKind::ScaleCas, &transport);

    assert_eq!(device.process().await.unwrap(), "");
    assert_eq!(device.last_error(), None);
}

#[tokio::test]
async fn test_stream_back_to_back_short_frames() {
    let first = b"ST,GS,\x01\xBC,  12.34 kg\r\n";
    let second = b"ST,GS,\x01\xBC,  56.78 kg\r\n";
    assert_eq!(first.len(), 21);
    let transport = ScriptedTransport::new("TEST0");
    transport.push_bytes(first).push_bytes(second);
    let mut device = common::connected(DeviceKind::ScaleCas, &transport);

    let reading = device.process().await.unwrap();
    assert_eq!(reading, common::cas_text(second));
    assert!(!reading.contains("12.34"));
    assert_eq!(device.last_error(), None);
}

#[tokio::test]
async fn test_stream_timeout_mid_frame_returns_collected_bytes() {
    let frame = common::cas_frame("12.34");
    let transport = ScriptedTransport::new("TEST0");
    transport
        .push_bytes(b"4 kg\r\n")
        .push_bytes(&frame[..10])
        .push_timeout()
        .push_bytes(&frame[10..]);
    let mut device = common::connected(DeviceKind::ScaleCas, &transport);

    assert_eq!(device.process().await.unwrap(), String::from_utf8_lossy(&frame[..10]));
    assert_eq!(transport.pending_reads(), 1);
}

#[tokio::test]
async fn test_stream_read_error() {
    let transport = ScriptedTransport::new("TEST0");
    transport.push_bytes(b"\r\nST").push_read_error("framing error");
    let mut device = common::connected(DeviceKind::ScaleCas, &transport);

    assert!(matches!(device.process().await, Err(DeviceError::SerialError(_))));
    assert!(device.last_error().is_some());
}

#[tokio::test]
async fn test_request_sends_d_once_per_call() {
    let frame = common::cas_frame("03.21");
    let transport = ScriptedTransport::new("TEST0");
    transport.push_bytes(&frame).push_bytes(&frame);
    let mut device = common::connected(DeviceKind::ScaleCasRequest, &transport);

    assert_eq!(device.process().await.unwrap(), common::cas_text(&frame));
    assert_eq!(transport.writes(), vec![b"D".to_vec()]);

    device.process().await.unwrap();
    assert_eq!(transport.writes(), vec![b"D".to_vec(), b"D".to_vec()]);
    assert_eq!(cas::WEIGHT_REQUEST.response_len, 22);
}

#[tokio::test]
async fn test_request_reads_at_most_one_frame() {
    let frame = common::cas_frame("03.21");
    let transport = ScriptedTransport::new("TEST0");
    transport.push_bytes(&frame).push_bytes(b"extra");
    let mut device = common::connected(DeviceKind::ScaleCasRequest, &transport);

    device.process().await.unwrap();
    assert_eq!(transport.pending_reads(), 1);
}

#[tokio::test]
async fn test_request_partial_reply_is_returned() {
    let transport = ScriptedTransport::new("TEST0");
    transport.push_bytes(b"ST,GS,").push_timeout();
    let mut device = common::connected(DeviceKind::ScaleCasRequest, &transport);

    assert_eq!(device.process().await.unwrap(), "ST,GS,");
}

#[tokio::test]
async fn test_request_no_reply_is_empty() {
    let transport = ScriptedTransport::new("TEST0");
    let mut device = common::connected(DeviceKind::ScaleCasRequest, &transport);

    assert_eq!(device.process().await.unwrap(), "");
    assert_eq!(transport.writes().len(), 1);
}

#[tokio::test]
async fn test_request_write_failure() {
    let transport = ScriptedTransport::new("TEST0");
    transport.fail_writes("port removed").push_bytes(&common::cas_frame("03.21"));
    let mut device = common::connected(DeviceKind::ScaleCasRequest, &transport);

    assert!(device.process().await.is_err());
    assert_eq!(device.last_error(), Some("IO error: port removed"));
    assert_eq!(transport.pending_reads(), 1);
}
