#![allow(dead_code)]
use sak_toolbox_lib::device::Device;
use sak_toolbox_lib::protocol::DeviceKind;
use sak_toolbox_lib::serial::ScriptedTransport;

/// A device of `kind` connected through `transport`
pub fn connected(kind: DeviceKind, transport: &ScriptedTransport) -> Device {
    let mut device = Device::with_settings("TEST0", kind);
    device
        .connect_with(|_, _| Ok(transport.boxed()))
        .expect("scripted connect cannot fail");
    device
}

/// A 22-byte CAS weight frame showing `weight` (5 chars, e.g. "12.34")
pub fn cas_frame(weight: &str) -> Vec<u8> {
    let mut frame = b"ST,GS,\x01\xBC,   ".to_vec();
    frame.extend_from_slice(weight.as_bytes());
    frame.extend_from_slice(b" kg\r\n");
    assert_eq!(frame.len(), 22);
    frame
}

/// Display text of a CAS frame
pub fn cas_text(frame: &[u8]) -> String {
    String::from_utf8_lossy(&frame[..frame.len() - 2]).into_owned()
}
