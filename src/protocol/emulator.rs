//! Emulation of a CAS scale, for testing software that reads one.
use std::time::Duration;
use rand::Rng;

use super::frame;
use crate::serial::{Result, Transport};

/// Pause after each emulated frame
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

pub const FRAME_LEN: usize = 22;

/// Positions of the random weight digits, as in `   12.34 kg`
pub const DIGIT_OFFSETS: [usize; 4] = [12, 13, 15, 16];

const FRAME_TEMPLATE: [u8; FRAME_LEN] = [
    b'S', b'T', b',', b'N', b'T', b',', 0x01, 0xBC, b',', b' ', b' ', b' ',
    b'0', b'0', b'.', b'0', b'0', b' ', b'k', b'g', 0x0D, 0x0A,
];

/// Byte a CAS host sends to request a weight
pub const REQUEST_BYTE: u8 = b'D';

/// Build a CAS weight frame with digits drawn uniformly from '0'..='8'
pub fn build_cas_frame() -> [u8; FRAME_LEN] {
    let mut rng = rand::thread_rng();
    let mut frame = FRAME_TEMPLATE;
    for offset in DIGIT_OFFSETS {
        frame[offset] = b'0' + rng.gen_range(0..9u8);
    }
    frame
}

/// Transmit one random weight frame, then wait out the settle delay
pub async fn send_cas_frame(transport: &mut dyn Transport) -> Result<String> {
    let cas_frame = build_cas_frame();
    frame::write_frame(transport, &cas_frame).await?;
    tokio::time::sleep(SETTLE_DELAY).await;
    Ok(frame::strip_terminator(&cas_frame))
}

/// Wait for a request byte and answer it with one frame. Other bytes are
/// skipped; a timeout before any request yields an empty reading.
pub async fn answer_cas_request(transport: &mut dyn Transport) -> Result<String> {
    while let Some(byte) = frame::read_byte(transport).await? {
        if byte == REQUEST_BYTE {
            return send_cas_frame(transport).await;
        }
        log::trace!("{}: ignoring byte {:#04x}", transport.name(), byte);
    }
    Ok(String::new())
}
