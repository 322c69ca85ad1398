//! Loop-back cable test. Needs a dongle wiring Tx to Rx.
use rand::RngCore;

use super::frame;
use crate::serial::{Result, Transport};

pub const PAYLOAD_SIZE: usize = 128;

pub const PASS: &str = "PASS";
pub const FAIL: &str = "FAIL";

fn random_payload() -> [u8; PAYLOAD_SIZE] {
    let mut payload = [0u8; PAYLOAD_SIZE];
    rand::thread_rng().fill_bytes(&mut payload);
    payload
}

/// Send a random payload and check it comes back unchanged.
///
/// A timeout ends the read early and a short echo is a FAIL. Transport
/// errors propagate instead.
pub async fn run_round(transport: &mut dyn Transport) -> Result<String> {
    let sent = random_payload();
    frame::write_frame(transport, &sent).await?;

    let mut received = [0u8; PAYLOAD_SIZE];
    let mut total_read = 0;
    while total_read < PAYLOAD_SIZE {
        match transport.read(&mut received[total_read..]).await? {
            0 => break,
            n => total_read += n,
        }
    }

    if total_read == PAYLOAD_SIZE && sent == received {
        Ok(PASS.to_string())
    } else {
        log::warn!(
            "{}: echo mismatch, {} of {} bytes received",
            transport.name(),
            total_read,
            PAYLOAD_SIZE
        );
        Ok(FAIL.to_string())
    }
}
