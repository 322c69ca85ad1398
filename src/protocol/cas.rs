//! CAS scale protocol.
//!
//! Weight frames are 22 bytes of ASCII ending in CR LF, e.g.
//! `ST,GS,\x01\xbc,   12.34 kg\r\n`. In continuous mode the scale pushes
//! them back to back; in request mode it sends one after receiving `D`.
use super::frame::{self, FrameState, RequestFrame, TerminatedFrameCollector};
use crate::serial::{Result, Transport};

/// Bytes collected after a terminator; collection stops once exceeded
const STREAM_FRAME_LEN: usize = 21;

pub const WEIGHT_REQUEST: RequestFrame = RequestFrame {
    request: b"D",
    response_len: 22,
};

/// Read one frame from a continuously transmitting scale.
///
/// The first, possibly partial, frame is skipped by waiting for its
/// terminator. A timeout before any terminator yields an empty reading; a
/// timeout after it returns the bytes collected so far. The search restarts
/// from scratch on the next call.
pub async fn read_stream_weight(transport: &mut dyn Transport) -> Result<String> {
    let mut collector = TerminatedFrameCollector::new(STREAM_FRAME_LEN);

    while collector.state() != FrameState::Complete {
        match frame::read_byte(transport).await? {
            Some(byte) => {
                collector.push(byte);
            }
            None if collector.state() == FrameState::SeekingTerminator => {
                log::debug!("{}: timed out before a terminator", transport.name());
                return Ok(String::new());
            }
            None => break,
        }
    }

    let data = collector.into_collected();
    log::debug!("{}: CAS frame {}", transport.name(), hex::encode(&data));
    Ok(frame::strip_terminator(&data))
}

/// Request and read one weight frame
pub async fn request_weight(transport: &mut dyn Transport) -> Result<String> {
    let data = frame::exchange(transport, &WEIGHT_REQUEST).await?;
    Ok(frame::strip_terminator(&data))
}
