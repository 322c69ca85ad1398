//! Keli scale request protocol: STX 'A' ETX asks for the current weight,
//! the scale answers with a 16-byte ASCII frame ending in CR LF.
use super::frame::{self, RequestFrame};
use crate::serial::{Result, Transport};

const STX: u8 = 0x02;
const ETX: u8 = 0x03;

pub const WEIGHT_REQUEST: RequestFrame = RequestFrame {
    request: &[STX, b'A', ETX],
    response_len: 16,
};

pub async fn request_weight(transport: &mut dyn Transport) -> Result<String> {
    let data = frame::exchange(transport, &WEIGHT_REQUEST).await?;
    Ok(frame::strip_terminator(&data))
}
