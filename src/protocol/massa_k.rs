//! Massa-K binary request protocol.
//!
//! The request is the 8-byte "get mass" command; the reply starts with the
//! same three header bytes and carries the mass as a little-endian u32 at
//! offset 6 of a 14-byte frame.
use super::frame::{self, RequestFrame};
use crate::serial::{Result, Transport};

pub const HEADER: [u8; 3] = [0xF8, 0x55, 0xCE];

pub const WEIGHT_REQUEST: RequestFrame = RequestFrame {
    request: &[0xF8, 0x55, 0xCE, 0x01, 0x00, 0xA0, 0xA0, 0x00],
    response_len: 14,
};

const WEIGHT_OFFSET: usize = 6;

/// Reading reported when the header matches but the frame is short
pub const OVERLOAD: &str = "Overload";

pub async fn request_weight(transport: &mut dyn Transport) -> Result<String> {
    let data = frame::exchange(transport, &WEIGHT_REQUEST).await?;
    Ok(decode_weight(&data))
}

/// Turn a reply into display text. A foreign or empty reply decodes to an
/// empty string; a short reply with a valid header is an overload.
pub fn decode_weight(data: &[u8]) -> String {
    if !data.starts_with(&HEADER) {
        return String::new();
    }
    if data.len() != WEIGHT_REQUEST.response_len {
        return OVERLOAD.to_string();
    }

    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[WEIGHT_OFFSET..WEIGHT_OFFSET + 4]);
    u32::from_le_bytes(raw).to_string()
}
