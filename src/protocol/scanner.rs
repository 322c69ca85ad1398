use crate::serial::{Result, Transport};

const SCAN_BUFFER_SIZE: usize = 128;

/// Return whatever the scanner has sent, verbatim. One read call, no line
/// splitting; a timeout yields an empty string.
pub async fn read_scan(transport: &mut dyn Transport) -> Result<String> {
    let mut buf = [0u8; SCAN_BUFFER_SIZE];
    let bytes_read = transport.read(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf[..bytes_read]).into_owned())
}
