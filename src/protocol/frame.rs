use crate::serial::{Result, SerialError, Transport};

/// Two-byte sequence ending every CAS and Keli frame
pub const TERMINATOR: [u8; 2] = [0x0D, 0x0A];

/// Fixed request payload plus the number of response bytes to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFrame {
    pub request: &'static [u8],
    pub response_len: usize,
}

/// Read a single byte. `None` means the read timed out.
pub async fn read_byte(transport: &mut dyn Transport) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    match transport.read(&mut buf).await? {
        0 => Ok(None),
        _ => Ok(Some(buf[0])),
    }
}

/// Write the whole payload in one call; a partial write is a transport failure
pub async fn write_frame(transport: &mut dyn Transport, data: &[u8]) -> Result<()> {
    let written = transport.write(data).await?;
    if written != data.len() {
        return Err(SerialError::ShortWrite {
            written,
            expected: data.len(),
        });
    }
    Ok(())
}

/// Collect bytes one at a time until `len` have arrived or a read times out.
/// The returned buffer may be shorter than `len`.
pub async fn read_up_to(transport: &mut dyn Transport, len: usize) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(len);
    while data.len() < len {
        match read_byte(transport).await? {
            Some(byte) => data.push(byte),
            None => break,
        }
    }
    Ok(data)
}

/// Send `frame.request` once, then collect up to `frame.response_len` bytes
pub async fn exchange(transport: &mut dyn Transport, frame: &RequestFrame) -> Result<Vec<u8>> {
    write_frame(transport, frame.request).await?;
    let response = read_up_to(transport, frame.response_len).await?;
    log::debug!(
        "{}: sent {} got {} ({} of {} bytes)",
        transport.name(),
        hex::encode(frame.request),
        hex::encode(&response),
        response.len(),
        frame.response_len
    );
    Ok(response)
}

/// Render frame bytes as display text with every CR LF pair removed
pub fn strip_terminator(data: &[u8]) -> String {
    String::from_utf8_lossy(data).replace("\r\n", "")
}

/// Terminator search state of a stream decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    SeekingTerminator,
    Collecting,
    Complete,
}

/// Finds the end of the frame in flight, then collects the next one.
///
/// Bytes seen before the terminator belong to a frame whose start was
/// missed and are dropped.
#[derive(Debug)]
pub struct TerminatedFrameCollector {
    state: FrameState,
    window: [Option<u8>; 2],
    frame_len: usize,
    data: Vec<u8>,
}

impl TerminatedFrameCollector {
    /// Collection completes once more than `frame_len` bytes are buffered
    pub fn new(frame_len: usize) -> Self {
        Self {
            state: FrameState::SeekingTerminator,
            window: [None, None],
            frame_len,
            data: Vec::with_capacity(frame_len + 1),
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn push(&mut self, byte: u8) -> FrameState {
        match self.state {
            FrameState::SeekingTerminator => {
                self.window = [self.window[1], Some(byte)];
                if self.window == [Some(TERMINATOR[0]), Some(TERMINATOR[1])] {
                    self.state = FrameState::Collecting;
                }
            }
            FrameState::Collecting => {
                self.data.push(byte);
                if self.data.len() > self.frame_len {
                    self.state = FrameState::Complete;
                }
            }
            FrameState::Complete => {}
        }
        self.state
    }

    /// The collected frame, only once complete
    pub fn into_frame(self) -> Option<Vec<u8>> {
        match self.state {
            FrameState::Complete => Some(self.data),
            _ => None,
        }
    }

    /// Whatever was collected after the terminator, complete or not
    pub fn into_collected(self) -> Vec<u8> {
        self.data
    }
}
