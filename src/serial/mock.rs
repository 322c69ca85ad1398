//! In-memory transport for driving decoders without hardware.
//! Exposed unconditionally so integration tests and demos can use it.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;

use super::{Result, SerialError, Transport};

/// One scripted outcome of a `read` call
#[derive(Debug, Clone)]
pub enum ReadStep {
    /// Bytes available; handed out across as many reads as the caller's buffer needs
    Data(Vec<u8>),
    /// Read timeout with nothing received
    Timeout,
    /// Transport failure
    Error(String),
}

#[derive(Debug, Default)]
struct ScriptState {
    reads: VecDeque<ReadStep>,
    writes: Vec<Vec<u8>>,
    loopback: bool,
    corrupt_echo_at: Option<usize>,
    write_error: Option<String>,
    write_limit: Option<usize>,
    closed: bool,
}

/// Scripted transport. Clones share state, so a test can keep one clone
/// for inspection after handing the other to a `Device`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    name: String,
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTransport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Arc::default(),
        }
    }

    /// Every written byte becomes readable, like an Rx-Tx dongle
    pub fn loopback(name: &str) -> Self {
        let transport = Self::new(name);
        transport.state().loopback = true;
        transport
    }

    /// Queue a chunk of incoming bytes
    pub fn push_bytes(&self, bytes: &[u8]) -> &Self {
        self.state().reads.push_back(ReadStep::Data(bytes.to_vec()));
        self
    }

    /// Queue one byte per read call
    pub fn push_bytes_split(&self, bytes: &[u8]) -> &Self {
        let mut state = self.state();
        for byte in bytes {
            state.reads.push_back(ReadStep::Data(vec![*byte]));
        }
        drop(state);
        self
    }

    pub fn push_timeout(&self) -> &Self {
        self.state().reads.push_back(ReadStep::Timeout);
        self
    }

    pub fn push_read_error(&self, message: &str) -> &Self {
        self.state().reads.push_back(ReadStep::Error(message.to_string()));
        self
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self, message: &str) -> &Self {
        self.state().write_error = Some(message.to_string());
        self
    }

    /// Accept at most `limit` bytes per write
    pub fn limit_writes(&self, limit: usize) -> &Self {
        self.state().write_limit = Some(limit);
        self
    }

    /// Flip the bits of the looped-back byte at `index` of the next write
    pub fn corrupt_echo_at(&self, index: usize) -> &Self {
        self.state().corrupt_echo_at = Some(index);
        self
    }

    /// Everything written so far, one entry per `write` call
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state().writes.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    pub fn pending_reads(&self) -> usize {
        self.state().reads.len()
    }

    pub fn boxed(&self) -> Box<dyn Transport> {
        Box::new(self.clone())
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        // A panicking test thread is the only way to poison this lock
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut state = self.state();
        if state.closed {
            return Err(SerialError::NotConnected);
        }

        match state.reads.pop_front() {
            None | Some(ReadStep::Timeout) => Ok(0),
            Some(ReadStep::Error(message)) => Err(SerialError::IoError(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                message,
            ))),
            Some(ReadStep::Data(mut bytes)) => {
                let count = bytes.len().min(buffer.len());
                buffer[..count].copy_from_slice(&bytes[..count]);
                if count < bytes.len() {
                    let rest = bytes.split_off(count);
                    state.reads.push_front(ReadStep::Data(rest));
                }
                Ok(count)
            }
        }
    }

    async fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut state = self.state();
        if state.closed {
            return Err(SerialError::NotConnected);
        }
        if let Some(message) = state.write_error.clone() {
            return Err(SerialError::IoError(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                message,
            )));
        }

        let accepted = state.write_limit.map_or(data.len(), |limit| limit.min(data.len()));
        let written = data[..accepted].to_vec();
        state.writes.push(written.clone());

        if state.loopback {
            let mut echo = written;
            if let Some(index) = state.corrupt_echo_at.take() {
                if let Some(byte) = echo.get_mut(index) {
                    *byte = !*byte;
                }
            }
            state.reads.push_back(ReadStep::Data(echo));
        }

        Ok(accepted)
    }

    fn close(&mut self) {
        self.state().closed = true;
    }
}
