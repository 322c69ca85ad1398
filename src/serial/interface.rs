use std::io::{Read, Write};
use std::time::{Duration, Instant};
use async_trait::async_trait;
use serialport::{DataBits, FlowControl, SerialPort};

use super::{Result, SerialError, TransportConfig};

/// Interval between `bytes_to_read` polls while waiting for input
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Byte-level channel a decoder talks through.
///
/// `read` returns `Ok(0)` when the read timeout elapses with nothing
/// received; that is flow control, not an error.
#[async_trait]
pub trait Transport: Send {
    /// Port identifier this transport was opened on
    fn name(&self) -> &str;

    async fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    async fn write(&mut self, data: &[u8]) -> Result<usize>;

    fn close(&mut self);
}

/// `serialport`-backed transport
pub struct SerialInterface {
    port_name: String,
    port: Option<Box<dyn SerialPort>>,
    read_timeout: Duration,
}

impl SerialInterface {
    /// Open `port_name` with the given line settings
    pub fn open(port_name: &str, config: &TransportConfig) -> Result<Self> {
        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(config.parity.into())
            .stop_bits(config.stop_bits.try_into()?)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| SerialError::ConnectionFailed(e.to_string()))?;

        log::info!(
            "Opened {} at {} baud ({:?} parity, {:?} stop bits)",
            port_name,
            config.baud_rate,
            config.parity,
            config.stop_bits
        );

        Ok(Self {
            port_name: port_name.to_string(),
            port: Some(port),
            read_timeout: config.read_timeout,
        })
    }

    /// Open and erase the concrete type, for `Device::connect_with`
    pub fn open_boxed(port_name: &str, config: &TransportConfig) -> Result<Box<dyn Transport>> {
        Ok(Box::new(Self::open(port_name, config)?))
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

#[async_trait]
impl Transport for SerialInterface {
    fn name(&self) -> &str {
        &self.port_name
    }

    async fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(SerialError::NotConnected)?;
        let deadline = Instant::now() + self.read_timeout;

        loop {
            match port.bytes_to_read()? {
                0 if Instant::now() >= deadline => return Ok(0),
                0 => tokio::time::sleep(POLL_INTERVAL).await,
                _ => {
                    return match port.read(buffer) {
                        Ok(bytes_read) => Ok(bytes_read),
                        Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
                        Err(e) => Err(SerialError::IoError(e)),
                    };
                }
            }
        }
    }

    async fn write(&mut self, data: &[u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(SerialError::NotConnected)?;

        let bytes_written = port.write(data)?;
        port.flush()?;

        Ok(bytes_written)
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            log::info!("Closed {}", self.port_name);
        }
    }
}

impl Drop for SerialInterface {
    fn drop(&mut self) {
        self.close();
    }
}
