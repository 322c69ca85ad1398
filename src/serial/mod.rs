pub mod config;
pub mod interface;
pub mod mock;

pub use config::{Parity, StopBits, TransportConfig, READ_TIMEOUT};
pub use interface::{SerialInterface, Transport};
pub use mock::{ReadStep, ScriptedTransport};

#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Port not open")]
    NotConnected,

    #[error("Unsupported port setting: {0}")]
    Unsupported(String),

    #[error("Short write: {written} of {expected} bytes accepted by the port")]
    ShortWrite { written: usize, expected: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialport error: {0}")]
    SerialportError(#[from] serialport::Error),
}

pub type Result<T> = std::result::Result<T, SerialError>;

/// Names of the serial ports currently visible to the OS.
///
/// Enumeration failures are logged and reported as an empty list, so an
/// empty result means "none found", not "no hardware attached".
pub fn list_available_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            log::warn!("Port enumeration failed: {}", e);
            Vec::new()
        }
    }
}
