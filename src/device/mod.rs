pub mod manager;
pub mod models;

pub use manager::{run_session, SessionSummary};
pub use models::*;

/// Diagnostic recorded when a connected device has no decoder bound
pub const NO_DECODER_MESSAGE: &str = "No handler is implemented for this device";

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device already connected")]
    AlreadyConnected,

    #[error("Invalid device configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{}", NO_DECODER_MESSAGE)]
    DecoderNotBound,

    #[error("Serial communication error: {0}")]
    SerialError(#[from] crate::serial::SerialError),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
