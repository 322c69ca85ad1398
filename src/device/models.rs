use chrono::{DateTime, Utc};

use super::{DeviceError, Result, NO_DECODER_MESSAGE};
use crate::protocol::{self, Decoder, DeviceKind};
use crate::serial::{self, SerialInterface, Transport, TransportConfig};

/// A serial session with one peripheral.
///
/// The device owns its transport exclusively. The decoder is always the
/// one `protocol::resolve` picks for `kind`, and both are bound and
/// released together.
pub struct Device {
    port_name: String,
    kind: Option<DeviceKind>,
    last_error: Option<String>,
    transport: Option<Box<dyn Transport>>,
    decoder: Option<Decoder>,
    transport_config: Option<TransportConfig>,
    connected_at: Option<DateTime<Utc>>,
}

impl Device {
    pub fn new() -> Self {
        Self {
            port_name: String::new(),
            kind: None,
            last_error: None,
            transport: None,
            decoder: None,
            transport_config: None,
            connected_at: None,
        }
    }

    pub fn with_settings(port_name: &str, kind: DeviceKind) -> Self {
        let mut device = Self::new();
        device.port_name = port_name.to_string();
        device.kind = Some(kind);
        device
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn kind(&self) -> Option<DeviceKind> {
        self.kind
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    pub fn decoder(&self) -> Option<Decoder> {
        self.decoder
    }

    /// Line settings of the open session
    pub fn transport_config(&self) -> Option<&TransportConfig> {
        self.transport_config.as_ref()
    }

    pub fn connected_at(&self) -> Option<DateTime<Utc>> {
        self.connected_at
    }

    pub fn set_port(&mut self, port_name: &str) -> Result<()> {
        if self.is_connected() {
            return Err(DeviceError::AlreadyConnected);
        }
        self.port_name = port_name.to_string();
        Ok(())
    }

    /// Change the protocol. Only allowed between sessions.
    pub fn set_kind(&mut self, kind: DeviceKind) -> Result<()> {
        if self.is_connected() {
            return Err(DeviceError::AlreadyConnected);
        }
        self.kind = Some(kind);
        Ok(())
    }

    /// Open the serial port with the settings `kind` requires
    pub fn connect(&mut self) -> Result<()> {
        self.connect_with(SerialInterface::open_boxed)
    }

    /// Like `connect`, with the transport opened by `open`
    pub fn connect_with<F>(&mut self, open: F) -> Result<()>
    where
        F: FnOnce(&str, &TransportConfig) -> serial::Result<Box<dyn Transport>>,
    {
        if self.is_connected() {
            return Err(DeviceError::AlreadyConnected);
        }
        let kind = match self.kind {
            Some(kind) if !self.port_name.is_empty() => kind,
            Some(_) => return Err(self.invalid_configuration("no port selected")),
            None => return Err(self.invalid_configuration("no device type selected")),
        };

        let (config, decoder) = protocol::resolve(kind);

        log::info!("Connecting to {} as {:?}", self.port_name, kind);
        match open(&self.port_name, &config) {
            Ok(transport) => {
                self.transport = Some(transport);
                self.decoder = Some(decoder);
                self.transport_config = Some(config);
                self.connected_at = Some(Utc::now());
                log::info!("Connected to {} ({} baud)", self.port_name, config.baud_rate);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", self.port_name, e);
                self.last_error = Some(e.to_string());
                Err(DeviceError::SerialError(e))
            }
        }
    }

    fn invalid_configuration(&mut self, reason: &str) -> DeviceError {
        let error = DeviceError::InvalidConfiguration(reason.to_string());
        log::error!("Cannot connect to '{}': {}", self.port_name, error);
        self.last_error = Some(error.to_string());
        error
    }

    /// Close the port. Does nothing when not connected.
    pub fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            self.decoder = None;
            self.transport_config = None;
            self.connected_at = None;
            log::info!("Disconnected from {}", self.port_name);
        }
    }

    /// Run one unit of protocol work.
    ///
    /// Returns an empty string when disconnected or when nothing was ready.
    /// After an error the caller should disconnect.
    pub async fn process(&mut self) -> Result<String> {
        let Some(transport) = self.transport.as_mut() else {
            return Ok(String::new());
        };
        let Some(decoder) = self.decoder else {
            self.last_error = Some(NO_DECODER_MESSAGE.to_string());
            return Err(DeviceError::DecoderNotBound);
        };

        match decoder.process(&mut **transport).await {
            Ok(reading) => Ok(reading),
            Err(e) => {
                log::error!("{}: {}", self.port_name, e);
                self.last_error = Some(e.to_string());
                Err(DeviceError::SerialError(e))
            }
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("port_name", &self.port_name)
            .field("kind", &self.kind)
            .field("last_error", &self.last_error)
            .field("connected", &self.is_connected())
            .field("decoder", &self.decoder)
            .finish()
    }
}
