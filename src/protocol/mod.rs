//! Device protocols: which line settings each device kind needs and how its
//! byte stream turns into readings.
pub mod cas;
pub mod echo;
pub mod emulator;
pub mod frame;
pub mod keli;
pub mod massa_k;
pub mod scanner;

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::serial::{Result, Transport, TransportConfig};

/// Supported device protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    /// Barcode scanner sending self-terminated lines
    Scanner,
    /// CAS scale pushing weight frames continuously
    ScaleCas,
    /// CAS scale answering a "D" request
    ScaleCasRequest,
    /// Keli scale answering an STX 'A' ETX request
    ScaleKeliRequest,
    /// Massa-K scale using the binary request protocol
    ScaleMassaKRequest,
    /// Act as a CAS scale pushing frames continuously
    EmulatorCas,
    /// Act as a CAS scale answering "D" requests
    EmulatorCasRequest,
    /// Loop-back test through an Rx-Tx dongle
    EchoTest,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 8] = [
        DeviceKind::Scanner,
        DeviceKind::ScaleCas,
        DeviceKind::ScaleCasRequest,
        DeviceKind::ScaleKeliRequest,
        DeviceKind::ScaleMassaKRequest,
        DeviceKind::EmulatorCas,
        DeviceKind::EmulatorCasRequest,
        DeviceKind::EchoTest,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::Scanner => "Barcode scanner",
            DeviceKind::ScaleCas => "CAS scale (continuous)",
            DeviceKind::ScaleCasRequest => "CAS scale (by request)",
            DeviceKind::ScaleKeliRequest => "Keli scale (by request)",
            DeviceKind::ScaleMassaKRequest => "Massa-K scale (by request)",
            DeviceKind::EmulatorCas => "CAS scale emulator (continuous)",
            DeviceKind::EmulatorCasRequest => "CAS scale emulator (by request)",
            DeviceKind::EchoTest => "Echo test (Tx-Rx dongle)",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decoding strategy bound to a connected device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    ScannerStream,
    CasStream,
    CasRequest,
    KeliRequest,
    MassaKRequest,
    CasEmulator,
    CasRequestEmulator,
    Echo,
}

impl Decoder {
    /// Perform one unit of protocol work: one scan, one weight reading or
    /// one echo round. An empty string means nothing was ready this call.
    pub async fn process(&self, transport: &mut dyn Transport) -> Result<String> {
        match self {
            Decoder::ScannerStream => scanner::read_scan(transport).await,
            Decoder::CasStream => cas::read_stream_weight(transport).await,
            Decoder::CasRequest => cas::request_weight(transport).await,
            Decoder::KeliRequest => keli::request_weight(transport).await,
            Decoder::MassaKRequest => massa_k::request_weight(transport).await,
            Decoder::CasEmulator => emulator::send_cas_frame(transport).await,
            Decoder::CasRequestEmulator => emulator::answer_cas_request(transport).await,
            Decoder::Echo => echo::run_round(transport).await,
        }
    }
}

/// Line settings and decoder for `kind`
pub fn resolve(kind: DeviceKind) -> (TransportConfig, Decoder) {
    match kind {
        DeviceKind::Scanner => (TransportConfig::new_8n1(9600), Decoder::ScannerStream),
        DeviceKind::ScaleCas => (TransportConfig::new_8n1(9600), Decoder::CasStream),
        DeviceKind::ScaleCasRequest => (TransportConfig::new_8n1(9600), Decoder::CasRequest),
        DeviceKind::ScaleKeliRequest => (TransportConfig::new_8n1(9600), Decoder::KeliRequest),
        DeviceKind::ScaleMassaKRequest => (TransportConfig::new_8n1(57600), Decoder::MassaKRequest),
        DeviceKind::EmulatorCas => (TransportConfig::new_8n1(9600), Decoder::CasEmulator),
        DeviceKind::EmulatorCasRequest => {
            (TransportConfig::new_8n1(9600), Decoder::CasRequestEmulator)
        }
        DeviceKind::EchoTest => (TransportConfig::new_8n1(9600), Decoder::Echo),
    }
}
