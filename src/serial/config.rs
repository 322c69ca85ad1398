use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Read timeout applied to every port, regardless of device kind
pub const READ_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    None,
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopBits {
    One,
    OneAndHalf,
    Two,
}

/// Line settings for one serial session. Derived from the device kind,
/// never edited by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub baud_rate: u32,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub read_timeout: Duration,
}

impl TransportConfig {
    /// 8 data bits, no parity, one stop bit
    pub const fn new_8n1(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            parity: Parity::None,
            stop_bits: StopBits::One,
            read_timeout: READ_TIMEOUT,
        }
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

impl TryFrom<StopBits> for serialport::StopBits {
    type Error = super::SerialError;

    fn try_from(stop_bits: StopBits) -> Result<Self, Self::Error> {
        match stop_bits {
            StopBits::One => Ok(serialport::StopBits::One),
            StopBits::Two => Ok(serialport::StopBits::Two),
            StopBits::OneAndHalf => Err(super::SerialError::Unsupported(
                "1.5 stop bits".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_8n1_uses_fixed_read_timeout() {
        let config = TransportConfig::new_8n1(57600);
        assert_eq!(config.baud_rate, 57600);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.read_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_one_and_half_stop_bits_rejected() {
        let result: Result<serialport::StopBits, _> = StopBits::OneAndHalf.try_into();
        assert!(result.is_err());
        let result: Result<serialport::StopBits, _> = StopBits::Two.try_into();
        assert!(matches!(result, Ok(serialport::StopBits::Two)));
    }
}
