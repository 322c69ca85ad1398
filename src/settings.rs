use std::path::Path;
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::protocol::DeviceKind;

/// Application settings, read from an optional JSON file and overridden
/// by command line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub port: Option<String>,
    pub device: DeviceKind,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            port: None,
            device: DeviceKind::Scanner,
            log_level: "info".to_string(),
        }
    }
}

impl AppSettings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply values given on the command line
    pub fn merge(
        mut self,
        port: Option<String>,
        device: Option<DeviceKind>,
        log_level: Option<String>,
    ) -> Self {
        if port.is_some() {
            self.port = port;
        }
        if let Some(device) = device {
            self.device = device;
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        self
    }
}
