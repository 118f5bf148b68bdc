use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::config::BridgeConfig;
use crate::mapping::HighlightMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    pub host: String,
    pub port: u16,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8008,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UserSettings {
    endpoint: EndpointSettings,
    highlight_mode: HighlightMode,
}

/// Operator preferences that survive restarts: the core endpoint override
/// and the preferred highlight mode.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn endpoint(&self) -> EndpointSettings {
        self.data.read().unwrap().endpoint.clone()
    }

    pub fn highlight_mode(&self) -> HighlightMode {
        self.data.read().unwrap().highlight_mode
    }

    pub fn update_endpoint(&self, endpoint: EndpointSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.endpoint = endpoint;
        self.persist(&guard)
    }

    pub fn update_highlight_mode(&self, mode: HighlightMode) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.highlight_mode = mode;
        self.persist(&guard)
    }

    /// Bridge configuration with the stored endpoint applied over the
    /// defaults.
    pub fn bridge_config(&self) -> BridgeConfig {
        let endpoint = self.endpoint();
        BridgeConfig {
            host: endpoint.host,
            port: endpoint.port,
            ..BridgeConfig::default()
        }
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
