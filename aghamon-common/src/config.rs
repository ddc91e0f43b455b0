//! Configuration types for the Aghamon dashboard

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Main dashboard configuration
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AghamonConfig {
    /// AdGuard Home connection settings
    #[serde(default)]
    pub adguard: AdguardConfig,
}

/// Connection settings for the AdGuard Home instance
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AdguardConfig {
    /// Base URL of the AdGuard Home instance (no trailing slash)
    #[serde(default)]
    pub server_url: String,

    /// Username for basic authentication
    #[serde(default)]
    pub username: String,

    /// Password for basic authentication
    #[serde(default)]
    pub password: String,
}

// Credentials must never leak into logs, so Debug redacts the password.
impl fmt::Debug for AdguardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdguardConfig")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for AghamonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AghamonConfig")
            .field("adguard", &self.adguard)
            .finish()
    }
}

impl AghamonConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        config.adguard.server_url = config.adguard.server_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Check that all required fields are present and non-empty
    fn validate(&self) -> Result<(), ConfigError> {
        if self.adguard.server_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "adguard.server_url is required".to_string(),
            ));
        }
        if self.adguard.username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "adguard.username is required".to_string(),
            ));
        }
        if self.adguard.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "adguard.password is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
