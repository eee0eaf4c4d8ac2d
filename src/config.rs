use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::IpamError;
use crate::network_config::{AddressFamilies, NetworkConfig};

/// Default IPv4 overlay pool
pub const DEFAULT_IPV4_POOL: &str = "10.99.97.0/24";
/// Default IPv6 overlay pool
pub const DEFAULT_IPV6_POOL: &str = "fd00::10:97:0/112";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Top-level configuration that mirrors the YAML file
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub network: NetworkSettings,
}

/// General process settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

/// Overlay address pools
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NetworkSettings {
    /// IPv4 pool in CIDR notation (e.g., "10.99.97.0/24")
    pub ipv4_pool: String,
    /// IPv6 pool in CIDR notation (e.g., "fd00::10:97:0/112")
    pub ipv6_pool: String,
    /// Route IPv4 through the overlay
    pub ipv4_enabled: bool,
    /// Route IPv6 through the overlay
    pub ipv6_enabled: bool,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let level = self.general.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ValidationError::InvalidGeneral(format!(
                "log_level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.general.log_level
            )));
        }

        let network = &self.network;
        if network.ipv4_pool.trim().is_empty() {
            return Err(ValidationError::InvalidNetwork("ipv4_pool cannot be empty".to_string()));
        }
        if network.ipv6_pool.trim().is_empty() {
            return Err(ValidationError::InvalidNetwork("ipv6_pool cannot be empty".to_string()));
        }
        if !network.ipv4_enabled && !network.ipv6_enabled {
            return Err(ValidationError::InvalidNetwork(
                "at least one of ipv4_enabled or ipv6_enabled must be true".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the overlay network configuration from the configured pools
    pub fn network_config(&self) -> Result<NetworkConfig, IpamError> {
        NetworkConfig::new(&self.network.ipv4_pool, &self.network.ipv6_pool)
    }

    /// Log filter for the configured level, `info` when it does not parse
    pub fn log_level_filter(&self) -> LevelFilter {
        self.general.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Address families routed through the overlay
    pub fn address_families(&self) -> AddressFamilies {
        AddressFamilies {
            ipv4: self.network.ipv4_enabled,
            ipv6: self.network.ipv6_enabled,
        }
    }
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            ipv4_pool: DEFAULT_IPV4_POOL.to_string(),
            ipv6_pool: DEFAULT_IPV6_POOL.to_string(),
            ipv4_enabled: true,
            ipv6_enabled: true,
        }
    }
}
