//! Configuration for the curation core

use serde::{Deserialize, Serialize};

use crate::storage::{DEFAULT_LEADERBOARD_LIMIT, DEFAULT_PAGE_LIMIT};
use crate::types::NewUser;

/// Curation core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Bootstrap admin seed record
    pub bootstrap: BootstrapConfig,

    /// Pagination defaults
    pub pagination: PaginationConfig,

    /// Actor configuration
    pub actor: ActorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "curation-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            bootstrap: BootstrapConfig::default(),
            pagination: PaginationConfig::default(),
            actor: ActorConfig::default(),
        }
    }
}

/// Bootstrap admin seed record
///
/// Created as admin in a single atomic call when the registry opens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Admin username
    pub username: String,

    /// Admin credential (opaque)
    pub password: String,

    /// Admin wallet identifier
    pub near_wallet: String,

    /// Admin public key / address
    pub near_address: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            near_wallet: "admin.near".to_string(),
            near_address: "0x123456789".to_string(),
        }
    }
}

impl BootstrapConfig {
    /// Build the creation payload for the seed record
    pub fn seed_user(&self) -> NewUser {
        NewUser {
            username: self.username.clone(),
            password: self.password.clone(),
            near_wallet: self.near_wallet.clone(),
            near_address: self.near_address.clone(),
        }
    }
}

/// Pagination defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Default page size for content listing
    pub default_limit: usize,

    /// Default number of leaderboard rows
    pub leaderboard_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

/// Actor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Mailbox capacity (bounded channel for backpressure)
    pub mailbox_capacity: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1024,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(username) = std::env::var("CURATION_BOOTSTRAP_USERNAME") {
            config.bootstrap.username = username;
        }

        if let Ok(wallet) = std::env::var("CURATION_BOOTSTRAP_WALLET") {
            config.bootstrap.near_wallet = wallet;
        }

        if let Ok(limit) = std::env::var("CURATION_PAGE_LIMIT") {
            config.pagination.default_limit = limit
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid CURATION_PAGE_LIMIT: {}", e)))?;
        }

        Ok(config)
    }
}
