//! Configuration loading.
//!
//! A single TOML file with one table per subsystem. Every table and every
//! key is optional:
//!
//! ```toml
//! [log]
//! filter = "info,tourney_auction=debug"
//!
//! [auction]
//! starting_bid = 1000
//! opening_bidder = "Team Alpha"
//! opening_secs = 30
//! extension_secs = 15
//!
//! [auction.tick]
//! tick_rate_hz = 1
//!
//! [store]
//! join_code_len = 6
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tourney_auction::AuctionConfig;
use tourney_identity::IdentityConfig;
use tourney_store::StoreConfig;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Every subsystem's settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TourneyConfig {
    pub log: LogConfig,
    pub identity: IdentityConfig,
    pub store: StoreConfig,
    pub auction: AuctionConfig,
}

impl TourneyConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, Path::new("<inline>"))
    }

    /// Reads, parses, and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        let config = Self::parse(&text, path)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config.validated())
    }

    /// Rejects settings that cannot be clamped into shape.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(opener) = &self.auction.opening_bidder {
            if opener.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: "auction.opening_bidder".into(),
                    message: "must not be empty; omit it to open without a bidder".into(),
                });
            }
            if self.auction.starting_bid == 0 {
                return Err(ConfigError::Validation {
                    field: "auction.starting_bid".into(),
                    message: "must be above 0 when an opening bidder is set".into(),
                });
            }
        }
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "log.filter".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Clamps out-of-range values in every subsystem, with a warning each.
    pub fn validated(mut self) -> Self {
        self.store = self.store.validated();
        self.auction = self.auction.validated();
        self
    }
}
