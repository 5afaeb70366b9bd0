//! Application configuration.
//!
//! Stored as TOML. Every field has a default, so an empty or partial file is
//! valid and a missing default-location file simply means "all defaults".
//!
//! ```toml
//! [provider]
//! api_key = "demo"
//! base_url = "https://www.alphavantage.co"
//! timeout_secs = 30
//! # fixture_dir = "tests/fixtures"
//!
//! [game]
//! # seed = 42
//! min_age_days = 7
//! max_age_days = 100
//! lookback_days = 7
//!
//! [log]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::game::RoundRules;

/// Environment variable that overrides `provider.api_key`.
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_API_KEY: &str = "demo";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub game: GameConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Serve `{SYMBOL}.json` files from this directory instead of the network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture_dir: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            fixture_dir: None,
        }
    }
}

impl ProviderConfig {
    /// The key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{visible}", "*".repeat(chars.len() - 4))
    }

    pub fn uses_demo_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed master seed for reproducible start days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub min_age_days: u32,
    pub max_age_days: u32,
    pub lookback_days: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        let rules = RoundRules::default();
        Self {
            seed: None,
            min_age_days: rules.min_age_days,
            max_age_days: rules.max_age_days,
            lookback_days: rules.lookback_days,
        }
    }
}

impl GameConfig {
    pub fn rules(&self) -> RoundRules {
        RoundRules {
            min_age_days: self.min_age_days,
            max_age_days: self.max_age_days,
            lookback_days: self.lookback_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// `<config_dir>/updown/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("updown").join("config.toml"))
    }

    /// Resolve configuration: an explicit path must exist; otherwise the
    /// default location is used when present, else built-in defaults.
    /// Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply environment overrides through `lookup`. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = key.trim().to_string();
        }
    }
}
