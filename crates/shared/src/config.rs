//! Application configuration management.

use std::path::PathBuf;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger behaviour.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Durable snapshot storage.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// IANA timezone used to stamp the display date and time of new entries.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Whether the bulk reset command is reachable over HTTP.
    #[serde(default)]
    pub allow_reset: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            allow_reset: false,
        }
    }
}

fn default_timezone() -> String {
    "Asia/Manila".to_string()
}

impl LedgerConfig {
    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA timezone.
    pub fn tz(&self) -> Result<Tz, config::ConfigError> {
        Tz::from_str(&self.timezone).map_err(|_| {
            config::ConfigError::Message(format!("unknown timezone: {}", self.timezone))
        })
    }
}

/// Snapshot storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible bucket (AWS S3, Cloudflare R2, Supabase).
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// Process memory; state is lost on exit.
    Memory,
}

impl StorageProvider {
    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

impl Default for StorageProvider {
    fn default() -> Self {
        Self::local_fs("./data")
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Where the snapshot document lives.
    #[serde(default)]
    pub provider: StorageProvider,
    /// Key of the snapshot document inside the provider.
    #[serde(default = "default_snapshot_key")]
    pub snapshot_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            snapshot_key: default_snapshot_key(),
        }
    }
}

fn default_snapshot_key() -> String {
    "ledgers/state.json".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Reads a `.env` file first when one is present.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PITAKA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ledger.timezone, "Asia/Manila");
        assert!(!config.ledger.allow_reset);
        assert_eq!(config.storage.snapshot_key, "ledgers/state.json");
        assert_eq!(config.storage.provider.name(), "local");
    }

    #[test]
    fn test_timezone_parsing() {
        let config = LedgerConfig::default();
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Manila);

        let bad = LedgerConfig {
            timezone: "Mars/Olympus".to_string(),
            allow_reset: false,
        };
        assert!(bad.tz().is_err());
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("PITAKA__SERVER__PORT", Some("9090")),
                ("PITAKA__LEDGER__ALLOW_RESET", Some("true")),
                ("PITAKA__STORAGE__PROVIDER__TYPE", Some("memory")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert!(config.ledger.allow_reset);
                assert_eq!(config.storage.provider, StorageProvider::Memory);
            },
        );
    }

    #[test]
    fn test_provider_deserializes_from_tag() {
        let provider: StorageProvider =
            serde_json::from_str(r#"{"type":"local_fs","root":"/var/lib/pitaka"}"#).unwrap();
        assert_eq!(provider, StorageProvider::local_fs("/var/lib/pitaka"));
    }
}
