use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::ProfileDefaults;
use crate::models::{City, Gender};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub reference: ReferenceSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CacheSettings {
    /// Empty or absent disables the Redis tier
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl CacheSettings {
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_legal_min_age")]
    pub legal_min_age: i32,
    #[serde(default = "default_age_min")]
    pub default_age_min: i32,
    #[serde(default = "default_age_max")]
    pub default_age_max: i32,
    #[serde(default = "default_registration_age_spread")]
    pub registration_age_spread: i32,
    /// Whether a dislike removes the target from future candidate lists
    #[serde(default = "default_exclude_disliked")]
    pub exclude_disliked: bool,
    pub default_limit: Option<u16>,
    pub max_limit: Option<u16>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            legal_min_age: default_legal_min_age(),
            default_age_min: default_age_min(),
            default_age_max: default_age_max(),
            registration_age_spread: default_registration_age_spread(),
            exclude_disliked: default_exclude_disliked(),
            default_limit: None,
            max_limit: None,
        }
    }
}

impl MatchingSettings {
    pub fn profile_defaults(&self) -> ProfileDefaults {
        ProfileDefaults {
            legal_min_age: self.legal_min_age,
            default_age_min: self.default_age_min,
            default_age_max: self.default_age_max,
            registration_age_spread: self.registration_age_spread,
        }
    }
}

fn default_legal_min_age() -> i32 { 18 }
fn default_age_min() -> i32 { 18 }
fn default_age_max() -> i32 { 60 }
fn default_registration_age_spread() -> i32 { 3 }
fn default_exclude_disliked() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Reference rows seeded into the memory backend
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ReferenceSettings {
    #[serde(default)]
    pub genders: Vec<Gender>,
    #[serde(default)]
    pub cities: Vec<City>,
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LOVOCCO__)
    /// 5. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LOVOCCO__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LOVOCCO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_database_url(settings, std::env::var("DATABASE_URL").ok())?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LOVOCCO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// The conventional DATABASE_URL wins over the configured `database.url`
fn apply_database_url(settings: Config, database_url: Option<String>) -> Result<Config, ConfigError> {
    match database_url {
        Some(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        None => Ok(settings),
    }
}
