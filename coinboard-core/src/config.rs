//! Dashboard configuration — TOML file with `[api]`, `[cache]`, `[refresh]`
//! and `[defaults]` sections.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration. Lookup order for binaries: explicit `--config` path, then
//! `{config_dir}/coinboard/config.toml`, then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::data::coingecko::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::data::DEFAULT_TTL;
use crate::domain::{Currency, QueryError, QueryParams, SortField, DEFAULT_COUNT};
use crate::refresh::DEFAULT_INTERVAL;

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "COINBOARD_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid [defaults]: {0}")]
    Query(#[from] QueryError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            api_key: None,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL.as_secs(),
        }
    }
}

/// Initial controls for a fresh session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub currency: Currency,
    pub count: u32,
    pub sort: SortField,
    pub filter: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            count: DEFAULT_COUNT,
            sort: SortField::default(),
            filter: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub refresh: RefreshConfig,
    pub defaults: DefaultsConfig,
}

impl DashboardConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs must be > 0".into()));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Invalid("cache.ttl_secs must be > 0".into()));
        }
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh.interval_secs must be > 0".into(),
            ));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url is empty".into()));
        }
        self.default_query()?;
        Ok(())
    }

    /// Query parameters a new session starts from.
    pub fn default_query(&self) -> Result<QueryParams, ConfigError> {
        let d = &self.defaults;
        Ok(QueryParams::new(d.currency, d.count, d.sort, d.filter.clone())?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            debug!("api key taken from {API_KEY_ENV}");
            self.api.api_key = Some(key);
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs)
    }
}

/// `{config_dir}/coinboard`, if the platform has a config directory.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("coinboard"))
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Resolve, read, env-override, and validate the effective configuration.
///
/// An explicit path must exist. The default path is optional.
pub fn load(explicit: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    let mut config = match explicit {
        Some(path) => DashboardConfig::from_file(path)?,
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                DashboardConfig::from_file(&path)?
            }
            None => DashboardConfig::default(),
        },
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = DashboardConfig::from_toml("").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.ttl(), Duration::from_secs(30));
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(30));
        assert_eq!(cfg.api.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.default_query().unwrap(), QueryParams::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = DashboardConfig::from_toml(
            r#"
            [cache]
            ttl_secs = 60

            [defaults]
            currency = "eur"
            sort = "total_volume"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ttl(), Duration::from_secs(60));
        assert_eq!(cfg.refresh.interval_secs, 30);
        let q = cfg.default_query().unwrap();
        assert_eq!(q.currency, Currency::Eur);
        assert_eq!(q.sort_field, SortField::TotalVolume);
        assert_eq!(q.count, DEFAULT_COUNT);
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = DashboardConfig::default();
        cfg.defaults.filter = "bit".into();
        cfg.api.api_key = Some("k".into());
        let text = cfg.to_toml().unwrap();
        assert_eq!(DashboardConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn validation_rejects_zero_durations_and_bad_count() {
        let mut cfg = DashboardConfig::default();
        cfg.cache.ttl_secs = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = DashboardConfig::default();
        cfg.refresh.interval_secs = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = DashboardConfig::default();
        cfg.api.timeout_secs = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = DashboardConfig::default();
        cfg.defaults.count = 50;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Query(QueryError::CountOutOfRange { count: 50 }))
        ));
    }

    #[test]
    fn unknown_currency_is_parse_error() {
        let err = DashboardConfig::from_toml("[defaults]\ncurrency = \"gbp\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_override_sets_api_key() {
        let mut cfg = DashboardConfig::default();
        cfg.apply_env_from(|name| (name == API_KEY_ENV).then(|| "secret".to_string()));
        assert_eq!(cfg.api.api_key.as_deref(), Some("secret"));

        let mut cfg = DashboardConfig::default();
        cfg.apply_env_from(|_| Some("  ".to_string()));
        assert_eq!(cfg.api.api_key, None);
    }

    #[test]
    fn loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[refresh]\ninterval_secs = 15").unwrap();

        let cfg = load(Some(file.path())).unwrap();
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(15));
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
