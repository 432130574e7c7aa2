//! Sync configuration.
//!
//! Built-in defaults, overlaid by an optional TOML file, overlaid by
//! environment variables.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use kwcache_core::snapshot::DEFAULT_KEY_PREFIX;
use kwcache_core::{PrefixClassifier, SnapshotKeys};

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub database_path: PathBuf,
    pub resolve_dependencies: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("keywords.db"),
            resolve_dependencies: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub redis_url: String,
    pub ttl_secs: u64,
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            ttl_secs: 3600,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub default: String,
    pub prefixes: BTreeMap<String, String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            default: "A".to_string(),
            prefixes: [("A-", "A"), ("B-", "B"), ("C-", "C")]
                .into_iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        }
    }
}

/// Full configuration of the keyword cache sync.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub sync: ScheduleConfig,
    pub category: CategoryConfig,
}

impl SyncConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `kwcache.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from("kwcache.toml")).filter(|p| p.exists()),
        };

        let mut config = match file {
            Some(p) => {
                let text = std::fs::read_to_string(&p).map_err(|source| ConfigError::Read { path: p.clone(), source })?;
                tracing::debug!(path = %p.display(), "Loaded config file");
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment variables. Unparseable values are ignored with a warning.
    pub fn apply_env(&mut self) {
        if let Ok(path) = env::var("KWCACHE_DATABASE_PATH") {
            self.source.database_path = PathBuf::from(path);
        }
        if let Ok(url) = env::var("REDIS_URL") {
            self.cache.redis_url = url;
        }
        self.cache.ttl_secs = parse_env_or("KWCACHE_TTL_SECS", self.cache.ttl_secs);
        self.sync.interval_secs = parse_env_or("KWCACHE_INTERVAL_SECS", self.sync.interval_secs);
        self.sync.timeout_secs = parse_env_or("KWCACHE_TIMEOUT_SECS", self.sync.timeout_secs);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Invalid("cache.ttl_secs must be greater than 0".to_string()));
        }
        if self.sync.timeout_secs == 0 {
            return Err(ConfigError::Invalid("sync.timeout_secs must be greater than 0".to_string()));
        }
        if self.sync.interval_secs == 0 {
            return Err(ConfigError::Invalid("sync.interval_secs must be greater than 0".to_string()));
        }
        if self.cache.key_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("cache.key_prefix must not be empty".to_string()));
        }
        for (prefix, category) in &self.category.prefixes {
            if category.chars().count() != 1 {
                return Err(ConfigError::Invalid(format!(
                    "category for prefix '{}' must be a single letter, got '{}'",
                    prefix, category
                )));
            }
        }
        if self.category.default.chars().count() != 1 {
            return Err(ConfigError::Invalid(format!(
                "category.default must be a single letter, got '{}'",
                self.category.default
            )));
        }
        Ok(())
    }

    pub fn classifier(&self) -> PrefixClassifier {
        PrefixClassifier::new(self.category.prefixes.clone(), self.category.default.clone())
    }

    pub fn snapshot_keys(&self) -> SnapshotKeys {
        SnapshotKeys::with_prefix(&self.cache.key_prefix)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.sync.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.sync.timeout_secs)
    }
}

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kwcache_core::CategoryClassifier;
    use std::sync::Mutex;

    /// Serializes tests that read or write the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 5] = [
        "KWCACHE_DATABASE_PATH",
        "REDIS_URL",
        "KWCACHE_TTL_SECS",
        "KWCACHE_INTERVAL_SECS",
        "KWCACHE_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cache.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.snapshot_keys(), SnapshotKeys::default());
        assert!(!config.source.resolve_dependencies);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SyncConfig::from_toml(
            r#"
            [cache]
            ttl_secs = 120
            key_prefix = "kw"

            [source]
            resolve_dependencies = true
            "#,
        )
        .unwrap();
        assert_eq!(config.cache.ttl_secs, 120);
        assert_eq!(config.cache.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.snapshot_keys().keywords, "kw:all");
        assert!(config.source.resolve_dependencies);
        assert_eq!(config.sync.timeout_secs, 30);
    }

    #[test]
    fn test_custom_prefixes_drive_classifier() {
        let config = SyncConfig::from_toml(
            r#"
            [category]
            default = "C"

            [category.prefixes]
            "core/" = "A"
            "ext/" = "B"
            "#,
        )
        .unwrap();
        let classifier = config.classifier();
        assert_eq!(classifier.classify("core/storage"), "A");
        assert_eq!(classifier.classify("ext/plugins"), "B");
        assert_eq!(classifier.classify("A-core"), "C");
    }

    #[test]
    fn test_validation_rejects_zero_ttl_and_long_letters() {
        let mut config = SyncConfig::default();
        config.cache.ttl_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SyncConfig::default();
        config.category.prefixes.insert("X-".to_string(), "XY".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kwcache.toml");
        std::fs::write(&path, "[sync]\ninterval_secs = 60\n").unwrap();

        let config = SyncConfig::load(Some(&path)).unwrap();
        assert_eq!(config.sync.interval_secs, 60);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let err = SyncConfig::load(Some(Path::new("/nonexistent/kwcache.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        assert!(matches!(SyncConfig::from_toml("[cache\nttl = "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kwcache.toml");
        std::fs::write(&path, "[cache]\nttl_secs = 120\n\n[sync]\ninterval_secs = 60\n").unwrap();

        env::set_var("KWCACHE_DATABASE_PATH", "/var/lib/kwcache/kw.db");
        env::set_var("REDIS_URL", "redis://cache.internal:6380");
        env::set_var("KWCACHE_TTL_SECS", "900");
        env::set_var("KWCACHE_TIMEOUT_SECS", "12");
        let config = SyncConfig::load(Some(&path));
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.source.database_path, PathBuf::from("/var/lib/kwcache/kw.db"));
        assert_eq!(config.cache.redis_url, "redis://cache.internal:6380");
        assert_eq!(config.cache.ttl_secs, 900);
        assert_eq!(config.sync.timeout_secs, 12);
        // Not overridden: file value stays
        assert_eq!(config.sync.interval_secs, 60);
    }

    #[test]
    fn test_unparseable_env_value_keeps_previous_setting() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let mut config = SyncConfig::from_toml("[sync]\ninterval_secs = 45\n").unwrap();

        env::set_var("KWCACHE_INTERVAL_SECS", "soon");
        env::set_var("KWCACHE_TTL_SECS", "-5");
        config.apply_env();
        clear_env();

        assert_eq!(config.sync.interval_secs, 45);
        assert_eq!(config.cache.ttl_secs, 3600);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_env_or() {
        env::set_var("KWCACHE_TEST_PARSE_GOOD", "42");
        env::set_var("KWCACHE_TEST_PARSE_BAD", "forty-two");
        assert_eq!(parse_env_or("KWCACHE_TEST_PARSE_GOOD", 7u64), 42);
        assert_eq!(parse_env_or("KWCACHE_TEST_PARSE_BAD", 7u64), 7);
        assert_eq!(parse_env_or("KWCACHE_TEST_PARSE_UNSET", 7u64), 7);
        env::remove_var("KWCACHE_TEST_PARSE_GOOD");
        env::remove_var("KWCACHE_TEST_PARSE_BAD");
    }
}
