//! TOML engine configuration.
//!
//! Holds storage location, snapshot slot, logging and streak settings.
//! A missing file means defaults; the default file lives at
//! `<data dir>/config.toml`, where the data dir is `HABIT_STREAKS_DATA_DIR`
//! if set, otherwise `<local data dir>/habit-streaks`.

use crate::logging::default_log_level;
use crate::persist::DEFAULT_SNAPSHOT_SLOT;
use crate::service::habit_store::StoreOptions;
use crate::streak::{StreakPolicy, LEGACY_CURRENT_STREAK_CAP};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DATA_DIR_ENV: &str = "HABIT_STREAKS_DATA_DIR";
const DATA_DIR_NAME: &str = "habit-streaks";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration load/save errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "config io error at `{}`: {source}", path.display()),
            Self::Parse(err) => write!(f, "config is not valid TOML: {err}"),
            Self::Serialize(err) => write!(f, "config could not be serialized: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Where snapshots live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the default data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_db_file")]
    pub db_file: String,
    #[serde(default = "default_snapshot_slot")]
    pub snapshot_slot: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute log directory; defaults to `<data dir>/logs`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Current-streak lookback settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakConfig {
    /// When false the current streak counts the whole unbroken run.
    #[serde(default = "default_true")]
    pub cap_current_streak: bool,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

/// Engine configuration, serialized as TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub streak: StreakConfig,
}

fn default_db_file() -> String {
    "habits.sqlite3".to_string()
}
fn default_snapshot_slot() -> String {
    DEFAULT_SNAPSHOT_SLOT.to_string()
}
fn default_level() -> String {
    default_log_level().to_string()
}
fn default_true() -> bool {
    true
}
fn default_lookback_days() -> u32 {
    LEGACY_CURRENT_STREAK_CAP
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_file: default_db_file(),
            snapshot_slot: default_snapshot_slot(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            cap_current_streak: true,
            lookback_days: default_lookback_days(),
        }
    }
}

impl EngineConfig {
    /// Loads config from `path`; a missing file yields defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, is not valid TOML, or
    /// holds out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&content)
    }

    /// Loads config from the default location.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(default_config_path())
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes config to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.snapshot_slot.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.snapshot_slot must not be empty".to_string(),
            ));
        }
        if self.storage.db_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.db_file must not be empty".to_string(),
            ));
        }
        if self.streak.cap_current_streak && self.streak.lookback_days == 0 {
            return Err(ConfigError::Invalid(
                "streak.lookback_days must be >= 1 when the cap is enabled".to_string(),
            ));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.db_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("logs"))
    }

    pub fn streak_policy(&self) -> StreakPolicy {
        if self.streak.cap_current_streak {
            StreakPolicy::capped(self.streak.lookback_days)
        } else {
            StreakPolicy::uncapped()
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            slot: self.storage.snapshot_slot.clone(),
            streak_policy: self.streak_policy(),
        }
    }
}

/// Default data directory (not created).
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    default_data_dir().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};
    use crate::streak::StreakPolicy;
    use std::path::PathBuf;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.storage.snapshot_slot, "notion-habits");
        assert_eq!(config.streak_policy(), StreakPolicy::capped(30));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            [storage]
            data_dir = "/tmp/habits"

            [streak]
            cap_current_streak = false
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/tmp/habits/habits.sqlite3"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/habits/logs"));
        assert_eq!(config.streak_policy(), StreakPolicy::uncapped());
        assert_eq!(config.store_options().slot, "notion-habits");
    }

    #[test]
    fn rejects_blank_slot_and_zero_lookback() {
        let err = EngineConfig::from_toml("[storage]\nsnapshot_slot = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml("[streak]\nlookback_days = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = EngineConfig::from_toml("[streak\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = EngineConfig::default();
        config.storage.snapshot_slot = "habits-v2".to_string();
        config.streak.lookback_days = 90;
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = EngineConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, EngineConfig::default());
    }
}
