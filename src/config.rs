//! Slot selection loaded from `config.toml`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::persist::{
    DEFAULT_SLOT_KEY, PersistResult, Slot, file::FileSlot, sqlite::SqliteSlot,
};

const APP_DIR: &str = "monthcal";

/// Failure to locate or parse the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config/data directory could be determined.
    #[error("could not determine the {0} directory")]
    NoDir(&'static str),
    /// The file exists but could not be read.
    #[error("reading {path}: {source}")]
    Read {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The file is not valid TOML for [`Config`].
    #[error("parsing {path}: {source}")]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// Storage backend for the calendar slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Row in a SQLite key-value table.
    #[default]
    Sqlite,
    /// Standalone JSON file.
    File,
}

/// `[slot]` table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Backend kind.
    pub backend: Backend,
    /// Database or file location; platform data dir when absent.
    pub path: Option<PathBuf>,
    /// Key under which the blob is stored (SQLite only).
    pub key: Option<String>,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Persistent slot settings.
    pub slot: SlotConfig,
}

impl Config {
    /// `<config dir>/monthcal/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(dirs::config_dir()
            .ok_or(ConfigError::NoDir("config"))?
            .join(APP_DIR)
            .join("config.toml"))
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses TOML text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Location of the slot, falling back to the platform data directory.
    pub fn slot_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.slot.path {
            return Ok(path.clone());
        }
        let file = match self.slot.backend {
            Backend::Sqlite => "monthcal.db",
            Backend::File => "events.json",
        };
        Ok(dirs::data_dir()
            .ok_or(ConfigError::NoDir("data"))?
            .join(APP_DIR)
            .join(file))
    }

    /// Key used by the SQLite backend.
    pub fn slot_key(&self) -> &str {
        self.slot.key.as_deref().unwrap_or(DEFAULT_SLOT_KEY)
    }

    /// Opens the configured slot at `path`, creating parent directories.
    pub fn open_slot(&self, path: &Path) -> PersistResult<Box<dyn Slot>> {
        match self.slot.backend {
            Backend::Sqlite => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Ok(Box::new(SqliteSlot::open_with_key(path, self.slot_key())?))
            }
            Backend::File => Ok(Box::new(FileSlot::new(path))),
        }
    }
}
