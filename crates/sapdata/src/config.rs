//! User settings read from `<user_config>/sapdata/config.toml`.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sapdata_fetch::FetchOptions;
use sapdata_fs::dir;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, DatasetSpec};
use crate::{Error, Result};

/// Overrides `data_dir` when set.
pub const DATA_DIR_ENV: &str = "SAPDATA_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Where acquired datasets are kept.
    pub data_dir:     PathBuf,
    /// `None` waits on the network indefinitely.
    pub timeout_secs: Option<u64>,
    pub resume:       bool,
    /// Values for `{KEY}` placeholders in dataset sources.
    pub locator_vars: BTreeMap<String, String>,
    /// Extra datasets merged onto the builtin catalog.
    pub datasets:     BTreeMap<String, DatasetSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir:     default_data_dir(),
            timeout_secs: None,
            resume:       true,
            locator_vars: BTreeMap::new(),
            datasets:     BTreeMap::new(),
        }
    }
}

/// `<user_data>/sapdata`, or `./sapdata` when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    dir::user_data()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sapdata")
}

pub fn config_path() -> Option<PathBuf> { dir::user_config().map(|p| p.join("sapdata").join("config.toml")) }

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            path:   None,
            reason: e.to_string(),
        })
    }

    /// Read `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Config {
                    path:   Some(path.to_path_buf()),
                    reason: e.to_string(),
                });
            }
        };
        toml::from_str(&text).map_err(|e| Error::Config {
            path:   Some(path.to_path_buf()),
            reason: e.to_string(),
        })
    }

    /// Settings from the user configuration file, then the environment.
    pub fn load() -> Result<Self> {
        let settings = match config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(settings.with_data_dir_override(std::env::var_os(DATA_DIR_ENV)))
    }

    /// Replace `data_dir` with a non-empty `value`.
    #[must_use]
    pub fn with_data_dir_override(mut self, value: Option<OsString>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(value);
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> { self.timeout_secs.map(Duration::from_secs) }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::default()
            .resume(self.resume)
            .timeout(self.timeout())
    }

    /// The builtin catalog with the configured datasets merged in.
    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        let builtin = Catalog::builtin()?;
        if self.datasets.is_empty() {
            return Ok(builtin);
        }
        let extra = self
            .datasets
            .iter()
            .map(|(name, spec)| spec.clone().into_entry(name.as_str()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Arc::new(builtin.merged(extra)?))
    }
}
