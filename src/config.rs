//! Read-only configuration capability.
//!
//! Settings are looked up through [`ConfigSource`] at the start of every
//! operation and never cached, so edits to the config file take effect on the
//! next command.
//!
//! Lookup order used by the CLI:
//! 1. command-line flags / environment (`--data-dir`, `--sync-repo`)
//! 2. `{config_dir}/typst-sync/config.toml` (or `--config PATH`)

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use log::{debug, warn};
use serde::Deserialize;

use crate::runtime::Runtime;

/// Keys understood by the configuration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Override for the base data directory.
    DataDir,
    /// Remote URL of the sync repository.
    SyncRepo,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::DataDir => "data_dir",
            ConfigKey::SyncRepo => "sync_repo",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value access to host settings. Absence is a normal answer.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: ConfigKey) -> Option<String>;
}

#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(default, alias = "dataDir")]
    data_dir: Option<String>,
    #[serde(default, alias = "syncRepo")]
    sync_repo: Option<String>,
}

impl Settings {
    fn value(self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::DataDir => self.data_dir,
            ConfigKey::SyncRepo => self.sync_repo,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Settings stored in a TOML file, re-read on every lookup.
pub struct FileConfig<'a, R: Runtime> {
    runtime: &'a R,
    path: Option<PathBuf>,
}

impl<'a, R: Runtime> FileConfig<'a, R> {
    /// Use `path`, or the default location when `None`.
    pub fn new(runtime: &'a R, path: Option<PathBuf>) -> Self {
        let path = path.or_else(|| Self::default_path(runtime));
        Self { runtime, path }
    }

    /// `{config_dir}/typst-sync/config.toml`
    pub fn default_path(runtime: &R) -> Option<PathBuf> {
        runtime
            .config_dir()
            .map(|dir| dir.join("typst-sync").join("config.toml"))
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    fn load(&self) -> Settings {
        let Some(path) = &self.path else {
            return Settings::default();
        };
        if !self.runtime.exists(path) {
            debug!("No config file at {:?}", path);
            return Settings::default();
        }

        let content = match self.runtime.read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Ignoring unreadable config file {:?}: {:#}", path, e);
                return Settings::default();
            }
        };

        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring invalid config file {:?}: {}", path, e);
                Settings::default()
            }
        }
    }
}

impl<R: Runtime> ConfigSource for FileConfig<'_, R> {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: ConfigKey) -> Option<String> {
        non_empty(self.load().value(key))
    }
}

/// Explicit overrides in front of another source.
pub struct LayeredConfig<C: ConfigSource> {
    overrides: HashMap<ConfigKey, String>,
    fallback: C,
}

impl<C: ConfigSource> LayeredConfig<C> {
    pub fn new(fallback: C) -> Self {
        Self {
            overrides: HashMap::new(),
            fallback,
        }
    }

    /// Set an override. `None` and blank values leave the key to the fallback.
    pub fn with_override(mut self, key: ConfigKey, value: Option<String>) -> Self {
        if let Some(value) = non_empty(value) {
            self.overrides.insert(key, value);
        }
        self
    }
}

impl<C: ConfigSource> ConfigSource for LayeredConfig<C> {
    fn get(&self, key: ConfigKey) -> Option<String> {
        self.overrides
            .get(&key)
            .cloned()
            .or_else(|| self.fallback.get(key))
    }
}
