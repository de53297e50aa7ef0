//! Data directory resolution and the derived package directories.
//!
//! Layout: `{data_dir}/typst/packages/local/{name}/{version}/typst.toml`

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::config::{ConfigKey, ConfigSource};
use crate::runtime::{Runtime, join_segment};

use super::{MANIFEST_FILE, Version};

/// Directories derived from one resolved data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDirs {
    data_dir: PathBuf,
}

impl PackageDirs {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve from configuration, falling back to the platform default.
    /// `None` when neither is available.
    #[tracing::instrument(skip(runtime, config))]
    pub fn resolve<R: Runtime, C: ConfigSource>(runtime: &R, config: &C) -> Option<Self> {
        resolve_data_dir(runtime, config).map(Self::new)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// `{data_dir}/typst`, the directory kept under version control.
    pub fn typst_dir(&self) -> PathBuf {
        self.data_dir.join("typst")
    }

    /// `{data_dir}/typst/packages`
    pub fn packages_dir(&self) -> PathBuf {
        self.typst_dir().join("packages")
    }

    /// `{data_dir}/typst/packages/local`
    pub fn local_packages_dir(&self) -> PathBuf {
        self.packages_dir().join("local")
    }

    /// `{local}/{name}/{version}`, with `name` checked as a single component.
    pub fn version_dir(&self, name: &str, version: &Version) -> Result<PathBuf> {
        let package_dir = join_segment(&self.local_packages_dir(), name)?;
        join_segment(&package_dir, &version.to_string())
    }

    /// `{local}/{name}/{version}/typst.toml`
    pub fn manifest_path(&self, name: &str, version: &Version) -> Result<PathBuf> {
        Ok(self.version_dir(name, version)?.join(MANIFEST_FILE))
    }
}

/// The configured data directory, or the platform default.
pub fn resolve_data_dir<R: Runtime, C: ConfigSource>(runtime: &R, config: &C) -> Option<PathBuf> {
    if let Some(dir) = config.get(ConfigKey::DataDir) {
        debug!("Using configured data dir: {}", dir);
        return Some(PathBuf::from(dir));
    }

    let dir = platform_data_dir(runtime);
    debug!("Using platform data dir: {:?}", dir);
    dir
}

fn env_path<R: Runtime>(runtime: &R, key: &str) -> Option<PathBuf> {
    runtime
        .env_var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(any(target_os = "macos", not(windows)))]
fn home<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    env_path(runtime, "HOME").or_else(|| runtime.home_dir())
}

#[cfg(target_os = "macos")]
fn platform_data_dir<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    home(runtime).map(|h| h.join("Library").join("Application Support"))
}

#[cfg(windows)]
fn platform_data_dir<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    env_path(runtime, "APPDATA")
}

#[cfg(not(any(target_os = "macos", windows)))]
fn platform_data_dir<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    env_path(runtime, "XDG_DATA_HOME").or_else(|| home(runtime).map(|h| h.join(".local").join("share")))
}
