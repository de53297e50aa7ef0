//! The `typst.toml` package manifest.
//!
//! [`Manifest::to_toml`] and [`Manifest::parse`] are kept symmetric: anything
//! written by the former is read back unchanged by the latter.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::runtime::Runtime;

use super::{Version, reference};

/// Manifest file name inside each version directory.
pub const MANIFEST_FILE: &str = "typst.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub version: Version,
    pub entrypoint: String,
}

/// On-disk shape. Every field is optional so a partial manifest still parses.
#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    package: RawPackage,
}

#[derive(Debug, Default, Deserialize)]
struct RawPackage {
    name: Option<String>,
    version: Option<String>,
    entrypoint: Option<String>,
}

impl Manifest {
    pub fn new(name: &str, version: Version, entrypoint: &str) -> Result<Self> {
        reference::validate_name(name)?;
        reference::validate_entrypoint(entrypoint)?;
        Ok(Self {
            name: name.to_string(),
            version,
            entrypoint: entrypoint.to_string(),
        })
    }

    /// Render the three-line `[package]` table written for new packages.
    pub fn to_toml(&self) -> String {
        format!(
            "[package]\nname = \"{}\"\nversion = \"{}\"\nentrypoint = \"{}\"",
            self.name, self.version, self.entrypoint
        )
    }

    /// Parse a manifest that must carry all three fields.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content).context("Invalid package manifest")?;
        let RawPackage {
            name,
            version,
            entrypoint,
        } = raw.package;

        let name = name.context("Package manifest has no name")?;
        let version = version
            .context("Package manifest has no version")?
            .parse()?;
        let entrypoint = entrypoint.context("Package manifest has no entrypoint")?;

        Self::new(&name, version, &entrypoint)
    }

    #[tracing::instrument(skip(runtime, self))]
    pub fn save<R: Runtime>(&self, runtime: &R, path: &Path) -> Result<()> {
        runtime
            .write(path, self.to_toml().as_bytes())
            .with_context(|| format!("Failed to save manifest to {}", path.display()))
    }
}

/// Read only the `entrypoint` field. `Ok(None)` when the field is missing.
pub fn read_entrypoint(content: &str) -> Result<Option<String>> {
    let raw: RawManifest = toml::from_str(content).context("Invalid package manifest")?;
    Ok(raw.package.entrypoint.filter(|e| !e.is_empty()))
}
