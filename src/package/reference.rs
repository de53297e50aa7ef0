//! Package references (`@namespace/name:version`) and input validation.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

use super::Version;

/// File extension every entrypoint must carry.
pub const SOURCE_EXTENSION: &str = ".typ";

/// Where a package lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// Filesystem-resident, user-authored packages.
    Local,
    /// Packages published to the hosted registry.
    Preview,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Local => write!(f, "local"),
            Namespace::Preview => write!(f, "preview"),
        }
    }
}

impl FromStr for Namespace {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Namespace::Local),
            "preview" => Ok(Namespace::Preview),
            _ => bail!("Unknown package namespace: {}. Expected local or preview.", s),
        }
    }
}

/// One package version, e.g. `@local/mylib:0.1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    pub namespace: Namespace,
    pub name: String,
    pub version: Version,
}

impl PackageRef {
    pub fn new(namespace: Namespace, name: &str, version: Version) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            namespace,
            name: name.to_string(),
            version,
        })
    }

    pub fn local(name: &str, version: Version) -> Result<Self> {
        Self::new(Namespace::Local, name, version)
    }

    /// Canonical import identifier.
    pub fn reference(&self) -> String {
        self.to_string()
    }

    /// The line inserted into a document to import this package.
    pub fn import_statement(&self) -> String {
        import_statement(&self.reference())
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}/{}:{}", self.namespace, self.name, self.version)
    }
}

impl FromStr for PackageRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            anyhow::anyhow!(
                "Invalid package reference {:?}. Expected '@namespace/name:version'.",
                s
            )
        };

        let rest = s.strip_prefix('@').ok_or_else(invalid)?;
        let (namespace, rest) = rest.split_once('/').ok_or_else(invalid)?;
        let (name, version) = rest.split_once(':').ok_or_else(invalid)?;

        Self::new(namespace.parse()?, name, version.parse()?)
    }
}

/// `#import "<reference>": *`
pub fn import_statement(reference: &str) -> String {
    format!("#import \"{}\": *", reference)
}

/// Reject names that are empty or would break paths, references or the manifest.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Please input package name");
    }
    if name.starts_with('.') {
        bail!("Package name must not start with '.'");
    }
    if let Some(c) = name
        .chars()
        .find(|c| matches!(c, '/' | ':' | '\\' | '"') || c.is_control())
    {
        bail!("Package name must not contain {:?}", c);
    }
    Ok(())
}

/// Entrypoints are relative source paths inside the package directory.
pub fn validate_entrypoint(entrypoint: &str) -> Result<()> {
    if entrypoint.is_empty() {
        bail!("Please input entrypoint");
    }
    if !entrypoint.ends_with(SOURCE_EXTENSION) {
        bail!("Please input valid entrypoint end with {}", SOURCE_EXTENSION);
    }
    if entrypoint.starts_with('/')
        || entrypoint
            .split('/')
            .any(|part| part.is_empty() || part == "." || part == "..")
    {
        bail!("Entrypoint must be a relative path inside the package");
    }
    if let Some(c) = entrypoint
        .chars()
        .find(|c| matches!(c, '"' | '\\') || c.is_control())
    {
        bail!("Entrypoint must not contain {:?}", c);
    }
    Ok(())
}

pub fn validate_version(version: &str) -> Result<Version> {
    if version.is_empty() {
        bail!("Please input package version");
    }
    version
        .parse()
        .map_err(|_| anyhow::anyhow!("Please input valid package version like 0.1.0"))
}

/// Prompt validator: error text or `None`.
pub fn name_prompt_error(input: &str) -> Option<String> {
    validate_name(input).err().map(|e| e.to_string())
}

/// Prompt validator: error text or `None`.
pub fn version_prompt_error(input: &str) -> Option<String> {
    validate_version(input).err().map(|e| e.to_string())
}

/// Prompt validator: error text or `None`.
pub fn entrypoint_prompt_error(input: &str) -> Option<String> {
    validate_entrypoint(input).err().map(|e| e.to_string())
}
