use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::config::ConfigSource;
use crate::editor::Editor;
use crate::package::reference::{
    entrypoint_prompt_error, name_prompt_error, validate_version, version_prompt_error,
};
use crate::package::{LocalPackages, Manifest, PackageRef};
use crate::runtime::Runtime;

use super::{given_or_prompt, require_dirs};

pub const DEFAULT_VERSION: &str = "0.1.0";
pub const DEFAULT_ENTRYPOINT: &str = "lib.typ";

/// Values given on the command line. Missing ones are prompted for.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub name: Option<String>,
    pub version: Option<String>,
    pub entrypoint: Option<String>,
}

/// Scaffold a local package and open its entry file.
///
/// Returns the entry file, or `None` when a prompt was cancelled.
#[tracing::instrument(skip(runtime, config, editor))]
pub fn create<R: Runtime, C: ConfigSource, E: Editor>(
    runtime: &R,
    config: &C,
    editor: &E,
    options: CreateOptions,
) -> Result<Option<PathBuf>> {
    let dirs = require_dirs(runtime, config)?;

    let Some(name) = given_or_prompt(editor, options.name, "Package name", "", name_prompt_error)?
    else {
        return Ok(cancelled());
    };
    let Some(version) = given_or_prompt(
        editor,
        options.version,
        "Package version",
        DEFAULT_VERSION,
        version_prompt_error,
    )?
    else {
        return Ok(cancelled());
    };
    let Some(entrypoint) = given_or_prompt(
        editor,
        options.entrypoint,
        "Entrypoint",
        DEFAULT_ENTRYPOINT,
        entrypoint_prompt_error,
    )?
    else {
        return Ok(cancelled());
    };

    let version = validate_version(&version)?;
    let package = PackageRef::local(&name, version)?;
    let manifest = Manifest::new(&name, version, &entrypoint)?;

    let entry = LocalPackages::new(runtime, dirs).create(&manifest)?;
    editor.info(&format!("Created {}", package));
    editor.open_document(&entry)?;
    Ok(Some(entry))
}

fn cancelled() -> Option<PathBuf> {
    debug!("Create cancelled");
    None
}
