use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::config::ConfigSource;
use crate::editor::Editor;
use crate::error::Error;
use crate::package::{LocalPackages, Namespace, PackageRef, list_local_packages};
use crate::runtime::Runtime;

use super::require_dirs;

pub const OPEN_PLACEHOLDER: &str = "Please select a package to open";

/// Open the entry file of a local package, picked from the list unless a
/// reference such as `@local/mylib:0.1.0` is given.
///
/// Returns the opened file, or `None` when the pick was cancelled.
#[tracing::instrument(skip(runtime, config, editor))]
pub fn open<R: Runtime, C: ConfigSource, E: Editor>(
    runtime: &R,
    config: &C,
    editor: &E,
    reference: Option<&str>,
) -> Result<Option<PathBuf>> {
    let dirs = require_dirs(runtime, config)?;

    let package = match reference {
        Some(reference) => {
            let package: PackageRef = reference.parse()?;
            if package.namespace != Namespace::Local {
                return Err(Error::InvalidPackage(format!(
                    "{} is not a local package",
                    package
                ))
                .into());
            }
            package
        }
        None => {
            let packages = list_local_packages(runtime, Some(&dirs.local_packages_dir()))?;
            let choices: Vec<String> = packages.iter().map(PackageRef::reference).collect();
            let Some(selected) = editor.pick(&choices, OPEN_PLACEHOLDER)? else {
                debug!("Open cancelled");
                return Ok(None);
            };
            match packages.into_iter().find(|p| p.reference() == selected) {
                Some(package) => package,
                None => return Err(Error::InvalidPackage(selected).into()),
            }
        }
    };

    let entry = LocalPackages::new(runtime, dirs).entry_file(&package)?;
    editor.open_document(&entry)?;
    Ok(Some(entry))
}
