use anyhow::Result;
use log::debug;

use crate::config::ConfigSource;
use crate::editor::Editor;
use crate::package::{PackageIndex, list_preview_packages};
use crate::runtime::Runtime;

use super::local_packages;

/// Print local package references, then the newest preview packages when an
/// `index` is given.
#[tracing::instrument(skip(runtime, config, index, editor))]
pub async fn list<R: Runtime, C: ConfigSource, E: Editor>(
    runtime: &R,
    config: &C,
    index: Option<&dyn PackageIndex>,
    editor: &E,
) -> Result<()> {
    let packages = local_packages(runtime, config)?;
    debug!("Found {} local package(s)", packages.len());

    if packages.is_empty() && index.is_none() {
        editor.info("No local packages.");
        return Ok(());
    }
    for package in &packages {
        editor.info(&package.reference());
    }

    if let Some(index) = index {
        for entry in list_preview_packages(index).await? {
            editor.info(&entry.reference());
        }
    }

    Ok(())
}
