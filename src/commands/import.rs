use anyhow::Result;
use log::{debug, warn};

use crate::config::ConfigSource;
use crate::editor::Editor;
use crate::package::{PackageIndex, PackageIndexEntry, import_statement, list_preview_packages};
use crate::runtime::Runtime;

use super::local_packages;

pub const IMPORT_PLACEHOLDER: &str = "Please select a package to import";
pub const PREVIEW_PROGRESS: &str = "Getting preview packages list...";
pub const PREVIEW_FETCH_FAILED: &str =
    "Can not get preview packages list, please try again later.";

/// Pick a package and insert its import statement into the current document.
///
/// Local packages come first. With an `index`, the newest version of every
/// preview package follows; when the index cannot be fetched the user is told
/// and only local packages are offered.
#[tracing::instrument(skip(runtime, config, index, editor))]
pub async fn import<R: Runtime, C: ConfigSource, E: Editor>(
    runtime: &R,
    config: &C,
    index: Option<&dyn PackageIndex>,
    editor: &E,
) -> Result<()> {
    let mut choices: Vec<String> = local_packages(runtime, config)?
        .iter()
        .map(|package| package.reference())
        .collect();

    if let Some(index) = index {
        editor.progress(PREVIEW_PROGRESS);
        match list_preview_packages(index).await {
            Ok(entries) => choices.extend(entries.iter().map(PackageIndexEntry::reference)),
            Err(e) => {
                warn!("{:#}", e);
                editor.error(PREVIEW_FETCH_FAILED);
            }
        }
    }

    debug!("Offering {} packages", choices.len());
    let Some(selected) = editor.pick(&choices, IMPORT_PLACEHOLDER)? else {
        debug!("Import cancelled");
        return Ok(());
    };

    editor.insert_text(&import_statement(&selected))
}
