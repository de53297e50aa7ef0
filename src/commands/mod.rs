//! User-facing commands.
//!
//! Each command reads configuration when it starts, talks to the user only
//! through [`Editor`](crate::editor::Editor) and returns errors to the caller,
//! which reports them.

use anyhow::Result;

use crate::config::ConfigSource;
use crate::editor::{Editor, Validator};
use crate::error::Error;
use crate::package::{PackageDirs, PackageRef, list_local_packages};
use crate::runtime::Runtime;

mod create;
mod import;
mod list;
mod open;
mod sync;

pub use create::{CreateOptions, create};
pub use import::{IMPORT_PLACEHOLDER, PREVIEW_FETCH_FAILED, PREVIEW_PROGRESS, import};
pub use list::list;
pub use open::{OPEN_PLACEHOLDER, open};
pub use sync::{pull, push, sync};

/// Local packages under the configured data dir. Empty when there is none.
pub(crate) fn local_packages<R: Runtime, C: ConfigSource>(
    runtime: &R,
    config: &C,
) -> Result<Vec<PackageRef>> {
    let local_dir = PackageDirs::resolve(runtime, config).map(|dirs| dirs.local_packages_dir());
    list_local_packages(runtime, local_dir.as_deref())
}

pub(crate) fn require_dirs<R: Runtime, C: ConfigSource>(
    runtime: &R,
    config: &C,
) -> Result<PackageDirs> {
    PackageDirs::resolve(runtime, config).ok_or_else(|| Error::NoDataDir.into())
}

/// A value given on the command line is checked like prompt input; a missing
/// one is asked for. `None` when the prompt was cancelled.
pub(crate) fn given_or_prompt<E: Editor>(
    editor: &E,
    given: Option<String>,
    prompt: &str,
    default: &str,
    validate: Validator,
) -> Result<Option<String>> {
    match given {
        Some(value) => match validate(&value) {
            Some(message) => Err(Error::InvalidPackage(message).into()),
            None => Ok(Some(value)),
        },
        None => editor.input(prompt, default, validate),
    }
}
