use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use crate::editor::Editor;
use crate::git::{Git, ORIGIN};

pub const REPLACE_REMOTE_PROMPT: &str =
    "Remote origin already exists, do you want to replace it?";

const YES: &str = "Yes";
const NO: &str = "No";

/// What happened to `origin` while preparing the sync directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteBinding {
    /// There was no `origin`; it now points to the sync repository.
    Added,
    /// `origin` already pointed to the sync repository.
    Unchanged,
    /// The user agreed to replace a different `origin`.
    Replaced,
    /// The user declined; `origin` still points elsewhere.
    KeptStale,
}

/// Make `origin` in `dir` point at `url`, asking before replacing it.
#[tracing::instrument(skip(git, editor))]
pub async fn reconcile_origin<G: Git + ?Sized, E: Editor + ?Sized>(
    git: &G,
    editor: &E,
    dir: &Path,
    url: &str,
) -> Result<RemoteBinding> {
    let remotes = git.remotes(dir).await?;
    let Some(origin) = remotes.iter().find(|r| r.name == ORIGIN) else {
        git.add_remote(dir, ORIGIN, url).await?;
        info!("Added remote {} -> {}", ORIGIN, url);
        return Ok(RemoteBinding::Added);
    };

    if origin.url == url {
        return Ok(RemoteBinding::Unchanged);
    }

    let choices = [YES.to_string(), NO.to_string()];
    let answer = editor.pick(&choices, REPLACE_REMOTE_PROMPT)?;
    if answer.as_deref() != Some(YES) {
        warn!(
            "Keeping remote {} -> {} (configured sync repository is {})",
            ORIGIN, origin.url, url
        );
        return Ok(RemoteBinding::KeptStale);
    }

    git.remove_remote(dir, ORIGIN).await?;
    git.add_remote(dir, ORIGIN, url).await?;
    info!("Replaced remote {} {} -> {}", ORIGIN, origin.url, url);
    Ok(RemoteBinding::Replaced)
}
