use anyhow::Result;

use crate::config::ConfigSource;
use crate::editor::Editor;
use crate::git::Git;
use crate::runtime::Runtime;
use crate::sync::{PULLED_MESSAGE, PUSHED_MESSAGE, SYNCED_MESSAGE, SyncCoordinator};

#[tracing::instrument(skip_all)]
pub async fn push<R: Runtime, C: ConfigSource, G: Git, E: Editor>(
    runtime: &R,
    config: &C,
    git: &G,
    editor: &E,
) -> Result<()> {
    SyncCoordinator::new(runtime, config, git, editor)
        .push(PUSHED_MESSAGE)
        .await?;
    Ok(())
}

#[tracing::instrument(skip_all)]
pub async fn pull<R: Runtime, C: ConfigSource, G: Git, E: Editor>(
    runtime: &R,
    config: &C,
    git: &G,
    editor: &E,
) -> Result<()> {
    SyncCoordinator::new(runtime, config, git, editor)
        .pull(PULLED_MESSAGE)
        .await?;
    Ok(())
}

/// Push path with its own completion notice.
#[tracing::instrument(skip_all)]
pub async fn sync<R: Runtime, C: ConfigSource, G: Git, E: Editor>(
    runtime: &R,
    config: &C,
    git: &G,
    editor: &E,
) -> Result<()> {
    SyncCoordinator::new(runtime, config, git, editor)
        .push(SYNCED_MESSAGE)
        .await?;
    Ok(())
}
