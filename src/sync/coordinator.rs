use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info, warn};

use crate::config::{ConfigKey, ConfigSource};
use crate::editor::Editor;
use crate::error::Error;
use crate::git::{Git, GitError, ORIGIN};
use crate::package::PackageDirs;
use crate::runtime::Runtime;

use super::remote::{RemoteBinding, reconcile_origin};

/// A prepared sync directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRepository {
    pub working_dir: PathBuf,
    pub remote_url: String,
    pub binding: RemoteBinding,
}

/// Commit message for a push: the UTC time in ISO-8601 with milliseconds,
/// e.g. `2026-01-02T03:04:05.678Z`.
pub fn commit_message(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Pushes and pulls the sync directory. Settings are read on every call.
pub struct SyncCoordinator<'a, R: Runtime, C: ConfigSource, G: Git, E: Editor> {
    runtime: &'a R,
    config: &'a C,
    git: &'a G,
    editor: &'a E,
}

impl<'a, R: Runtime, C: ConfigSource, G: Git, E: Editor> SyncCoordinator<'a, R, C, G, E> {
    pub fn new(runtime: &'a R, config: &'a C, git: &'a G, editor: &'a E) -> Self {
        Self {
            runtime,
            config,
            git,
            editor,
        }
    }

    /// Resolve the remote and data dir, then make sure the sync directory is a
    /// repository bound to the remote.
    #[tracing::instrument(skip(self))]
    pub async fn prepare(&self) -> Result<SyncRepository> {
        let remote_url = self
            .config
            .get(ConfigKey::SyncRepo)
            .ok_or(Error::NoRemoteConfigured)?;
        let dirs = PackageDirs::resolve(self.runtime, self.config).ok_or(Error::NoDataDir)?;

        let working_dir = dirs.typst_dir();
        if !self.runtime.exists(&working_dir) {
            debug!("Creating sync directory {:?}", working_dir);
            self.runtime.create_dir_all(&working_dir)?;
        }

        if !self.git.is_repo(&working_dir).await? {
            info!("Initialising repository in {:?}", working_dir);
            self.git.init(&working_dir).await?;
        }

        let binding = reconcile_origin(self.git, self.editor, &working_dir, &remote_url).await?;

        Ok(SyncRepository {
            working_dir,
            remote_url,
            binding,
        })
    }

    /// Commit local changes, merge the remote branch and push.
    ///
    /// A failing merge before the push is not fatal; the push decides.
    #[tracing::instrument(skip(self))]
    pub async fn push(&self, message: &str) -> Result<SyncRepository> {
        let repo = self.prepare().await?;
        let dir = repo.working_dir.as_path();
        let branch = self.current_branch(dir).await?;

        self.editor
            .progress(&format!("Pushing {} to {}...", branch, repo.remote_url));

        self.git.add_all(dir).await?;
        if self.git.has_changes(dir).await? {
            let message = commit_message(Utc::now());
            debug!("Committing changes as {:?}", message);
            self.git.commit(dir, &message).await?;
        } else {
            debug!("Nothing to commit in {:?}", dir);
        }

        if let Err(e) = self.git.pull(dir, ORIGIN, &branch).await {
            match e.downcast_ref::<GitError>() {
                Some(git_err) if git_err.is_missing_remote_ref() => {
                    debug!("Remote has no branch {} yet", branch)
                }
                _ => warn!("Pull before push failed, pushing anyway: {:#}", e),
            }
        }

        self.git.push(dir, ORIGIN, &branch).await?;
        self.editor.info(message);
        Ok(repo)
    }

    /// Merge the remote branch into the sync directory.
    #[tracing::instrument(skip(self))]
    pub async fn pull(&self, message: &str) -> Result<SyncRepository> {
        let repo = self.prepare().await?;
        let dir = repo.working_dir.as_path();
        let branch = self.current_branch(dir).await?;

        self.editor
            .progress(&format!("Pulling {} from {}...", branch, repo.remote_url));

        self.git.pull(dir, ORIGIN, &branch).await?;
        self.editor.info(message);
        Ok(repo)
    }

    async fn current_branch(&self, dir: &Path) -> Result<String> {
        self.git
            .current_branch(dir)
            .await?
            .ok_or_else(|| Error::NoCurrentBranch(dir.to_path_buf()).into())
    }
}
