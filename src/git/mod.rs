//! Version-control collaborator.
//!
//! The sync coordinator only talks to [`Git`]; [`GitCli`] implements it by
//! running the `git` binary, so no version control is reimplemented here.

mod cli;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub use cli::GitCli;

/// Name of the remote the sync directory is bound to.
pub const ORIGIN: &str = "origin";

/// A configured remote and its fetch URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum GitError {
    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git {args} failed: {stderr}")]
    Failed { args: String, stderr: String },
}

impl GitError {
    /// True when a pull failed only because the branch does not exist on the
    /// remote yet, which is the normal state before the first push.
    pub fn is_missing_remote_ref(&self) -> bool {
        match self {
            GitError::Failed { stderr, .. } => {
                let stderr = stderr.to_lowercase();
                stderr.contains("couldn't find remote ref")
                    || stderr.contains("no such ref was fetched")
            }
            GitError::Spawn(_) => false,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Git: Send + Sync {
    /// Whether `dir` is the top level of a working tree.
    async fn is_repo(&self, dir: &Path) -> Result<bool>;
    async fn init(&self, dir: &Path) -> Result<()>;
    async fn remotes(&self, dir: &Path) -> Result<Vec<Remote>>;
    async fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<()>;
    async fn remove_remote(&self, dir: &Path, name: &str) -> Result<()>;
    /// Stage every change in the working tree.
    async fn add_all(&self, dir: &Path) -> Result<()>;
    async fn commit(&self, dir: &Path, message: &str) -> Result<()>;
    /// Whether `git status` reports anything pending.
    async fn has_changes(&self, dir: &Path) -> Result<bool>;
    /// Pull with a merge (never a rebase).
    async fn pull(&self, dir: &Path, remote: &str, branch: &str) -> Result<()>;
    async fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<()>;
    /// The checked-out branch, `None` on a detached HEAD.
    async fn current_branch(&self, dir: &Path) -> Result<Option<String>>;
}
