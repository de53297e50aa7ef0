//! [`Git`] implemented by running the `git` command-line tool.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use super::{Git, GitError, Remote};

/// Runs `git -C <dir> ...` for every operation.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific git binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn output(&self, dir: &Path, args: &[&str]) -> Result<Output, GitError> {
        debug!("git -C {} {}", dir.display(), args.join(" "));

        let output = Command::new(&self.program)
            .arg("-C")
            .arg(dir)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .await?;
        Ok(output)
    }

    /// Run git and return stdout, failing on a non-zero exit status.
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = self.output(dir, args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GitError::Failed {
                args: args.join(" "),
                stderr,
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse `git remote -v` into one entry per remote (fetch URLs only).
///
/// Lines look like `<name>\t<url> (fetch)`; the URL may contain spaces.
fn parse_remotes(output: &str) -> Vec<Remote> {
    output
        .lines()
        .filter_map(|line| {
            let (name, rest) = line.split_once('\t')?;
            let url = rest.strip_suffix(" (fetch)")?;
            Some(Remote {
                name: name.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[async_trait]
impl Git for GitCli {
    #[tracing::instrument(skip(self))]
    async fn is_repo(&self, dir: &Path) -> Result<bool> {
        let output = self.output(dir, &["rev-parse", "--show-toplevel"]).await?;
        if !output.status.success() {
            return Ok(false);
        }
        // A directory nested inside some other working tree does not count.
        let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(same_dir(Path::new(&toplevel), dir))
    }

    #[tracing::instrument(skip(self))]
    async fn init(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["init"]).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remotes(&self, dir: &Path) -> Result<Vec<Remote>> {
        let output = self.run(dir, &["remote", "-v"]).await?;
        Ok(parse_remotes(&output))
    }

    #[tracing::instrument(skip(self))]
    async fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<()> {
        self.run(dir, &["remote", "add", name, url]).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_remote(&self, dir: &Path, name: &str) -> Result<()> {
        self.run(dir, &["remote", "remove", name]).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn add_all(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["add", "--all", "."]).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn commit(&self, dir: &Path, message: &str) -> Result<()> {
        self.run(dir, &["commit", "-m", message]).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn has_changes(&self, dir: &Path) -> Result<bool> {
        let output = self.run(dir, &["status", "--porcelain"]).await?;
        Ok(!output.trim().is_empty())
    }

    #[tracing::instrument(skip(self))]
    async fn pull(&self, dir: &Path, remote: &str, branch: &str) -> Result<()> {
        self.run(dir, &["pull", "--no-rebase", "--no-edit", remote, branch])
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<()> {
        self.run(dir, &["push", remote, branch]).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn current_branch(&self, dir: &Path) -> Result<Option<String>> {
        // symbolic-ref also answers on an unborn branch, before the first commit.
        let output = self
            .output(dir, &["symbolic-ref", "--quiet", "--short", "HEAD"])
            .await?;
        if !output.status.success() {
            return Ok(None);
        }
        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(branch).filter(|b| !b.is_empty()))
    }
}
