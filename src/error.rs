//! Error kinds surfaced to the user.
//!
//! Core operations return `anyhow::Result`. The failures a caller may want to
//! react to are raised as [`Error`] and can be recovered with `downcast_ref`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Can not find dataDir, please make sure you have configured dataDir.")]
    NoDataDir,

    #[error("Can not find syncRepo, please make sure you have configured syncRepo.")]
    NoRemoteConfigured,

    #[error("Can not get preview packages list from {url}: {reason}")]
    IndexFetch { url: String, reason: String },

    #[error("Package manifest not found: {}", .0.display())]
    ManifestMissing(PathBuf),

    #[error("Package {0} already exists")]
    PackageExists(String),

    #[error("Invalid package: {0}")]
    InvalidPackage(String),

    #[error("Can not determine the current branch in {}", .0.display())]
    NoCurrentBranch(PathBuf),
}
