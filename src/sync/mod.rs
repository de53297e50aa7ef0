//! Git-backed synchronisation of the `{data_dir}/typst` directory.
//!
//! Every push or pull first prepares the sync directory:
//! 1. resolve the remote URL (`sync_repo`)
//! 2. resolve and create `{data_dir}/typst`
//! 3. initialise a repository there when needed
//! 4. bind `origin` to the remote URL, asking before replacing a different one

mod coordinator;
mod remote;

pub use coordinator::{SyncCoordinator, SyncRepository, commit_message};
pub use remote::{REPLACE_REMOTE_PROMPT, RemoteBinding, reconcile_origin};

/// Completion notice of the push command.
pub const PUSHED_MESSAGE: &str = "Typst packages pushed";
/// Completion notice of the pull command.
pub const PULLED_MESSAGE: &str = "Typst packages pulled";
/// Completion notice of the sync command.
pub const SYNCED_MESSAGE: &str = "Typst packages synced";
