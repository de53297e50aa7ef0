//! Package management module
//!
//! This module covers the on-disk package directory (data dir resolution,
//! enumeration, manifests, scaffolding) and the remote preview index.

mod discovery;
mod index;
mod layout;
mod manifest;
pub mod reference;
mod repository;
mod version;

pub use discovery::list_local_packages;
pub use index::{
    PREVIEW_INDEX_URL, PackageIndex, PackageIndexEntry, PreviewIndex, list_preview_packages,
    newest_per_name,
};
pub use layout::{PackageDirs, resolve_data_dir};
pub use manifest::{MANIFEST_FILE, Manifest, read_entrypoint};
pub use reference::{Namespace, PackageRef, import_statement};
pub use repository::{ENTRYPOINT_PLACEHOLDER, LocalPackages};
pub use version::{Version, compare_versions};

#[cfg(test)]
pub use index::MockPackageIndex;
