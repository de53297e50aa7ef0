use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::runtime::Runtime;

use super::{PackageRef, Version, reference::validate_name};

/// Find all local packages by scanning the version directories.
///
/// Directory structure: `<local>/<name>/<version>/`
///
/// A missing directory is an empty result. Versions come out newest first
/// within each package; packages keep the filesystem enumeration order.
#[tracing::instrument(skip(runtime))]
pub fn list_local_packages<R: Runtime>(
    runtime: &R,
    local_dir: Option<&Path>,
) -> Result<Vec<PackageRef>> {
    let mut packages = Vec::new();

    let Some(local_dir) = local_dir else {
        return Ok(packages);
    };
    if !runtime.exists(local_dir) {
        debug!("Local packages dir {:?} does not exist", local_dir);
        return Ok(packages);
    }

    for package_path in runtime.read_dir(local_dir)? {
        if !runtime.is_dir(&package_path) {
            continue;
        }
        let Some(name) = file_name(&package_path) else {
            continue;
        };
        if validate_name(name).is_err() {
            debug!("Skipping {:?}: not a package name", package_path);
            continue;
        }

        let mut versions: Vec<Version> = Vec::new();
        for version_path in runtime.read_dir(&package_path)? {
            if !runtime.is_dir(&version_path) {
                continue;
            }
            match file_name(&version_path).map(str::parse::<Version>) {
                Some(Ok(version)) => versions.push(version),
                _ => debug!("Skipping {:?}: not a version directory", version_path),
            }
        }

        versions.sort_by(Version::newest_first);
        for version in versions {
            packages.push(PackageRef::local(name, version)?);
        }
    }

    Ok(packages)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
