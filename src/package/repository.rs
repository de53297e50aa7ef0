//! Local package repository: scaffolding and entry-file resolution.

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use crate::error::Error;
use crate::runtime::{Runtime, join_relative};

use super::{MANIFEST_FILE, Manifest, PackageDirs, PackageRef, manifest::read_entrypoint};

/// Content written to a new package's entry file.
pub const ENTRYPOINT_PLACEHOLDER: &str = "= Hello Typst";

/// Repository for the packages under `{data_dir}/typst/packages/local`.
pub struct LocalPackages<'a, R: Runtime> {
    runtime: &'a R,
    dirs: PackageDirs,
}

impl<'a, R: Runtime> LocalPackages<'a, R> {
    pub fn new(runtime: &'a R, dirs: PackageDirs) -> Self {
        Self { runtime, dirs }
    }

    /// Create `{name}/{version}` with its manifest and a placeholder entry file.
    ///
    /// Returns the path of the entry file.
    #[tracing::instrument(skip(self))]
    pub fn create(&self, manifest: &Manifest) -> Result<PathBuf> {
        let package_dir = self.dirs.version_dir(&manifest.name, &manifest.version)?;
        let manifest_path = package_dir.join(MANIFEST_FILE);
        let entry_path = join_relative(&package_dir, &manifest.entrypoint)?;

        if self.runtime.exists(&manifest_path) {
            return Err(Error::PackageExists(format!(
                "@local/{}:{}",
                manifest.name, manifest.version
            ))
            .into());
        }

        self.runtime.create_dir_all(&package_dir)?;
        manifest.save(self.runtime, &manifest_path)?;

        if let Some(parent) = entry_path.parent()
            && parent != package_dir.as_path()
        {
            self.runtime.create_dir_all(parent)?;
        }
        self.runtime
            .write(&entry_path, ENTRYPOINT_PLACEHOLDER.as_bytes())
            .with_context(|| format!("Failed to write {}", entry_path.display()))?;

        info!("Created package in {}", package_dir.display());
        Ok(entry_path)
    }

    /// The file to open for a package: its entrypoint, or the manifest itself
    /// when the manifest names no usable entrypoint.
    #[tracing::instrument(skip(self))]
    pub fn entry_file(&self, package: &PackageRef) -> Result<PathBuf> {
        let package_dir = self.dirs.version_dir(&package.name, &package.version)?;
        let manifest_path = package_dir.join(MANIFEST_FILE);

        if !self.runtime.exists(&manifest_path) {
            return Err(Error::ManifestMissing(manifest_path).into());
        }

        let content = self.runtime.read_to_string(&manifest_path)?;
        let entrypoint = match read_entrypoint(&content) {
            Ok(Some(entrypoint)) => entrypoint,
            Ok(None) => return Ok(manifest_path),
            Err(e) => {
                warn!("Opening manifest of {} instead: {:#}", package, e);
                return Ok(manifest_path);
            }
        };

        match join_relative(&package_dir, &entrypoint) {
            Ok(path) => Ok(path),
            Err(e) => {
                warn!("Opening manifest of {} instead: {:#}", package, e);
                Ok(manifest_path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Version;
    use crate::runtime::{MockRuntime, RealRuntime};
    use crate::test_utils::test_data_dir;
    use mockall::predicate::eq;
    use tempfile::tempdir;

    fn mylib_manifest() -> Manifest {
        Manifest::new("mylib", Version::new(0, 1, 0), "lib.typ").unwrap()
    }

    fn mylib_ref() -> PackageRef {
        PackageRef::local("mylib", Version::new(0, 1, 0)).unwrap()
    }

    fn mylib_dir() -> PathBuf {
        PackageDirs::new(test_data_dir())
            .local_packages_dir()
            .join("mylib")
            .join("0.1.0")
    }

    #[test]
    fn test_create_writes_manifest_and_entry_file() {
        let dir = tempdir().unwrap();
        let runtime = RealRuntime;
        let repo = LocalPackages::new(&runtime, PackageDirs::new(dir.path().to_path_buf()));

        let entry = repo.create(&mylib_manifest()).unwrap();

        let package_dir = dir.path().join("typst/packages/local/mylib/0.1.0");
        assert_eq!(entry, package_dir.join("lib.typ"));
        assert_eq!(
            std::fs::read_to_string(package_dir.join("typst.toml")).unwrap(),
            "[package]\nname = \"mylib\"\nversion = \"0.1.0\"\nentrypoint = \"lib.typ\""
        );
        assert_eq!(std::fs::read_to_string(&entry).unwrap(), "= Hello Typst");
    }

    #[test]
    fn test_create_nested_entrypoint() {
        let dir = tempdir().unwrap();
        let runtime = RealRuntime;
        let repo = LocalPackages::new(&runtime, PackageDirs::new(dir.path().to_path_buf()));
        let manifest = Manifest::new("nested", Version::new(1, 0, 0), "src/lib.typ").unwrap();

        let entry = repo.create(&manifest).unwrap();
        assert!(entry.ends_with("nested/1.0.0/src/lib.typ"));
        assert!(entry.is_file());
    }

    #[test]
    fn test_create_refuses_existing_package() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(mylib_dir().join("typst.toml")))
            .returning(|_| true);
        runtime.expect_create_dir_all().never();
        runtime.expect_write().never();

        let repo = LocalPackages::new(&runtime, PackageDirs::new(test_data_dir()));
        let err = repo.create(&mylib_manifest()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::PackageExists(_))
        ));
    }

    #[test]
    fn test_entry_file_from_manifest() {
        let mut runtime = MockRuntime::new();
        let manifest_path = mylib_dir().join("typst.toml");
        runtime
            .expect_exists()
            .with(eq(manifest_path.clone()))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(manifest_path))
            .returning(|_| Ok(mylib_manifest().to_toml()));

        let repo = LocalPackages::new(&runtime, PackageDirs::new(test_data_dir()));
        assert_eq!(repo.entry_file(&mylib_ref()).unwrap(), mylib_dir().join("lib.typ"));
    }

    #[test]
    fn test_entry_file_missing_manifest() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        let repo = LocalPackages::new(&runtime, PackageDirs::new(test_data_dir()));
        let err = repo.entry_file(&mylib_ref()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ManifestMissing(path)) if path.ends_with("typst.toml")
        ));
    }

    #[test]
    fn test_entry_file_without_entrypoint_opens_manifest() {
        let mut runtime = MockRuntime::new();
        let manifest_path = mylib_dir().join("typst.toml");
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("[package]\nname = \"mylib\"\nversion = \"0.1.0\"".into()));

        let repo = LocalPackages::new(&runtime, PackageDirs::new(test_data_dir()));
        assert_eq!(repo.entry_file(&mylib_ref()).unwrap(), manifest_path);
    }

    #[test]
    fn test_entry_file_with_broken_or_escaping_manifest_opens_manifest() {
        for content in [
            "[package\nentrypoint = ",
            "[package]\nentrypoint = \"../../other/lib.typ\"",
        ] {
            let mut runtime = MockRuntime::new();
            runtime.expect_exists().returning(|_| true);
            let content = content.to_string();
            runtime
                .expect_read_to_string()
                .returning(move |_| Ok(content.clone()));

            let repo = LocalPackages::new(&runtime, PackageDirs::new(test_data_dir()));
            assert_eq!(
                repo.entry_file(&mylib_ref()).unwrap(),
                mylib_dir().join("typst.toml")
            );
        }
    }
}
