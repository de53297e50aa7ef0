//! Path construction from untrusted name segments.
//!
//! Package names, versions and entrypoints come from prompts, the command line
//! and manifest files. They are joined onto directory paths only through these
//! helpers, which reject anything that is not a plain relative component.

use anyhow::{Result, bail};
use std::path::{Component, Path, PathBuf};

/// Join exactly one path component onto `base`.
///
/// Fails if `segment` is empty, contains a separator, or is `.`/`..`.
pub fn join_segment(base: &Path, segment: &str) -> Result<PathBuf> {
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == segment => Ok(base.join(part)),
        _ => bail!("Invalid path segment: {:?}", segment),
    }
}

/// Join a relative path of one or more plain components onto `base`.
///
/// Fails on absolute paths, drive prefixes, `.` and `..` components, so the
/// result always stays under `base`.
pub fn join_relative(base: &Path, relative: &str) -> Result<PathBuf> {
    if relative.is_empty() {
        bail!("Empty relative path");
    }

    let mut result = base.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => result.push(part),
            _ => bail!("Path {:?} must stay inside {}", relative, base.display()),
        }
    }
    Ok(result)
}
