//! Package versions and the newest-first ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

/// A `MAJOR.MINOR.PATCH` version with non-negative integer components.
///
/// Parsing is canonical: `"01.0.0"` is rejected, so `to_string()` always
/// reproduces the text that was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Newest-first ordering: `Less` when `self` is newer than `other`.
    pub fn newest_first(&self, other: &Self) -> Ordering {
        other.cmp(self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3
            || parts
                .iter()
                .any(|p| !is_canonical_component(p))
        {
            bail!("Invalid version {:?}. Expected MAJOR.MINOR.PATCH like 0.1.0.", s);
        }

        Ok(Version {
            major: parts[0].parse()?,
            minor: parts[1].parse()?,
            patch: parts[2].parse()?,
        })
    }
}

fn is_canonical_component(part: &str) -> bool {
    !part.is_empty()
        && part.bytes().all(|b| b.is_ascii_digit())
        && (part == "0" || !part.starts_with('0'))
}

/// Compare two version strings newest first.
///
/// Returns `Less` when `a` is newer than `b`. Components are compared as
/// integers; non-numeric or missing components count as `0`, so this accepts
/// whatever the remote index contains.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    lenient_key(b).cmp(&lenient_key(a))
}

fn lenient_key(version: &str) -> [u64; 3] {
    let mut key = [0; 3];
    for (slot, part) in key.iter_mut().zip(version.split('.')) {
        *slot = part.trim().parse().unwrap_or(0);
    }
    key
}
