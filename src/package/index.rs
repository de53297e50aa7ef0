//! The remote preview package index.
//!
//! The index is a JSON array with one row per published version:
//!
//! ```json
//! [
//!   {
//!     "name": "acrostiche",
//!     "version": "0.1.0",
//!     "entrypoint": "acrostiche.typ",
//!     "authors": ["Grizzly"],
//!     "license": "MIT",
//!     "description": "Manage acronyms and their definitions in Typst."
//!   }
//! ]
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::error::Error;
use crate::http::HttpClient;

use super::{Namespace, compare_versions, reference::import_statement};

/// Where the preview index is published.
pub const PREVIEW_INDEX_URL: &str = "https://packages.typst.org/preview/index.json";

/// One row of the index. Fields other than these three are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageIndexEntry {
    pub name: String,
    pub version: String,
    pub entrypoint: String,
}

impl PackageIndexEntry {
    /// `@preview/{name}:{version}`
    pub fn reference(&self) -> String {
        format!("@{}/{}:{}", Namespace::Preview, self.name, self.version)
    }

    pub fn import_statement(&self) -> String {
        import_statement(&self.reference())
    }
}

/// Source of index rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// Fetch every row. Failures are reported as [`Error::IndexFetch`].
    async fn fetch(&self) -> Result<Vec<PackageIndexEntry>>;
}

/// The hosted preview index, fetched over HTTP.
pub struct PreviewIndex {
    client: HttpClient,
    url: String,
}

impl PreviewIndex {
    pub fn new(client: HttpClient, url: Option<String>) -> Self {
        Self {
            client,
            url: url.unwrap_or_else(|| PREVIEW_INDEX_URL.to_string()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PackageIndex for PreviewIndex {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self) -> Result<Vec<PackageIndexEntry>> {
        self.client
            .get_json::<Vec<PackageIndexEntry>>(&self.url)
            .await
            .map_err(|e| {
                Error::IndexFetch {
                    url: self.url.clone(),
                    reason: format!("{:#}", e),
                }
                .into()
            })
    }
}

/// Keep the highest version of each package, ordered by name.
///
/// Versions are compared with [`compare_versions`]; on a tie the entry seen
/// first wins.
pub fn newest_per_name(entries: Vec<PackageIndexEntry>) -> Vec<PackageIndexEntry> {
    let mut newest: BTreeMap<String, PackageIndexEntry> = BTreeMap::new();

    for entry in entries {
        match newest.get(&entry.name) {
            Some(current) if compare_versions(&entry.version, &current.version) != Ordering::Less => {}
            _ => {
                newest.insert(entry.name.clone(), entry);
            }
        }
    }

    newest.into_values().collect()
}

/// Fetch the index and reduce it to the newest version of every package.
#[tracing::instrument(skip(index))]
pub async fn list_preview_packages<I: PackageIndex + ?Sized>(
    index: &I,
) -> Result<Vec<PackageIndexEntry>> {
    let entries = index.fetch().await?;
    debug!("Fetched {} index entries", entries.len());
    Ok(newest_per_name(entries))
}
