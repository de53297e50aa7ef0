//! HTTP client used to fetch the remote package index.

mod client;

pub use client::{HttpClient, build_http_client};
