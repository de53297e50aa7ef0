//! Thin wrapper over `reqwest` for JSON GET requests.
//!
//! No automatic retries: a failed request is reported to the user, who can
//! simply run the command again.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("typst-sync/", env!("TYPST_SYNC_VERSION"));

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    /// Non-success statuses are errors.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let response = response
            .error_for_status()
            .context("Server returned an error status")?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }
}

/// Build the shared HTTP client.
pub fn build_http_client() -> Result<HttpClient> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(HttpClient::new(client))
}
