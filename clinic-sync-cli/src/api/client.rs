//! Blocking HTTP client for the Notion API

use reqwest::blocking::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use super::constants::{BASE_URL, DEFAULT_TIMEOUT_SECS, NOTION_VERSION};
use super::error::ApiError;

/// Thin wrapper around a blocking reqwest client carrying the bearer token
/// and versioning header required on every call.
///
/// All calls are sequential blocking round-trips with a bounded timeout; a
/// timed-out call surfaces as [`ApiError::Transport`] and aborts the
/// enclosing operation like any other failure. No retries happen at this
/// layer.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
    token: String,
    notion_version: String,
}

impl NotionClient {
    /// Client against the production API with default options.
    pub fn new(token: &str) -> Result<Self, ApiError> {
        Self::with_options(
            token,
            BASE_URL,
            NOTION_VERSION,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_options(
        token: &str,
        base_url: &str,
        notion_version: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            notion_version: notion_version.to_string(),
        })
    }

    pub(crate) fn get(&self, path: &str) -> Result<Response, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.notion_version)
            .send()?;
        Ok(response)
    }

    pub(crate) fn post(&self, path: &str, body: &Value) -> Result<Response, ApiError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.notion_version)
            .json(body)
            .send()?;
        Ok(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client =
            NotionClient::with_options("tok", "https://example.test/v1/", "2025-09-03", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.url("pages"), "https://example.test/v1/pages");
        assert_eq!(client.url("/pages"), "https://example.test/v1/pages");
    }
}
