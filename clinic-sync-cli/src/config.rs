//! Process configuration
//!
//! Everything the commands need — integration token, data source ids, API
//! options — lives in one struct loaded at startup and passed down
//! explicitly. Nothing reads ambient state after `SyncConfig::load`
//! returns, which keeps every component testable with injected fakes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::api::NotionClient;
use crate::api::constants::{BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, NOTION_VERSION};
use crate::reports::ReportKind;

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Integration token ("secret_..."). The NOTION_TOKEN environment
    /// variable overrides the file value.
    #[serde(default)]
    pub api_token: String,
    pub datasets: Datasets,
    #[serde(default)]
    pub api: ApiOptions,
}

/// Data source ids of the two synchronized datasets.
#[derive(Debug, Clone, Deserialize)]
pub struct Datasets {
    pub reservation: String,
    pub billing: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiOptions {
    pub base_url: String,
    pub notion_version: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            notion_version: NOTION_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SyncConfig {
    /// Load from an explicit path, or from
    /// `<config dir>/clinic-sync/config.toml` when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_path()?,
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        override_token(&mut config, std::env::var("NOTION_TOKEN").ok());
        if config.api_token.trim().is_empty() {
            bail!(
                "No integration token: set api_token in {} or the NOTION_TOKEN environment variable",
                path.display()
            );
        }
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid config syntax")
    }

    pub fn data_source_id(&self, report: ReportKind) -> &str {
        match report {
            ReportKind::Reservation => &self.datasets.reservation,
            ReportKind::Billing => &self.datasets.billing,
        }
    }

    /// Build the blocking API client from these options.
    pub fn client(&self) -> Result<NotionClient> {
        NotionClient::with_options(
            &self.api_token,
            &self.api.base_url,
            &self.api.notion_version,
            Duration::from_secs(self.api.timeout_secs),
        )
        .context("Failed to build HTTP client")
    }
}

fn override_token(config: &mut SyncConfig, token: Option<String>) {
    if let Some(token) = token {
        if !token.trim().is_empty() {
            config.api_token = token;
        }
    }
}

fn default_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(dir.join("clinic-sync").join("config.toml"))
}
