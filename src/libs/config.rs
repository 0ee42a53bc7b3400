//! Installer configuration.
//!
//! Every field has a built-in default derived from the `[package.metadata]`
//! table in `Cargo.toml`, so the installer runs without any configuration file.
//! An optional `installer.json` in the installer's data directory (or a file
//! passed with `--config`) overrides individual fields; absent fields keep
//! their defaults.
//!
//! ```json
//! {
//!   "owner": "akncnkoc",
//!   "repo": "techatlas",
//!   "retries": 4,
//!   "inactivity_timeout_secs": 120
//! }
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::meta::{
    APP_METADATA_APP_NAME, APP_METADATA_ASSET, APP_METADATA_DESCRIPTION, APP_METADATA_EXECUTABLE,
    APP_METADATA_LAUNCHER, APP_METADATA_OWNER, APP_METADATA_REPO,
};
use crate::{msg_bail_anyhow, msg_debug};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration file name inside the installer's data directory.
pub const CONFIG_FILE_NAME: &str = "installer.json";

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "TechAtlasInstaller";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InstallerConfig {
    /// GitHub account that publishes the releases.
    pub owner: String,
    /// GitHub repository that publishes the releases.
    pub repo: String,
    /// File name of the release asset to install, e.g. `techatlas.zip`.
    pub asset_name: String,
    /// Display name; also the install folder and the main shortcut name.
    pub app_name: String,
    /// Main executable inside the archive, e.g. `techatlas.exe`.
    pub executable_name: String,
    /// Optional secondary entry point that gets its own desktop shortcut.
    pub launcher_name: Option<String>,
    /// Shortcut description.
    pub description: String,
    /// REST API root, overridable for GitHub Enterprise or tests.
    pub api_base_url: String,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for the release metadata call.
    pub request_timeout_secs: u64,
    /// Longest tolerated gap between two download chunks.
    pub inactivity_timeout_secs: u64,
    /// Extra attempts after a network failure.
    pub retries: u32,
    /// Delay before the first retry, doubled on each further attempt.
    pub retry_backoff_ms: u64,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        InstallerConfig {
            owner: APP_METADATA_OWNER.to_string(),
            repo: APP_METADATA_REPO.to_string(),
            asset_name: APP_METADATA_ASSET.to_string(),
            app_name: APP_METADATA_APP_NAME.to_string(),
            executable_name: APP_METADATA_EXECUTABLE.to_string(),
            launcher_name: Some(APP_METADATA_LAUNCHER.to_string()).filter(|name| !name.is_empty()),
            description: APP_METADATA_DESCRIPTION.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_secs: 30,
            request_timeout_secs: 30,
            inactivity_timeout_secs: 300,
            retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl InstallerConfig {
    /// Reads `installer.json` from the data directory, or returns defaults
    /// when the file does not exist.
    pub fn read() -> Result<Self> {
        let config_file_path = DataStorage::new().base_path().join(CONFIG_FILE_NAME);
        if !config_file_path.exists() {
            return Ok(Self::default());
        }
        Self::read_from(&config_file_path)
    }

    /// Reads an explicit configuration file. The file must exist.
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            msg_bail_anyhow!(Message::ConfigNotFound(path.display().to_string()));
        }
        let config_str = fs::read_to_string(path)?;
        let config: InstallerConfig = match serde_json::from_str(&config_str) {
            Ok(config) => config,
            Err(e) => msg_bail_anyhow!(Message::ConfigParseError(e.to_string())),
        };
        msg_debug!(Message::ConfigLoaded(path.display().to_string()));
        Ok(config)
    }

    /// Writes the configuration to the data directory.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_str = serde_json::to_string_pretty(self)?;
        fs::write(config_file_path, config_str)?;
        Ok(())
    }

    /// `https://api.github.com/repos/<owner>/<repo>/releases/latest`
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base_url.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
