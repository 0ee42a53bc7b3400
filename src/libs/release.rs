//! Latest-release lookup against the GitHub REST API.

use super::config::InstallerConfig;
use super::error::InstallError;
use super::http::{with_retries, Http};
use crate::libs::messages::Message;
use crate::msg_debug;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::future::Future;

/// Version tag and download location of the asset to install.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub tag: String,
    pub download_url: String,
    /// Advertised asset size, used when the download response has no length.
    pub size: Option<u64>,
}

/// Anything that can answer "what is the latest release?".
pub trait ReleaseSource {
    fn fetch_latest(&self) -> impl Future<Output = Result<ReleaseInfo, InstallError>> + Send;
}

#[derive(Deserialize, Debug)]
struct Release {
    tag_name: Option<String>,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Deserialize, Debug)]
struct Asset {
    name: String,
    browser_download_url: String,
    #[serde(default)]
    size: Option<u64>,
}

/// Picks the tag and the asset named `asset_name` out of a release document.
///
/// An exact asset name match wins; otherwise any asset whose download URL
/// ends in `/<asset_name>` is accepted.
pub fn parse_release(body: &str, asset_name: &str) -> Result<ReleaseInfo, InstallError> {
    let release: Release = serde_json::from_str(body).map_err(|e| InstallError::Parse(e.to_string()))?;

    let tag = release
        .tag_name
        .filter(|tag| !tag.is_empty())
        .ok_or_else(|| InstallError::NotFound("release has no tag_name".to_string()))?;

    let url_suffix = format!("/{}", asset_name);
    let asset = release
        .assets
        .iter()
        .find(|asset| asset.name == asset_name)
        .or_else(|| release.assets.iter().find(|asset| asset.browser_download_url.ends_with(&url_suffix)))
        .ok_or_else(|| InstallError::NotFound(format!("release {} has no asset named {}", tag, asset_name)))?;

    msg_debug!(Message::ReleaseAssetSelected {
        name: asset.name.clone(),
        url: asset.browser_download_url.clone(),
    });

    Ok(ReleaseInfo {
        tag,
        download_url: asset.browser_download_url.clone(),
        size: asset.size,
    })
}

/// Queries `GET /repos/<owner>/<repo>/releases/latest`.
#[derive(Clone, Debug)]
pub struct GitHubReleaseClient {
    client: Client,
    config: InstallerConfig,
}

impl GitHubReleaseClient {
    pub fn new(config: &InstallerConfig) -> Result<Self, InstallError> {
        Ok(Self {
            client: Http::client(config)?,
            config: config.clone(),
        })
    }

    async fn fetch_once(&self) -> Result<ReleaseInfo, InstallError> {
        let response = self
            .client
            .get(self.config.releases_url())
            .header(header::ACCEPT, "application/vnd.github+json")
            .timeout(self.config.request_timeout())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(InstallError::NotFound(format!(
                "no published release for {}/{}",
                self.config.owner, self.config.repo
            )));
        }
        if !status.is_success() {
            return Err(InstallError::Network(format!("release API returned HTTP {}", status)));
        }

        let body = response.text().await?;
        parse_release(&body, &self.config.asset_name)
    }
}

impl ReleaseSource for GitHubReleaseClient {
    async fn fetch_latest(&self) -> Result<ReleaseInfo, InstallError> {
        msg_debug!(Message::Connecting(self.config.releases_url()));
        with_retries(&self.config, || self.fetch_once()).await
    }
}
