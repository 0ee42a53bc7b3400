//! Streaming download of the release archive with progress reporting.

use super::config::InstallerConfig;
use super::error::InstallError;
use super::http::{with_retries, Http};
use super::status::{InstallStatus, StatusSender};
use crate::libs::messages::Message;
use crate::msg_debug;
use reqwest::Client;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

/// Progress is reported at least this often when the total size is unknown.
const UNKNOWN_LENGTH_REPORT_BYTES: u64 = 256 * 1024;

/// Fetches a remote artifact into a local file.
pub trait ArtifactFetcher {
    /// Writes `url` to `dest`, replacing whatever is there, and returns the
    /// number of bytes written. On error `dest` may hold a partial file.
    fn download(
        &self,
        url: &str,
        dest: &Path,
        expected_size: Option<u64>,
        progress: &StatusSender,
    ) -> impl Future<Output = Result<u64, InstallError>> + Send;
}

/// Turns byte counts into whole-percent updates, emitting only on change.
#[derive(Debug)]
pub struct ProgressTracker {
    total: Option<u64>,
    received: u64,
    last_percent: Option<u8>,
    last_report_bytes: u64,
}

impl ProgressTracker {
    pub fn new(total: Option<u64>) -> Self {
        let total = total.filter(|total| *total > 0);
        Self {
            total,
            received: 0,
            last_percent: total.map(|_| 0),
            last_report_bytes: 0,
        }
    }

    /// The status to publish before the first byte arrives.
    pub fn initial(&self) -> InstallStatus {
        InstallStatus::Downloading(self.last_percent)
    }

    /// Records `len` more bytes and returns the status to publish, if any.
    pub fn advance(&mut self, len: u64) -> Option<InstallStatus> {
        self.received += len;
        match self.total {
            Some(total) => {
                let percent = (self.received.saturating_mul(100) / total).min(100) as u8;
                if self.last_percent == Some(percent) {
                    return None;
                }
                self.last_percent = Some(percent);
                Some(InstallStatus::Downloading(Some(percent)))
            }
            None => {
                if self.received - self.last_report_bytes < UNKNOWN_LENGTH_REPORT_BYTES {
                    return None;
                }
                self.last_report_bytes = self.received;
                Some(InstallStatus::Downloading(None))
            }
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}

/// Downloads over HTTPS with the shared client settings.
#[derive(Clone, Debug)]
pub struct HttpDownloader {
    client: Client,
    config: InstallerConfig,
}

impl HttpDownloader {
    pub fn new(config: &InstallerConfig) -> Result<Self, InstallError> {
        Ok(Self {
            client: Http::client(config)?,
            config: config.clone(),
        })
    }

    async fn download_once(
        &self,
        url: &str,
        dest: &Path,
        expected_size: Option<u64>,
        progress: &StatusSender,
    ) -> Result<u64, InstallError> {
        let inactivity = self.config.inactivity_timeout();

        let mut response = match timeout(inactivity, self.client.get(url).send()).await {
            Ok(response) => response?,
            Err(_) => return Err(stalled(inactivity, 0)),
        };
        let status = response.status();
        if !status.is_success() {
            return Err(InstallError::Network(format!("download returned HTTP {}", status)));
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| InstallError::io_at("create", parent, e))?;
        }
        let mut file = File::create(dest).await.map_err(|e| InstallError::io_at("create", dest, e))?;

        let mut tracker = ProgressTracker::new(response.content_length().or(expected_size));
        progress.send(tracker.initial());

        loop {
            let chunk = match timeout(inactivity, response.chunk()).await {
                Ok(Ok(Some(chunk))) => chunk,
                Ok(Ok(None)) => break,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(stalled(inactivity, tracker.received())),
            };

            file.write_all(&chunk).await.map_err(|e| InstallError::io_at("write", dest, e))?;
            if let Some(update) = tracker.advance(chunk.len() as u64) {
                progress.send(update);
            }
        }

        file.flush().await.map_err(|e| InstallError::io_at("write", dest, e))?;
        Ok(tracker.received())
    }
}

fn stalled(inactivity: Duration, received: u64) -> InstallError {
    InstallError::Network(format!(
        "no data received for {} seconds after {} bytes",
        inactivity.as_secs(),
        received
    ))
}

impl ArtifactFetcher for HttpDownloader {
    async fn download(
        &self,
        url: &str,
        dest: &Path,
        expected_size: Option<u64>,
        progress: &StatusSender,
    ) -> Result<u64, InstallError> {
        msg_debug!(Message::DownloadStarted(url.to_string()));
        let bytes = with_retries(&self.config, || self.download_once(url, dest, expected_size, progress)).await?;
        msg_debug!(Message::DownloadCompleted {
            path: dest.display().to_string(),
            bytes,
        });
        Ok(bytes)
    }
}
