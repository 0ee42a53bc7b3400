//! HTTP transport shared by the release lookup and the downloader.

use super::config::InstallerConfig;
use super::error::InstallError;
use crate::libs::messages::Message;
use crate::msg_warning;
use reqwest::{tls, Client};
use std::future::Future;

pub struct Http;

impl Http {
    /// Builds a client that refuses anything older than TLS 1.2 and identifies
    /// itself; GitHub rejects requests without a user agent.
    ///
    /// No overall request timeout is set here because downloads can take
    /// arbitrarily long; callers apply per-request or per-chunk limits.
    pub fn client(config: &InstallerConfig) -> Result<Client, InstallError> {
        let client = Client::builder()
            .min_tls_version(tls::Version::TLS_1_2)
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(client)
    }
}

/// Runs `op` up to `retries + 1` times, sleeping with exponential backoff
/// between attempts. Only [`InstallError::Network`] is retried.
pub async fn with_retries<T, F, Fut>(config: &InstallerConfig, mut op: F) -> Result<T, InstallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, InstallError>>,
{
    let max_attempts = config.retries + 1;
    let mut delay = config.retry_backoff();
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                msg_warning!(Message::RetryingRequest {
                    attempt,
                    max: max_attempts,
                    error: e.to_string(),
                });
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
