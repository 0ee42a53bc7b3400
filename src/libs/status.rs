//! Progress reporting from the install workflow to whoever presents it.
//!
//! The workflow runs on its own task and only ever *sends* [`InstallStatus`]
//! values; the presentation side owns the receiver and decides how to draw
//! them. Sending never blocks and never fails the workflow.

use crate::libs::messages::Message;
use crate::msg_debug;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallStatus {
    Connecting,
    /// Remote release tag.
    VersionFound(String),
    /// The installed version already matches the remote tag.
    UpToDate(String),
    /// Percent complete, `None` when the server did not send a length.
    Downloading(Option<u8>),
    TerminatingPriorInstance,
    Installing,
    CreatingShortcuts,
    CleaningUp,
    Launching,
    Done,
    Failed(String),
}

impl fmt::Display for InstallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallStatus::Connecting => write!(f, "Connecting to server..."),
            InstallStatus::VersionFound(tag) => write!(f, "Version found: {}", tag),
            InstallStatus::UpToDate(tag) => write!(f, "{} is already installed", tag),
            InstallStatus::Downloading(Some(percent)) => write!(f, "Downloading files... {}%", percent),
            InstallStatus::Downloading(None) => write!(f, "Downloading files..."),
            InstallStatus::TerminatingPriorInstance => write!(f, "Closing running application..."),
            InstallStatus::Installing => write!(f, "Installing..."),
            InstallStatus::CreatingShortcuts => write!(f, "Creating shortcuts..."),
            InstallStatus::CleaningUp => write!(f, "Cleaning up..."),
            InstallStatus::Launching => write!(f, "Launching..."),
            InstallStatus::Done => write!(f, "Done"),
            InstallStatus::Failed(reason) => write!(f, "Failed: {}", reason),
        }
    }
}

/// Sending half of the status channel. Cheap to clone.
#[derive(Clone, Debug)]
pub struct StatusSender {
    tx: UnboundedSender<InstallStatus>,
    disabled: Arc<AtomicBool>,
}

impl StatusSender {
    /// Best-effort send. A dropped receiver is noted once and then ignored.
    pub fn send(&self, status: InstallStatus) {
        if self.disabled.load(Ordering::Relaxed) {
            return;
        }
        if self.tx.send(status).is_err() {
            msg_debug!(Message::StatusChannelClosed);
            self.disabled.store(true, Ordering::Relaxed);
        }
    }

    /// A sender whose receiver is already gone, for callers that do not
    /// care about progress.
    pub fn detached() -> Self {
        let (tx, _) = status_channel();
        tx
    }
}

pub fn status_channel() -> (StatusSender, UnboundedReceiver<InstallStatus>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        StatusSender {
            tx,
            disabled: Arc::new(AtomicBool::new(false)),
        },
        rx,
    )
}

/// Terminal presentation: one progress bar plus a status line.
pub struct ConsoleRenderer {
    bar: ProgressBar,
}

impl ConsoleRenderer {
    pub fn new(app_name: &str) -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos:>3}%  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        bar.set_style(style);
        bar.set_prefix(app_name.to_string());
        Self { bar }
    }

    pub fn render(&self, status: &InstallStatus) {
        match status {
            InstallStatus::Downloading(Some(percent)) => self.bar.set_position(u64::from(*percent)),
            InstallStatus::Downloading(None) => self.bar.tick(),
            InstallStatus::Connecting => self.bar.set_position(0),
            InstallStatus::Done => self.bar.set_position(100),
            _ => {}
        }
        match status {
            InstallStatus::Done => self.bar.finish_with_message(status.to_string()),
            InstallStatus::Failed(_) => self.bar.abandon_with_message(status.to_string()),
            _ => self.bar.set_message(status.to_string()),
        }
    }

    /// Drains the channel until every sender is dropped.
    pub async fn run(self, mut rx: UnboundedReceiver<InstallStatus>) {
        while let Some(status) = rx.recv().await {
            self.render(&status);
        }
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
