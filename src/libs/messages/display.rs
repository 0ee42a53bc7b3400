//! Display implementation for installer messages.
//!
//! All user-facing text lives here so the rest of the crate only deals with
//! typed [`Message`] values. The status strings shown while installing are
//! rendered by `libs::status`; these messages cover logs, notifications and
//! the `check` command.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === RELEASE MESSAGES ===
            Message::Connecting(endpoint) => format!("Connecting to {}", endpoint),
            Message::ReleaseFound(tag) => format!("Latest release: {}", tag),
            Message::ReleaseFetchFailed => "Could not reach the release server. Please check your internet connection.".to_string(),
            Message::ReleaseFetchFailedDetail(error) => format!("Release lookup failed: {}", error),
            Message::ReleaseAssetSelected { name, url } => format!("Selected asset {} ({})", name, url),
            Message::RetryingRequest { attempt, max, error } => {
                format!("Attempt {}/{} failed: {}. Retrying...", attempt, max, error)
            }

            // === VERSION MESSAGES ===
            Message::InstalledVersion(version) => format!("Installed version: {}", version),
            Message::NoInstalledVersion => "No existing installation detected".to_string(),
            Message::VersionUpToDate(version) => format!("Version {} is already installed", version),
            Message::VersionDiffers { installed, latest } => {
                format!("Installed version {} differs from latest {}", installed, latest)
            }
            Message::PromptLaunchExisting(version) => {
                format!("Version {} is already installed. Launch it without reinstalling?", version)
            }
            Message::NonInteractiveReinstall => "No terminal attached, reinstalling the current version".to_string(),
            Message::VersionStampWriteFailed(error) => format!("Could not record the installed version: {}", error),
            Message::VersionLookupFailed(error) => format!("Could not read the installed version: {}", error),

            // === DOWNLOAD MESSAGES ===
            Message::DownloadStarted(url) => format!("Downloading {}", url),
            Message::DownloadCompleted { path, bytes } => format!("Downloaded {} bytes to {}", bytes, path),
            Message::DownloadFailed(error) => format!("Download failed: {}", error),
            Message::StatusChannelClosed => "Status receiver closed, continuing without progress updates".to_string(),

            // === PROCESS MESSAGES ===
            Message::TerminatingInstances(name) => format!("Closing running instances of {}", name),
            Message::ProcessTerminated { name, pid } => format!("Terminated {} (PID {})", name, pid),
            Message::ProcessTerminateFailed { name, pid } => format!("Could not terminate {} (PID {})", name, pid),
            Message::ProcessesTerminated(count) => format!("Terminated {} running instance(s)", count),
            Message::NoRunningInstances => "No running instances found".to_string(),

            // === EXTRACTION MESSAGES ===
            Message::Extracting(dir) => format!("Extracting into {}", dir),
            Message::ExtractionCompleted { files, directories } => {
                format!("Extracted {} file(s) and {} folder(s)", files, directories)
            }
            Message::ExtractionFailed(error) => format!("Extraction failed: {}", error),

            // === SHORTCUT MESSAGES ===
            Message::CreatingShortcuts => "Creating desktop shortcuts".to_string(),
            Message::ShortcutCreated(path) => format!("Shortcut created: {}", path),
            Message::ShortcutFailed { name, error } => format!("Could not create shortcut '{}': {}", name, error),
            Message::DesktopDirUnavailable => "Desktop directory not found, skipping shortcuts".to_string(),
            Message::LauncherNotFound(path) => format!("No auxiliary launcher at {}", path),

            // === CLEANUP & LAUNCH MESSAGES ===
            Message::CleanupFailed(error) => format!("Could not remove the downloaded archive: {}", error),
            Message::Launching(exe) => format!("Launching {}", exe),
            Message::LaunchFailed(error) => format!("Could not launch the application: {}", error),
            Message::ExecutableMissing(path) => format!("Executable not found at {}", path),

            // === RESULT MESSAGES ===
            Message::InstallCompleted { app_name, version } => format!("{} {} installed successfully", app_name, version),
            Message::InstallSkipped { app_name, version } => format!("{} {} is already up to date", app_name, version),
            Message::InstallFailed(reason) => format!("Installation failed:\n{}", reason),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigLoaded(path) => format!("Configuration loaded from {}", path),
            Message::ConfigNotFound(path) => format!("Configuration file not found: {}", path),
            Message::ConfigParseError(error) => format!("Failed to parse configuration: {}", error),

            // === CHECK COMMAND ===
            Message::CheckUpdateAvailable => "update available".to_string(),
            Message::CheckUpToDate => "up to date".to_string(),
            Message::CheckNotInstalled => "not installed".to_string(),
        };
        write!(f, "{}", text)
    }
}
