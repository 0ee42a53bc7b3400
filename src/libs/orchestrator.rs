//! The install workflow: every step in strict order, one error boundary.
//!
//! ```text
//! Connecting -> VersionDecision -> Downloading -> TerminatingPriorInstance
//!   -> Extracting -> ProvisioningShortcuts -> Cleanup -> Launching -> Done
//! ```
//!
//! Metadata, download and extraction failures end the run in `Failed`.
//! Process termination, shortcuts, cleanup and launch are best-effort: their
//! errors are logged and the run carries on. When the installed version
//! already matches, the run may jump straight to `Launching`.

use super::archive::{self, ExtractSummary};
use super::config::InstallerConfig;
use super::download::ArtifactFetcher;
use super::error::InstallError;
use super::launcher::launch_detached;
use super::paths::InstallPaths;
use super::process::terminate_running_instances;
use super::release::{ReleaseInfo, ReleaseSource};
use super::shortcut::{ShortcutCreator, ShortcutProvisioner};
use super::status::{InstallStatus, StatusSender};
use super::version::{self, VersionStamp};
use crate::libs::messages::Message;
use crate::{msg_debug, msg_info, msg_warning};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::fmt;
use std::io::IsTerminal;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    VersionDecision,
    Downloading,
    TerminatingPriorInstance,
    Extracting,
    ProvisioningShortcuts,
    Cleanup,
    Launching,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Connecting => "release lookup",
            Phase::VersionDecision => "version check",
            Phase::Downloading => "download",
            Phase::TerminatingPriorInstance => "process termination",
            Phase::Extracting => "extraction",
            Phase::ProvisioningShortcuts => "shortcut creation",
            Phase::Cleanup => "cleanup",
            Phase::Launching => "launch",
        };
        f.write_str(name)
    }
}

/// What to do when the installed version already matches the release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SkipPolicy {
    /// Ask on the terminal; reinstall when there is no terminal.
    #[default]
    Ask,
    Reinstall,
    LaunchExisting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallOptions {
    pub skip_policy: SkipPolicy,
    /// Start the application at the end of the run.
    pub launch: bool,
    pub shortcuts: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            skip_policy: SkipPolicy::Ask,
            launch: true,
            shortcuts: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { version: String, extracted: ExtractSummary },
    /// The matching version was kept as is.
    Skipped { version: String },
}

/// A fatal error together with the step it happened in.
#[derive(Debug, Error)]
#[error("{phase} failed: {error}")]
pub struct InstallFailure {
    pub phase: Phase,
    #[source]
    pub error: InstallError,
}

impl InstallFailure {
    pub fn new(phase: Phase, error: InstallError) -> Self {
        Self { phase, error }
    }

    /// `2` release lookup, `3` download, `4` extraction, `5` a traversal
    /// attempt wherever it was detected.
    pub fn exit_code(&self) -> i32 {
        match (&self.error, self.phase) {
            (InstallError::PathTraversal(_), _) => 5,
            (_, Phase::Connecting) => 2,
            (_, Phase::Downloading) => 3,
            (_, Phase::Extracting) => 4,
            (error, _) => error.exit_code(),
        }
    }

    /// Every release lookup failure reads the same to the user; the detail
    /// goes to the log.
    pub fn user_message(&self) -> String {
        match self.phase {
            Phase::Connecting => Message::ReleaseFetchFailed.to_string(),
            _ => self.to_string(),
        }
    }
}

pub struct InstallOrchestrator<R, F, S> {
    config: InstallerConfig,
    paths: InstallPaths,
    source: R,
    fetcher: F,
    shortcuts: ShortcutProvisioner<S>,
    options: InstallOptions,
    status: StatusSender,
}

impl<R, F, S> InstallOrchestrator<R, F, S>
where
    R: ReleaseSource,
    F: ArtifactFetcher,
    S: ShortcutCreator,
{
    pub fn new(
        config: InstallerConfig,
        paths: InstallPaths,
        source: R,
        fetcher: F,
        shortcuts: ShortcutProvisioner<S>,
        options: InstallOptions,
        status: StatusSender,
    ) -> Self {
        Self {
            config,
            paths,
            source,
            fetcher,
            shortcuts,
            options,
            status,
        }
    }

    /// Runs the workflow once. `Done` or `Failed` is always the last status
    /// sent.
    pub async fn run(&self) -> Result<InstallOutcome, InstallFailure> {
        match self.run_phases().await {
            Ok(outcome) => {
                self.status.send(InstallStatus::Done);
                Ok(outcome)
            }
            Err(failure) => {
                if failure.phase == Phase::Connecting {
                    msg_debug!(Message::ReleaseFetchFailedDetail(failure.error.to_string()));
                }
                self.status.send(InstallStatus::Failed(failure.user_message()));
                Err(failure)
            }
        }
    }

    async fn run_phases(&self) -> Result<InstallOutcome, InstallFailure> {
        self.status.send(InstallStatus::Connecting);
        let release = self
            .source
            .fetch_latest()
            .await
            .map_err(|e| InstallFailure::new(Phase::Connecting, e))?;
        msg_debug!(Message::ReleaseFound(release.tag.clone()));
        self.status.send(InstallStatus::VersionFound(release.tag.clone()));

        if self.keep_installed_version(&release).await {
            self.launch();
            return Ok(InstallOutcome::Skipped { version: release.tag });
        }

        self.fetcher
            .download(&release.download_url, &self.paths.temp_archive_path, release.size, &self.status)
            .await
            .map_err(|e| {
                msg_debug!(Message::DownloadFailed(e.to_string()));
                InstallFailure::new(Phase::Downloading, e)
            })?;

        self.status.send(InstallStatus::TerminatingPriorInstance);
        self.terminate_prior_instance().await;

        self.status.send(InstallStatus::Installing);
        let extracted = self
            .extract()
            .await
            .map_err(|e| InstallFailure::new(Phase::Extracting, e))?;
        if let Err(e) = VersionStamp::new(&release.tag).write(&self.paths.install_dir) {
            msg_warning!(Message::VersionStampWriteFailed(e.to_string()));
        }

        if self.options.shortcuts {
            self.status.send(InstallStatus::CreatingShortcuts);
            self.shortcuts.provision(&self.paths, &self.config);
        }

        self.status.send(InstallStatus::CleaningUp);
        self.cleanup();

        self.launch();
        Ok(InstallOutcome::Installed {
            version: release.tag,
            extracted,
        })
    }

    /// `true` when the installed copy matches `release` and should be kept.
    async fn keep_installed_version(&self, release: &ReleaseInfo) -> bool {
        let installed = version::installed_version(&self.paths);
        match installed.as_deref() {
            Some(local) => msg_debug!(Message::InstalledVersion(local.to_string())),
            None => msg_debug!(Message::NoInstalledVersion),
        }

        if !version::is_up_to_date(&release.tag, installed.as_deref()) {
            if let Some(local) = installed {
                msg_debug!(Message::VersionDiffers {
                    installed: local,
                    latest: release.tag.clone(),
                });
            }
            return false;
        }

        msg_debug!(Message::VersionUpToDate(release.tag.clone()));
        self.status.send(InstallStatus::UpToDate(release.tag.clone()));
        match self.options.skip_policy {
            SkipPolicy::Reinstall => false,
            SkipPolicy::LaunchExisting => true,
            SkipPolicy::Ask => {
                let tag = release.tag.clone();
                tokio::task::spawn_blocking(move || ask_launch_existing(&tag))
                    .await
                    .unwrap_or(false)
            }
        }
    }

    async fn terminate_prior_instance(&self) {
        let base_name = self.paths.executable_base_name();
        match tokio::task::spawn_blocking(move || terminate_running_instances(&base_name)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => msg_warning!(e),
            Err(e) => msg_warning!(InstallError::Process(e.to_string())),
        }
    }

    async fn extract(&self) -> Result<ExtractSummary, InstallError> {
        let install_dir = self.paths.install_dir.clone();
        let archive_path = self.paths.temp_archive_path.clone();
        msg_debug!(Message::Extracting(install_dir.display().to_string()));

        tokio::fs::create_dir_all(&install_dir)
            .await
            .map_err(|e| InstallError::io_at("create", &install_dir, e))?;

        let summary = tokio::task::spawn_blocking(move || archive::extract(&archive_path, &install_dir))
            .await
            .map_err(|e| InstallError::Process(format!("extraction task failed: {}", e)))?
            .inspect_err(|e| msg_debug!(Message::ExtractionFailed(e.to_string())))?;

        msg_debug!(Message::ExtractionCompleted {
            files: summary.files,
            directories: summary.directories,
        });
        Ok(summary)
    }

    fn cleanup(&self) {
        let archive = &self.paths.temp_archive_path;
        match std::fs::remove_file(archive) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => msg_warning!(Message::CleanupFailed(InstallError::io_at("remove", archive, e).to_string())),
        }
    }

    fn launch(&self) {
        if !self.options.launch {
            return;
        }
        let exe = self.paths.executable_path();
        if !exe.is_file() {
            msg_warning!(Message::ExecutableMissing(exe.display().to_string()));
            return;
        }

        self.status.send(InstallStatus::Launching);
        msg_debug!(Message::Launching(exe.display().to_string()));
        if let Err(e) = launch_detached(&exe, &self.paths.install_dir) {
            msg_warning!(Message::LaunchFailed(e.to_string()));
        }
    }
}

/// Asks whether to launch the matching installed version instead of
/// reinstalling it.
fn ask_launch_existing(version: &str) -> bool {
    if !std::io::stdin().is_terminal() {
        msg_info!(Message::NonInteractiveReinstall);
        return false;
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptLaunchExisting(version.to_string()).to_string())
        .default(true)
        .interact()
        .unwrap_or(false)
}
