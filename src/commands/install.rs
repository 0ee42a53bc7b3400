use crate::{
    libs::{
        download::HttpDownloader,
        messages::Message,
        orchestrator::{InstallOptions, InstallOrchestrator, InstallOutcome, SkipPolicy},
        release::GitHubReleaseClient,
        shortcut::{PlatformShortcuts, ShortcutProvisioner},
        status::{status_channel, ConsoleRenderer},
    },
    msg_error, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Default, Args)]
pub struct InstallArgs {
    #[arg(long, conflicts_with = "launch_existing", help = "Reinstall even if the latest version is already installed")]
    pub reinstall: bool,
    #[arg(long, help = "Launch the installed copy if it is already the latest version")]
    pub launch_existing: bool,
    #[arg(long, help = "Do not start the application after installing")]
    pub no_launch: bool,
    #[arg(long, help = "Do not create desktop shortcuts")]
    pub no_shortcuts: bool,
    #[arg(long, value_name = "DIR", help = "Install into DIR instead of the per-user data directory")]
    pub install_dir: Option<PathBuf>,
    #[arg(long, value_name = "FILE", help = "Read installer settings from FILE")]
    pub config: Option<PathBuf>,
}

impl InstallArgs {
    pub fn options(&self) -> InstallOptions {
        let skip_policy = if self.reinstall {
            SkipPolicy::Reinstall
        } else if self.launch_existing {
            SkipPolicy::LaunchExisting
        } else {
            SkipPolicy::Ask
        };
        InstallOptions {
            skip_policy,
            launch: !self.no_launch,
            shortcuts: !self.no_shortcuts,
        }
    }
}

/// Runs the full install and returns the process exit code.
pub async fn cmd(args: InstallArgs) -> Result<i32> {
    let (config, paths) = super::load_setup(args.config.as_deref(), args.install_dir.clone())?;
    let app_name = config.app_name.clone();

    let source = GitHubReleaseClient::new(&config)?;
    let fetcher = HttpDownloader::new(&config)?;
    let shortcuts = ShortcutProvisioner::for_desktop(PlatformShortcuts);
    let (status, rx) = status_channel();

    let renderer = tokio::spawn(ConsoleRenderer::new(&app_name).run(rx));
    let orchestrator = InstallOrchestrator::new(config, paths, source, fetcher, shortcuts, args.options(), status);
    let outcome = orchestrator.run().await;
    // Dropping the orchestrator closes the status channel and ends the renderer.
    drop(orchestrator);
    renderer.await?;

    match outcome {
        Ok(InstallOutcome::Installed { version, .. }) => {
            msg_success!(Message::InstallCompleted { app_name, version });
            Ok(0)
        }
        Ok(InstallOutcome::Skipped { version }) => {
            msg_info!(Message::InstallSkipped { app_name, version });
            Ok(0)
        }
        Err(failure) => {
            msg_error!(Message::InstallFailed(failure.user_message()));
            Ok(failure.exit_code())
        }
    }
}
