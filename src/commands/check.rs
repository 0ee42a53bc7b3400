use crate::{
    libs::{
        messages::Message,
        release::{GitHubReleaseClient, ReleaseSource},
        version::{installed_version, is_up_to_date},
    },
    msg_debug, msg_error,
};
use anyhow::Result;
use clap::Args;
use prettytable::{row, Table};
use std::path::PathBuf;

#[derive(Debug, Default, Args)]
pub struct CheckArgs {
    #[arg(long, value_name = "DIR", help = "Look for the installation in DIR")]
    pub install_dir: Option<PathBuf>,
    #[arg(long, value_name = "FILE", help = "Read installer settings from FILE")]
    pub config: Option<PathBuf>,
}

/// Status column of the check table.
pub fn decision(latest: &str, installed: Option<&str>) -> Message {
    match installed {
        None => Message::CheckNotInstalled,
        Some(_) if is_up_to_date(latest, installed) => Message::CheckUpToDate,
        Some(_) => Message::CheckUpdateAvailable,
    }
}

/// Prints installed and latest versions side by side. Nothing is changed.
pub async fn cmd(args: CheckArgs) -> Result<i32> {
    let (config, paths) = super::load_setup(args.config.as_deref(), args.install_dir)?;

    let release = match GitHubReleaseClient::new(&config)?.fetch_latest().await {
        Ok(release) => release,
        Err(e) => {
            msg_debug!(Message::ReleaseFetchFailedDetail(e.to_string()));
            msg_error!(Message::ReleaseFetchFailed);
            return Ok(e.exit_code());
        }
    };
    let installed = installed_version(&paths);

    let mut table = Table::new();
    table.add_row(row!["APPLICATION", "INSTALLED", "LATEST", "STATUS", "LOCATION"]);
    table.add_row(row![
        config.app_name,
        installed.as_deref().unwrap_or("-"),
        release.tag,
        decision(&release.tag, installed.as_deref()),
        paths.install_dir.display()
    ]);
    table.printstd();

    Ok(0)
}
