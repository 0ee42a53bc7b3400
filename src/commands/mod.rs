pub mod check;
pub mod install;

use crate::libs::{config::InstallerConfig, paths::InstallPaths};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Install or update the application (default)")]
    Install(install::InstallArgs),
    #[command(about = "Compare the installed version with the latest release")]
    Check(check::CheckArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    install: install::InstallArgs,
}

impl Cli {
    /// Parses the command line, runs the command and returns the exit code.
    pub async fn menu() -> i32 {
        let cli = Self::parse();
        let result = match cli.command {
            Some(Commands::Install(args)) => install::cmd(args).await,
            Some(Commands::Check(args)) => check::cmd(args).await,
            None => install::cmd(cli.install).await,
        };

        match result {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{}", e);
                1
            }
        }
    }
}

/// Loads the configuration (explicit file or the default location) and
/// resolves the install paths, honoring an install directory override.
pub(crate) fn load_setup(config_path: Option<&Path>, install_dir: Option<PathBuf>) -> Result<(InstallerConfig, InstallPaths)> {
    let config = match config_path {
        Some(path) => InstallerConfig::read_from(path)?,
        None => InstallerConfig::read()?,
    };
    let paths = InstallPaths::resolve(&config);
    let paths = match install_dir {
        Some(dir) => paths.with_install_dir(dir),
        None => paths,
    };
    Ok((config, paths))
}
