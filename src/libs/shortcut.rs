//! Desktop shortcuts pointing at the installed application.
//!
//! Windows gets `.lnk` files, Linux and the BSDs get `.desktop` launchers.
//! Other platforms skip the step silently. A failing shortcut never fails
//! the install.

use super::config::InstallerConfig;
use super::error::InstallError;
use super::paths::InstallPaths;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use std::path::{Path, PathBuf};

/// One shortcut to create on the desktop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortcutSpec {
    /// Display name, also the file name without extension.
    pub name: String,
    pub target: PathBuf,
    pub working_dir: PathBuf,
    pub description: String,
    /// Icon source; the target itself when absent.
    pub icon: Option<PathBuf>,
}

pub trait ShortcutCreator {
    /// Creates (or replaces) the shortcut in `dir` and returns its path.
    fn create(&self, dir: &Path, spec: &ShortcutSpec) -> Result<PathBuf, InstallError>;
}

/// Native shortcut format of the current platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlatformShortcuts;

impl ShortcutCreator for PlatformShortcuts {
    #[cfg(windows)]
    fn create(&self, dir: &Path, spec: &ShortcutSpec) -> Result<PathBuf, InstallError> {
        use mslnk::ShellLink;

        let path = dir.join(format!("{}.lnk", spec.name));
        let mut link = ShellLink::new(&spec.target).map_err(|e| InstallError::io_at("read", &spec.target, e))?;
        link.set_name(Some(spec.description.clone()));
        link.set_working_dir(Some(spec.working_dir.to_string_lossy().into_owned()));
        let icon = spec.icon.as_ref().unwrap_or(&spec.target);
        link.set_icon_location(Some(icon.to_string_lossy().into_owned()));
        link.create_lnk(&path).map_err(|e| InstallError::io_at("create", &path, e))?;
        Ok(path)
    }

    #[cfg(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd", target_os = "netbsd"))]
    fn create(&self, dir: &Path, spec: &ShortcutSpec) -> Result<PathBuf, InstallError> {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(format!("{}.desktop", spec.name));
        std::fs::write(&path, desktop_entry(spec)).map_err(|e| InstallError::io_at("write", &path, e))?;
        // Desktop environments only trust launchers marked executable.
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| InstallError::io_at("set permissions on", &path, e))?;
        Ok(path)
    }

    #[cfg(not(any(windows, target_os = "linux", target_os = "freebsd", target_os = "openbsd", target_os = "netbsd")))]
    fn create(&self, dir: &Path, spec: &ShortcutSpec) -> Result<PathBuf, InstallError> {
        Ok(dir.join(&spec.name))
    }
}

/// Renders a freedesktop.org `.desktop` entry.
pub fn desktop_entry(spec: &ShortcutSpec) -> String {
    let icon = spec.icon.as_ref().unwrap_or(&spec.target);
    format!(
        "[Desktop Entry]\nType=Application\nName={}\nComment={}\nExec=\"{}\"\nPath={}\nIcon={}\nTerminal=false\n",
        spec.name,
        spec.description,
        spec.target.display(),
        spec.working_dir.display(),
        icon.display()
    )
}

/// Creates the application shortcut and, when shipped, the launcher one.
pub struct ShortcutProvisioner<C> {
    creator: C,
    desktop_dir: Option<PathBuf>,
}

impl<C: ShortcutCreator> ShortcutProvisioner<C> {
    pub fn new(creator: C, desktop_dir: Option<PathBuf>) -> Self {
        Self { creator, desktop_dir }
    }

    /// Shortcuts for the current platform on the user's desktop.
    pub fn for_desktop(creator: C) -> Self {
        Self::new(creator, dirs::desktop_dir())
    }

    /// The shortcuts this installation should have, in creation order.
    pub fn specs(paths: &InstallPaths, config: &InstallerConfig) -> Vec<ShortcutSpec> {
        let exe = paths.executable_path();
        let mut specs = vec![ShortcutSpec {
            name: config.app_name.clone(),
            target: exe.clone(),
            working_dir: paths.install_dir.clone(),
            description: config.description.clone(),
            icon: None,
        }];

        if let Some(launcher) = config.launcher_name.as_deref() {
            let launcher_path = paths.file_in_install_dir(launcher);
            if launcher_path.is_file() {
                let name = Path::new(launcher)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| launcher.to_string());
                specs.push(ShortcutSpec {
                    description: name.clone(),
                    name,
                    target: launcher_path,
                    working_dir: paths.install_dir.clone(),
                    icon: Some(exe),
                });
            } else {
                msg_debug!(Message::LauncherNotFound(launcher_path.display().to_string()));
            }
        }

        specs
    }

    /// Creates every shortcut it can and returns the paths that were written.
    pub fn provision(&self, paths: &InstallPaths, config: &InstallerConfig) -> Vec<PathBuf> {
        let Some(desktop) = self.desktop_dir.as_deref() else {
            msg_warning!(Message::DesktopDirUnavailable);
            return Vec::new();
        };
        msg_debug!(Message::CreatingShortcuts);

        let mut created = Vec::new();
        for spec in Self::specs(paths, config) {
            match self.creator.create(desktop, &spec) {
                Ok(path) => {
                    msg_debug!(Message::ShortcutCreated(path.display().to_string()));
                    created.push(path);
                }
                Err(e) => msg_warning!(Message::ShortcutFailed {
                    name: spec.name.clone(),
                    error: e.to_string(),
                }),
            }
        }
        created
    }
}
