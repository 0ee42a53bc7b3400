//! Filesystem layout of an installation.

use super::config::InstallerConfig;
use super::data_storage::DataStorage;
use std::path::{Path, PathBuf};

/// Where the application is installed and where the archive is staged.
///
/// `install_dir` only depends on the user and the application name, so every
/// run of the installer targets the same directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallPaths {
    pub install_dir: PathBuf,
    pub temp_archive_path: PathBuf,
    pub executable_name: String,
}

impl InstallPaths {
    pub fn new(install_dir: impl Into<PathBuf>, temp_archive_path: impl Into<PathBuf>, executable_name: impl Into<String>) -> Self {
        Self {
            install_dir: install_dir.into(),
            temp_archive_path: temp_archive_path.into(),
            executable_name: executable_name.into(),
        }
    }

    /// `<local app data>/<app_name>` and `<temp>/<asset_name>`.
    pub fn resolve(config: &InstallerConfig) -> Self {
        Self::new(
            DataStorage::local_data_root().join(&config.app_name),
            std::env::temp_dir().join(&config.asset_name),
            config.executable_name.clone(),
        )
    }

    /// Same as [`resolve`](Self::resolve) with the install directory replaced.
    pub fn with_install_dir(mut self, install_dir: impl Into<PathBuf>) -> Self {
        self.install_dir = install_dir.into();
        self
    }

    pub fn executable_path(&self) -> PathBuf {
        self.install_dir.join(&self.executable_name)
    }

    /// Path of a file shipped next to the executable.
    pub fn file_in_install_dir(&self, name: &str) -> PathBuf {
        self.install_dir.join(name)
    }

    /// Executable name without its extension, as process tables report it.
    pub fn executable_base_name(&self) -> String {
        Path::new(&self.executable_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.executable_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_drops_extension() {
        let paths = InstallPaths::new("/opt/TechAtlas", "/tmp/techatlas.zip", "techatlas.exe");
        assert_eq!(paths.executable_base_name(), "techatlas");
        assert_eq!(paths.executable_path(), PathBuf::from("/opt/TechAtlas/techatlas.exe"));
    }

    #[test]
    fn base_name_without_extension_is_unchanged() {
        let paths = InstallPaths::new("/opt/TechAtlas", "/tmp/techatlas.zip", "techatlas");
        assert_eq!(paths.executable_base_name(), "techatlas");
    }
}
