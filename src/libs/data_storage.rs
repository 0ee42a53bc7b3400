use crate::libs::meta::{APP_METADATA_NAME, APP_METADATA_OWNER};
use std::env::consts::OS;
use std::env::var;
use std::io;
use std::path::{Path, PathBuf};
use std::fs;

/// Per-user storage for the installer's own files (its configuration).
///
/// The installed application itself lives under [`DataStorage::local_data_root`]
/// too, see `libs::paths`.
#[derive(Clone, Debug)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = Self::local_data_root().join(APP_METADATA_OWNER).join(APP_METADATA_NAME);
        Self { base_path }
    }

    /// The per-user, non-roaming application data directory.
    pub fn local_data_root() -> PathBuf {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("XDG_DATA_HOME").unwrap_or_else(|_| var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share"),
        };
        Path::new(&base_path).to_path_buf()
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn get_path(&self, file_name: &str) -> io::Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}
