//! Installed-version detection and the up-to-date decision.
//!
//! Comparison is deliberately *not* semantic: after dropping one leading
//! `v`/`V`, the remote tag and the installed version must be identical
//! strings. `v1.2.0+build.7` and `1.2.0` are therefore different and trigger
//! a reinstall.

use super::error::InstallError;
use super::paths::InstallPaths;
use crate::libs::messages::Message;
use crate::msg_debug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File written into the install directory after a successful extraction.
pub const VERSION_STAMP_FILE: &str = ".installed-version";

/// Drops a single leading `v` or `V`.
pub fn normalize(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

/// `true` when `local` is present and equal to `remote` after [`normalize`].
pub fn is_up_to_date(remote: &str, local: Option<&str>) -> bool {
    match local {
        Some(local) => normalize(remote) == normalize(local),
        None => false,
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VersionStamp {
    pub version: String,
    pub installed_at: DateTime<Utc>,
}

impl VersionStamp {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            installed_at: Utc::now(),
        }
    }

    pub fn read(install_dir: &Path) -> Option<Self> {
        let content = fs::read_to_string(install_dir.join(VERSION_STAMP_FILE)).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn write(&self, install_dir: &Path) -> Result<(), InstallError> {
        let path = install_dir.join(VERSION_STAMP_FILE);
        let content = serde_json::to_string_pretty(self).map_err(|e| InstallError::Parse(e.to_string()))?;
        fs::write(&path, content).map_err(|e| InstallError::io_at("write", &path, e))
    }
}

/// Version of the currently installed application, if any.
///
/// The executable's embedded file version is preferred where the platform
/// has one; the stamp written by the previous install is the fallback. No
/// executable means no installation, whatever the stamp says.
pub fn installed_version(paths: &InstallPaths) -> Option<String> {
    let exe_path = paths.executable_path();
    if !exe_path.is_file() {
        return None;
    }

    if let Some(version) = embedded_file_version(&exe_path) {
        return Some(version);
    }

    VersionStamp::read(&paths.install_dir).map(|stamp| stamp.version)
}

#[cfg(windows)]
fn embedded_file_version(exe_path: &Path) -> Option<String> {
    use std::os::windows::process::CommandExt;
    use std::process::Command;

    const CREATE_NO_WINDOW: u32 = 0x08000000;

    // Single quotes are doubled to survive PowerShell's literal string rules.
    let literal = exe_path.to_string_lossy().replace('\'', "''");
    let output = Command::new("powershell")
        .args([
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            &format!("(Get-Item -LiteralPath '{}').VersionInfo.FileVersion", literal),
        ])
        .creation_flags(CREATE_NO_WINDOW)
        .output();

    let output = match output {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            msg_debug!(Message::VersionLookupFailed(decode_windows_output(&output.stderr)));
            return None;
        }
        Err(e) => {
            msg_debug!(Message::VersionLookupFailed(e.to_string()));
            return None;
        }
    };

    let version = decode_windows_output(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}

/// Console tools may answer in the OEM code page rather than UTF-8.
#[cfg(windows)]
fn decode_windows_output(bytes: &[u8]) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(utf8) => utf8,
        Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
    }
}

#[cfg(not(windows))]
fn embedded_file_version(exe_path: &Path) -> Option<String> {
    msg_debug!(Message::VersionLookupFailed(format!(
        "no embedded version metadata on this platform for {}",
        exe_path.display()
    )));
    None
}
