//! Traversal-proof extraction of the release archive.
//!
//! Extraction runs in two passes over the archive, both in archive order:
//!
//! 1. Every entry name is resolved against the canonical target directory.
//!    One entry that would land outside it aborts the whole extraction with
//!    [`InstallError::PathTraversal`] before anything is written.
//! 2. Entries are written. Directories below the target are created one
//!    component at a time and any symlink met on the way is rejected, so a
//!    link already present in the target cannot redirect a write or a
//!    `mkdir` outside it.
//!
//! Existing files are replaced, read-only ones included; reinstalling over
//! an existing tree is the normal case.

use super::error::InstallError;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// Resolves an archive entry name below `root` without touching the disk.
///
/// Both `/` and `\` count as separators, `.` is dropped and `..` pops one
/// level. Absolute names, drive prefixes and any name that climbs above
/// `root` are rejected. Returns `None` for names that resolve to `root`
/// itself.
pub fn resolve_entry_path(root: &Path, entry_name: &str) -> Result<Option<PathBuf>, InstallError> {
    let traversal = || InstallError::PathTraversal(entry_name.to_string());

    let normalized = entry_name.replace('\\', "/");
    if normalized.starts_with('/') {
        return Err(traversal());
    }

    let mut parts: Vec<&str> = Vec::new();
    for part in normalized.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return Err(traversal());
                }
            }
            part => {
                // A component such as `C:` would re-root the path on Windows.
                let mut components = Path::new(part).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => parts.push(part),
                    _ => return Err(traversal()),
                }
            }
        }
    }

    if parts.is_empty() {
        return Ok(None);
    }

    let resolved = parts.iter().fold(root.to_path_buf(), |path, part| path.join(part));
    if resolved.starts_with(root) && resolved != root {
        Ok(Some(resolved))
    } else {
        Err(traversal())
    }
}

/// Names ending in a separator are directories, whatever the header says.
fn is_directory_entry(name: &str, header_says_dir: bool) -> bool {
    header_says_dir || name.ends_with('/') || name.ends_with('\\')
}

/// Creates `dir` (which lies below `root`) one component at a time.
/// Refuses to step through a symlink; an existing non-directory in the way is
/// an I/O error.
fn create_dir_within(root: &Path, dir: &Path, entry_name: &str) -> Result<(), InstallError> {
    let traversal = || InstallError::PathTraversal(entry_name.to_string());
    let relative = dir.strip_prefix(root).map_err(|_| traversal())?;

    let mut current = root.to_path_buf();
    for component in relative.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => return Err(traversal()),
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                let in_the_way = io::Error::new(io::ErrorKind::AlreadyExists, "a file is in the way");
                return Err(InstallError::io_at("create directory", &current, in_the_way));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&current).map_err(|e| InstallError::io_at("create directory", &current, e))?;
            }
            Err(e) => return Err(InstallError::io_at("inspect", &current, e)),
        }
    }
    Ok(())
}

/// Extracts the zip archive at `archive_path` into `target_dir`.
pub fn extract(archive_path: &Path, target_dir: &Path) -> Result<ExtractSummary, InstallError> {
    let archive_file = File::open(archive_path).map_err(|e| InstallError::io_at("open", archive_path, e))?;
    let mut archive = ZipArchive::new(archive_file)?;

    fs::create_dir_all(target_dir).map_err(|e| InstallError::io_at("create", target_dir, e))?;
    let root = target_dir
        .canonicalize()
        .map_err(|e| InstallError::io_at("resolve", target_dir, e))?;

    // Pass 1: validate every name before writing anything.
    let mut plan = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        let name = entry.name().to_string();
        let destination = resolve_entry_path(&root, &name)?;
        let is_dir = is_directory_entry(&name, entry.is_dir());
        plan.push((index, name, destination, is_dir));
    }

    // Pass 2: write in archive order.
    let mut summary = ExtractSummary::default();
    for (index, name, destination, is_dir) in plan {
        let Some(destination) = destination else {
            continue;
        };

        if is_dir {
            create_dir_within(&root, &destination, &name)?;
            summary.directories += 1;
            continue;
        }

        let parent = destination.parent().unwrap_or(root.as_path());
        create_dir_within(&root, parent, &name)?;
        match fs::symlink_metadata(&destination) {
            Ok(meta) if meta.file_type().is_symlink() => return Err(InstallError::PathTraversal(name)),
            // A read-only file from an earlier run cannot be truncated in place.
            Ok(meta) if meta.is_file() => {
                fs::remove_file(&destination).map_err(|e| InstallError::io_at("replace", &destination, e))?;
            }
            _ => {}
        }

        let mut entry = archive.by_index(index)?;
        let mut out = File::create(&destination).map_err(|e| InstallError::io_at("create", &destination, e))?;
        let written = io::copy(&mut entry, &mut out).map_err(|e| InstallError::io_at("write", &destination, e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            // Only permission bits; file type bits come from the entry kind.
            let permissions = fs::Permissions::from_mode(mode & 0o777);
            fs::set_permissions(&destination, permissions)
                .map_err(|e| InstallError::io_at("set permissions on", &destination, e))?;
        }

        summary.files += 1;
        summary.bytes += written;
    }

    Ok(summary)
}
