//! Starting the installed application detached from the installer.

use super::error::InstallError;
use std::path::Path;
use std::process::{Command, Stdio};

/// Spawns `exe` with `working_dir` as its current directory. The child
/// outlives the installer and is never waited on.
pub fn launch_detached(exe: &Path, working_dir: &Path) -> Result<(), InstallError> {
    let mut command = Command::new(exe);
    command
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // SAFETY: only calls the async-signal-safe setsid(2) between fork and exec.
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setsid()?;
                Ok(())
            });
        }
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const DETACHED_PROCESS: u32 = 0x00000008;
        const CREATE_NEW_PROCESS_GROUP: u32 = 0x00000200;
        command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
    }

    command
        .spawn()
        .map_err(|e| InstallError::Process(format!("failed to start {}: {}", exe.display(), e)))?;
    Ok(())
}
