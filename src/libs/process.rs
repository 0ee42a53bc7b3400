//! Terminating running copies of the application before files are replaced.
//!
//! This step is advisory. A process that cannot be killed is logged and left
//! alone; if it still holds a file open, extraction reports the I/O error.

use super::error::InstallError;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const EXIT_POLL_ATTEMPTS: u32 = 20;

/// Compares a process image name with `base_name`, ignoring any extension.
/// Windows file names are case-insensitive, elsewhere the match is exact.
pub fn image_matches(image: &OsStr, base_name: &str) -> bool {
    let stem = Path::new(image)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    if cfg!(windows) {
        stem.eq_ignore_ascii_case(base_name)
    } else {
        stem == base_name
    }
}

/// Force-kills every process whose image is `base_name` (except ourselves)
/// and waits briefly for them to exit. Returns how many were killed.
pub fn terminate_running_instances(base_name: &str) -> Result<usize, InstallError> {
    msg_debug!(Message::TerminatingInstances(base_name.to_string()));

    let own_pid = sysinfo::get_current_pid().ok();
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let targets: Vec<(Pid, String)> = system
        .processes()
        .iter()
        .filter(|(pid, _)| Some(**pid) != own_pid)
        .filter(|(_, process)| {
            image_matches(process.name(), base_name) || process.exe().is_some_and(|exe| image_matches(exe.as_os_str(), base_name))
        })
        .map(|(pid, process)| (*pid, process.name().to_string_lossy().into_owned()))
        .collect();

    if targets.is_empty() {
        msg_debug!(Message::NoRunningInstances);
        return Ok(0);
    }

    let mut killed = Vec::new();
    for (pid, name) in targets {
        let sent = system.process(pid).is_some_and(|process| process.kill());
        if sent {
            msg_debug!(Message::ProcessTerminated {
                name,
                pid: pid.as_u32(),
            });
            killed.push(pid);
        } else {
            msg_warning!(Message::ProcessTerminateFailed {
                name,
                pid: pid.as_u32(),
            });
        }
    }

    wait_for_exit(&mut system, &killed);
    msg_debug!(Message::ProcessesTerminated(killed.len()));
    Ok(killed.len())
}

/// Gives killed processes a moment to release their file handles.
fn wait_for_exit(system: &mut System, pids: &[Pid]) {
    if pids.is_empty() {
        return;
    }
    for _ in 0..EXIT_POLL_ATTEMPTS {
        system.refresh_processes(ProcessesToUpdate::Some(pids), true);
        if pids.iter().all(|pid| system.process(*pid).is_none()) {
            return;
        }
        std::thread::sleep(EXIT_POLL_INTERVAL);
    }
}
