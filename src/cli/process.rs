use std::{env, path::Path, process::Stdio};

use anyhow::{anyhow, Result};
use sysinfo::{get_current_pid, Signal, System};

use crate::daemon::config::{to_command_args, DaemonOptions};

use super::daemon_path::to_daemon_path;

/// Terminates every process started from `name`, except the current one and its children.
pub fn kill_previous_servers(name: &Path) -> Result<()> {
    let system = System::new_all();
    let current_id = get_current_pid().map_err(|e| anyhow!("Can't determine own pid {e}"))?;
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }
        if matches!(process.parent(), Some(p) if p == current_id) {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| name == *v)
            .is_some()
        {
            // This will forcefully terminate the process on Windows. Anything better will require a
            // lot more work.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
        }
    }
    Ok(())
}

/// Stops daemons started either through the daemon binary or through `tabtally serve`.
pub fn stop_servers() -> Result<()> {
    let current = env::current_exe()?;
    kill_previous_servers(&to_daemon_path(current.clone()))?;
    kill_previous_servers(&current)
}

/// Shuts down the previous daemon and starts a new one. The daemon binary detaches by itself, we
/// only wait for the launcher to exit.
pub fn restart_server(options: &DaemonOptions) -> Result<()> {
    stop_servers()?;
    let daemon = to_daemon_path(env::current_exe()?);
    let mut command = std::process::Command::new(&daemon);
    command.args(to_command_args(options));
    command.stdin(Stdio::null());
    command.stdout(Stdio::null());

    println!("Spawning {daemon:?}");
    let status = command.status()?;
    if !status.success() {
        return Err(anyhow!("Daemon launcher exited with {status}"));
    }
    println!("Success");
    Ok(())
}
