use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Result;
use sysinfo::{Signal, System, get_current_pid};

use super::daemon_path::to_daemon_path;

/// Kills every running process backed by the daemon executable.
pub fn kill_previous_servers(name: &Path) {
    let system = System::new_all();
    let current_id = get_current_pid().unwrap();
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
}

/// Intended for shutting down a previous daemon and starting a new one. The daemon binary detaches
/// itself, so spawning it directly is enough.
pub fn restart_server(dir: Option<PathBuf>) -> Result<()> {
    let daemon_path = to_daemon_path(env::current_exe().expect("Can't operate without an executable"));
    kill_previous_servers(&daemon_path);
    let mut command = std::process::Command::new(daemon_path);
    if let Some(dir) = dir {
        command.arg("--dir");
        command.arg(dir);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        use std::process::Stdio;
        command.process_group(0);
        command.stdin(Stdio::null());
        command.stdout(Stdio::null());
    }

    println!("Spawning daemon");
    #[allow(clippy::zombie_processes)]
    let _ = command.spawn()?;
    println!("Success");
    Ok(())
}
