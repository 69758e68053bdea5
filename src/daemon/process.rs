//! Process liveness and termination by PID

use crate::error::HousekeeperResult;

/// Whether `pid` names a live process.
///
/// A process owned by another user still counts. On Linux an exited but
/// unreaped child (zombie) does not.
#[cfg(unix)]
pub fn is_process_running(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    if pid <= 0 {
        return false;
    }

    // SAFETY: signal 0 performs the permission and existence checks only
    let rc = unsafe { libc::kill(pid, 0) };
    let alive = rc == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM);
    alive && !is_zombie(pid)
}

#[cfg(not(unix))]
pub fn is_process_running(_pid: u32) -> bool {
    false
}

#[cfg(target_os = "linux")]
fn is_zombie(pid: libc::pid_t) -> bool {
    // Format: "pid (comm) S ...", where comm may itself contain ')'
    std::fs::read_to_string(format!("/proc/{pid}/stat"))
        .ok()
        .and_then(|stat| {
            let rest = &stat[stat.rfind(')')? + 1..];
            rest.trim_start().chars().next()
        })
        .is_some_and(|state| state == 'Z')
}

#[cfg(all(unix, not(target_os = "linux")))]
fn is_zombie(_pid: libc::pid_t) -> bool {
    false
}

/// Send SIGTERM to `pid`.
///
/// Returns `false` when no such process exists. Any other failure, such as
/// a process owned by another user, is an error.
#[cfg(unix)]
pub fn terminate(pid: u32) -> HousekeeperResult<bool> {
    let pid = libc::pid_t::try_from(pid).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("invalid PID {pid}"))
    })?;

    // SAFETY: plain syscall with a checked PID
    if unsafe { libc::kill(pid, libc::SIGTERM) } != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ESRCH) {
            return Ok(false);
        }
        return Err(err.into());
    }
    Ok(true)
}

#[cfg(not(unix))]
pub fn terminate(_pid: u32) -> HousekeeperResult<bool> {
    Err(crate::error::HousekeeperError::Unsupported {
        feature: "daemon mode",
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_current_process_is_running() {
        assert!(is_process_running(std::process::id()));
    }

    #[test]
    fn test_invalid_pids_are_not_running() {
        assert!(!is_process_running(0));
        assert!(!is_process_running(u32::MAX));
    }

    #[test]
    fn test_terminate_stops_child() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = child.id();
        assert!(is_process_running(pid));

        assert!(terminate(pid).unwrap());
        child.wait().unwrap();
        assert!(!is_process_running(pid));
    }

    #[test]
    fn test_terminate_reaped_child_reports_absent() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();

        assert!(!terminate(pid).unwrap());
    }

    #[test]
    fn test_terminate_foreign_process_is_an_error() {
        // As root every signal is permitted, so there is nothing to refuse
        if unsafe { libc::geteuid() } == 0 {
            return;
        }
        assert!(terminate(1).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unreaped_child_is_not_running() {
        use std::time::{Duration, Instant};

        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();

        let deadline = Instant::now() + Duration::from_secs(5);
        while is_process_running(pid) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(!is_process_running(pid));
        child.wait().unwrap();
    }
}
