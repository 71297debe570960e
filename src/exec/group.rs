// src/exec/group.rs

//! Signalling a whole process group.

use std::io;

/// Which signal to deliver to a process group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSignal {
    /// Polite request (SIGTERM).
    Terminate,
    /// Forced (SIGKILL).
    Kill,
}

/// What happened when we signalled a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    Signalled,
    /// Nothing left in the group to signal.
    AlreadyExited,
}

/// Send `signal` to every process in group `pgid`.
///
/// A group that no longer exists is reported as `AlreadyExited`, not as an
/// error.
#[cfg(unix)]
pub fn kill_group(pgid: u32, signal: GroupSignal) -> io::Result<KillOutcome> {
    let pgid = libc::pid_t::try_from(pgid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "process group id out of range"))?;
    // 0 would address our own group and 1 is init.
    if pgid <= 1 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to signal process group {pgid}"),
        ));
    }

    let sig = match signal {
        GroupSignal::Terminate => libc::SIGTERM,
        GroupSignal::Kill => libc::SIGKILL,
    };

    // SAFETY: killpg has no memory-safety preconditions.
    let rc = unsafe { libc::killpg(pgid, sig) };
    if rc == 0 {
        return Ok(KillOutcome::Signalled);
    }

    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(KillOutcome::AlreadyExited)
    } else {
        Err(err)
    }
}

/// Without process groups, terminate the process tree rooted at `pgid`
/// (the leader's pid) with `taskkill /T`. Both signals are forceful here.
#[cfg(not(unix))]
pub fn kill_group(pgid: u32, _signal: GroupSignal) -> io::Result<KillOutcome> {
    use std::process::{Command, Stdio};

    // taskkill exits with 128 when the process does not exist.
    const NOT_FOUND: i32 = 128;

    let status = Command::new("taskkill")
        .args(["/T", "/F", "/PID", &pgid.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    match status.code() {
        Some(0) => Ok(KillOutcome::Signalled),
        Some(NOT_FOUND) => Ok(KillOutcome::AlreadyExited),
        other => Err(io::Error::other(format!(
            "taskkill failed for pid {pgid} (exit code {other:?})"
        ))),
    }
}
