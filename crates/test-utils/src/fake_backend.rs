use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use gomon::config::CommandSpec;
use gomon::errors::{GomonError, Result};
use gomon::exec::{
    ExitFuture, ExitOutcome, GroupSignal, KillOutcome, LaunchedProcess, ProcessBackend,
};

/// Everything the supervisor asked the backend to do, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessCall {
    Launch { pgid: u32 },
    Kill { pgid: u32, signal: GroupSignal },
}

#[derive(Default)]
struct Inner {
    next_pgid: u32,
    calls: Vec<ProcessCall>,
    live: HashMap<u32, oneshot::Sender<ExitOutcome>>,
    max_live: usize,
    fail_launches: bool,
    ignore_terminate: bool,
}

/// A fake process backend that:
/// - hands out increasing fake group ids starting at 1000
/// - records every launch and kill
/// - "exits" a group as soon as it is signalled (unless told to ignore
///   SIGTERM), or when the test calls [`FakeBackend::exit`].
#[derive(Clone)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_pgid: 1000,
                ..Inner::default()
            })),
        }
    }

    /// Make every following launch fail as if the program did not exist.
    pub fn set_fail_launches(&self, val: bool) {
        self.inner.lock().unwrap().fail_launches = val;
    }

    /// Keep groups alive on SIGTERM; only SIGKILL stops them.
    pub fn set_ignore_terminate(&self, val: bool) {
        self.inner.lock().unwrap().ignore_terminate = val;
    }

    /// Simulate the process in `pgid` exiting on its own.
    pub fn exit(&self, pgid: u32, outcome: ExitOutcome) -> bool {
        let tx = self.inner.lock().unwrap().live.remove(&pgid);
        match tx {
            Some(tx) => {
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    pub fn calls(&self) -> Vec<ProcessCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn launches(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ProcessCall::Launch { pgid } => Some(pgid),
                _ => None,
            })
            .collect()
    }

    pub fn kills(&self) -> Vec<(u32, GroupSignal)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ProcessCall::Kill { pgid, signal } => Some((pgid, signal)),
                _ => None,
            })
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.inner.lock().unwrap().live.len()
    }

    /// Highest number of groups that were alive at the same time.
    pub fn max_live(&self) -> usize {
        self.inner.lock().unwrap().max_live
    }
}

impl ProcessBackend for FakeBackend {
    fn launch(&self, command: &CommandSpec) -> Result<LaunchedProcess> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_launches {
            return Err(GomonError::Launch {
                program: command.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            });
        }

        let pgid = inner.next_pgid;
        inner.next_pgid += 1;
        let (tx, rx) = oneshot::channel();
        inner.live.insert(pgid, tx);
        inner.max_live = inner.max_live.max(inner.live.len());
        inner.calls.push(ProcessCall::Launch { pgid });

        let exit: ExitFuture = Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| ExitOutcome::WaitFailed("fake backend dropped".to_string()))
        });
        Ok(LaunchedProcess { pgid, exit })
    }

    fn kill_group(&self, pgid: u32, signal: GroupSignal) -> io::Result<KillOutcome> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ProcessCall::Kill { pgid, signal });

        if !inner.live.contains_key(&pgid) {
            return Ok(KillOutcome::AlreadyExited);
        }
        if signal == GroupSignal::Terminate && inner.ignore_terminate {
            return Ok(KillOutcome::Signalled);
        }
        if let Some(tx) = inner.live.remove(&pgid) {
            let _ = tx.send(ExitOutcome::Crashed(None));
        }
        Ok(KillOutcome::Signalled)
    }
}
