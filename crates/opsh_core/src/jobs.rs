use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
    io,
    process::{Child, ExitStatus},
    sync::Arc,
};

use opsh_ast::CommandStage;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// A job registry shared between the shell and its reaper.
pub type SharedJobs = Arc<Mutex<JobRegistry>>;

/// A child process that the shell has spawned, along with the stage it runs.
#[derive(Debug)]
pub struct ManagedProcess {
    child: Child,
    stage: CommandStage,
}

impl ManagedProcess {
    pub fn new(child: Child, stage: CommandStage) -> Self {
        Self { child, stage }
    }

    /// Returns the OS-assigned process identifier.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Returns the stage that the process is running.
    pub fn stage(&self) -> &CommandStage {
        &self.stage
    }

    /// Returns the process' exit status if it has terminated, without blocking.
    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Blocks until the process has terminated.
    ///
    /// Stopped processes are not considered terminated.
    pub fn wait(mut self) -> io::Result<ExitStatus> {
        self.child.wait()
    }
}

/// A report stating that a background process has exited with a specific code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: u32,
    pub code: i32,
}

impl Completion {
    /// Constructs a report acknowledging that a process has been launched.
    ///
    /// The code is always 0, as the real code is not yet known.
    pub fn launched(pid: u32) -> Self {
        Self { pid, code: 0 }
    }

    /// Constructs a report from an exit status.
    ///
    /// Processes that did not exit normally, e.g. processes killed by a signal,
    /// are reported with code 0.
    pub fn from_status(pid: u32, status: ExitStatus) -> Self {
        Self {
            pid,
            code: status.code().unwrap_or(0),
        }
    }
}

impl Display for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] retval: {}", self.pid, self.code)
    }
}

/// Registry of background processes that have not yet been reaped.
///
/// Processes are kept in insertion order and can be looked up by their PID.
/// Each process leaves the registry exactly once.
#[derive(Debug, Default)]
pub struct JobRegistry {
    /// Processes keyed by insertion sequence number.
    jobs: BTreeMap<u64, ManagedProcess>,

    /// Insertion sequence numbers keyed by PID.
    sequence_by_pid: HashMap<u32, u64>,

    next_sequence: u64,
}

impl JobRegistry {
    /// Registers a process and returns its PID.
    pub fn insert(&mut self, process: ManagedProcess) -> u32 {
        let pid = process.pid();
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        // PIDs are only reused once the previous process has been reaped, which
        // also removes it from the registry.
        if let Some(old) = self.sequence_by_pid.insert(pid, sequence) {
            warn!(pid, "replacing stale job registry entry");
            self.jobs.remove(&old);
        }
        self.jobs.insert(sequence, process);

        debug!(pid, jobs = self.jobs.len(), "registered background job");
        pid
    }

    /// Removes a process from the registry.
    pub fn remove(&mut self, pid: u32) -> Option<ManagedProcess> {
        let sequence = self.sequence_by_pid.remove(&pid)?;
        self.jobs.remove(&sequence)
    }

    /// Removes the oldest process from the registry.
    pub fn pop_first(&mut self) -> Option<ManagedProcess> {
        let (_, process) = self.jobs.pop_first()?;
        self.sequence_by_pid.remove(&process.pid());
        Some(process)
    }

    /// Returns the PIDs of all registered processes in insertion order.
    pub fn pids(&self) -> Vec<u32> {
        self.jobs.values().map(ManagedProcess::pid).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Removes all processes that have terminated, without blocking, and returns
    /// a completion report for each of them in insertion order.
    ///
    /// Does nothing if no registered process has terminated.
    pub fn take_terminated(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        for process in self.jobs.values_mut() {
            let pid = process.pid();
            match process.try_wait() {
                Ok(Some(status)) => completions.push(Completion::from_status(pid, status)),
                Ok(None) => {}
                Err(error) => {
                    // The process can no longer be waited for, so there is no
                    // reason to keep tracking it.
                    warn!(pid, %error, "failed to poll background job");
                    completions.push(Completion::launched(pid));
                }
            }
        }

        for completion in &completions {
            self.remove(completion.pid);
        }

        completions
    }
}

/// Blocks until every process in a registry has terminated, reporting each
/// process as it is removed from the registry.
///
/// Processes are waited for in insertion order. The registry is not locked while
/// waiting, so processes may be reaped elsewhere in the meantime. Those are not
/// reported here.
pub fn wait_all(jobs: &Mutex<JobRegistry>, mut report: impl FnMut(Completion)) {
    debug!(pids = ?jobs.lock().pids(), "draining background jobs");
    loop {
        // Bind the process first so that the lock is released before waiting.
        let next = jobs.lock().pop_first();
        let Some(process) = next else {
            break;
        };

        let pid = process.pid();
        debug!(pid, stage = %process.stage(), "waiting for background job");
        match process.wait() {
            Ok(status) => report(Completion::from_status(pid, status)),
            Err(error) => {
                warn!(pid, %error, "failed to wait for background job");
                report(Completion::launched(pid));
            }
        }
    }
}
