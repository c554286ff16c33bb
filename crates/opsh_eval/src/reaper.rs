use std::{io, sync::Arc, thread};

use opsh_core::{Context, Host, SharedJobs};
use parking_lot::Mutex;
use signal_hook::{
    consts::{SIGCHLD, SIGINT},
    iterator::Signals,
};
use tracing::{debug, trace};

/// Reaps background jobs as they terminate.
///
/// The reaper only polls processes in the job registry. Foreground processes are
/// never touched, as they are waited for by the shell itself.
#[derive(Clone)]
pub struct Reaper {
    jobs: SharedJobs,
    host: Arc<Mutex<dyn Host>>,
}

impl Reaper {
    /// Constructs a reaper for the jobs in a context.
    pub fn new(context: &Context) -> Self {
        Self {
            jobs: Arc::clone(&context.jobs),
            host: Arc::clone(&context.host),
        }
    }

    /// Removes every terminated job from the registry and reports it, followed by
    /// the prompt that the report may have interrupted.
    ///
    /// Never blocks on a running process. Returns the number of reaped jobs,
    /// which is 0 if no job has terminated.
    pub fn reap(&self) -> usize {
        // Release the registry before printing.
        let completions = self.jobs.lock().take_terminated();
        if completions.is_empty() {
            return 0;
        }

        let mut host = self.host.lock();
        for completion in &completions {
            debug!(pid = completion.pid, code = completion.code, "reaped background job");
            host.println(&format!("\n{completion}"));
            host.redisplay_prompt();
        }

        completions.len()
    }

    /// Starts reaping jobs whenever a child process changes state.
    ///
    /// `SIGCHLD` is subscribed to before this function returns, so that no
    /// notification for a process spawned afterwards can be missed. Reaping
    /// happens on a dedicated thread.
    ///
    /// `SIGINT` is consumed as well, so that an interrupt only terminates the
    /// foreground processes and never the shell. Child processes are started
    /// with the default disposition.
    pub fn listen(self) -> io::Result<thread::JoinHandle<()>> {
        let mut signals = Signals::new([SIGCHLD, SIGINT])?;
        thread::Builder::new()
            .name("reaper".to_owned())
            .spawn(move || {
                for signal in signals.forever() {
                    match signal {
                        SIGCHLD => {
                            trace!(signal, "received child notification");
                            self.reap();
                        }
                        _ => trace!(signal, "ignoring interrupt"),
                    }
                }
            })
    }
}
