use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{command::Command, Host, JobRegistry, SharedJobs, StdHost};

/// An execution context holding the state that outlives a single line of input.
pub struct Context {
    /// The context's host.
    pub host: Arc<Mutex<dyn Host>>,

    /// Background processes that have not yet been reaped.
    pub jobs: SharedJobs,

    /// The shell's working directory. Child processes are started here, and
    /// relative paths are resolved against it.
    pwd: PathBuf,

    /// Built-in commands in lookup order.
    builtins: Vec<Box<dyn Command>>,
}

impl Context {
    /// Constructs a new context with a standard host and an empty job registry.
    pub fn new(pwd: PathBuf) -> Self {
        Self::with_host(Arc::new(Mutex::new(StdHost::default())), pwd)
    }

    /// Constructs a new context using a specific host.
    pub fn with_host(host: Arc<Mutex<dyn Host>>, pwd: PathBuf) -> Self {
        Self {
            host,
            jobs: Arc::new(Mutex::new(JobRegistry::default())),
            pwd,
            builtins: Vec::new(),
        }
    }

    /// Returns the working directory.
    pub fn pwd(&self) -> &Path {
        &self.pwd
    }

    /// Sets the working directory.
    pub fn set_pwd(&mut self, pwd: PathBuf) {
        self.pwd = pwd;
    }

    /// Registers a built-in command. Commands are looked up in registration
    /// order.
    pub fn register_builtin(&mut self, builtin: Box<dyn Command>) {
        self.builtins.push(builtin);
    }

    /// Returns the first built-in command with a specific name.
    pub fn get_builtin(&self, name: &str) -> Option<&dyn Command> {
        self.builtins
            .iter()
            .find(|builtin| builtin.name() == name)
            .map(|builtin| builtin.as_ref())
    }

    /// Returns the names of all built-in commands in lookup order.
    pub fn builtin_names(&self) -> Vec<&str> {
        self.builtins.iter().map(|builtin| builtin.name()).collect()
    }
}

impl Default for Context {
    fn default() -> Self {
        let pwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::new(pwd)
    }
}
