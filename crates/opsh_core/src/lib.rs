pub mod command;
mod context;
mod env;
mod file_descriptor;
mod jobs;
pub mod utils;

pub use context::Context;
pub use env::host::Host;
pub use env::std_host::StdHost;
pub use file_descriptor::{FileDescriptor, FileDescriptorError, FD_STDIN, FD_STDOUT};
pub use jobs::{wait_all, Completion, JobRegistry, ManagedProcess, SharedJobs};
