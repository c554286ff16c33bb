mod call;
mod error;
mod pipeline;
mod reaper;

pub use error::{EvalError, EvalResult};
pub use pipeline::execute_pipeline;
pub use reaper::Reaper;

/// Loop status reported to the shell while it should keep reading input.
pub const CONTINUE: i32 = 1;

/// Tells the shell whether to keep reading input after executing a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line of input.
    Continue,
    /// Shut down the shell with an exit code.
    Exit(i32),
}

impl Flow {
    /// Returns the loop status: [`CONTINUE`] while the shell should keep
    /// running, and `0` when it should stop.
    pub fn status(self) -> i32 {
        match self {
            Flow::Continue => CONTINUE,
            Flow::Exit(_) => 0,
        }
    }
}
