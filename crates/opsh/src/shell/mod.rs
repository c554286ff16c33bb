pub(crate) mod command;
pub(crate) mod file;
pub(crate) mod interactive;
pub(crate) mod stdin;

use opsh_eval::EvalError;
use opsh_parse::ParseError;

#[cfg(test)]
use mockall::automock;

pub(crate) enum ShellInput {
    /// A line of input.
    Line(String),

    /// Discard the current line.
    Interrupt,

    /// Exit the shell.
    Logout,

    /// No input.
    None,
}

/// Errors reported to the user while the shell is running.
#[derive(Debug)]
pub(crate) enum ShellError {
    /// Generic error.
    Error(String),

    /// A line that could not be parsed.
    ParseError(ParseError, String),

    /// A pipeline that could not be executed.
    EvalError(EvalError),

    /// IO error.
    IoError(std::io::Error),
}

impl From<EvalError> for ShellError {
    fn from(error: EvalError) -> Self {
        Self::EvalError(error)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error)
    }
}

pub(crate) type ShellResult<T> = Result<T, ShellError>;

#[cfg_attr(test, automock)]
pub(crate) trait Shell {
    /// Prompts the user for a line of input using a `prompt` text that may contain ANSI control
    /// sequences.
    fn prompt_line(&mut self, prompt: &str) -> ShellInput;

    /// Returns `true` if the user is prompted for each line of input.
    fn is_interactive(&self) -> bool;

    /// Appends a line entry to the shell's history.
    ///
    /// This feature is optional to implement, and may be a no-op.
    fn add_history_entry(&mut self, line: &str);
}
