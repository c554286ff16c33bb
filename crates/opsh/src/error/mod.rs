use std::sync::Arc;

use ansi_term::Colour::{Blue, Red};
use opsh_core::Host;
use opsh_parse::ParseError;
use parking_lot::Mutex;

use crate::shell::ShellError;

#[cfg(test)]
use mockall::automock;

/// Generalized error handler.
#[cfg_attr(test, automock)]
pub(crate) trait ErrorHandler {
    /// Displays an error.
    fn display_error(&self, error: ShellError);
}

/// A simple error handler, displaying errors on a single line.
pub(crate) struct SimpleErrorHandler {
    host: Arc<Mutex<dyn Host>>,
}

impl SimpleErrorHandler {
    pub fn new(host: Arc<Mutex<dyn Host>>) -> Self {
        Self { host }
    }
}

impl ErrorHandler for SimpleErrorHandler {
    fn display_error(&self, error: ShellError) {
        let message = format!("opsh: {}", error_message(&error));
        self.host.lock().eprintln(&message);
    }
}

/// A guiding error handler, displaying errors and help.
pub(crate) struct GuidingErrorHandler {
    host: Arc<Mutex<dyn Host>>,
}

impl GuidingErrorHandler {
    pub fn new(host: Arc<Mutex<dyn Host>>) -> Self {
        Self { host }
    }
}

impl ErrorHandler for GuidingErrorHandler {
    fn display_error(&self, error: ShellError) {
        let message = match error {
            ShellError::ParseError(error, line) => parse_error_details(&line, &error),
            error => format!("opsh: {}", error_message(&error)),
        };
        self.host.lock().eprintln(&message);
    }
}

/// Returns a single line message describing an error.
fn error_message(error: &ShellError) -> String {
    match error {
        ShellError::Error(error) => error.to_string(),
        ShellError::ParseError(error, _) => error.to_string(),
        ShellError::EvalError(error) => error.to_string(),
        ShellError::IoError(error) => error.to_string(),
    }
}

/// Formats a parse error together with the offending line and a help text.
fn parse_error_details(line: &str, error: &ParseError) -> String {
    format!(
        "opsh: {}: {error}\n  {} {line}\n  {} {}",
        Red.bold().paint("parse error"),
        Blue.bold().paint("|"),
        Blue.bold().paint("="),
        error.help(),
    )
}
