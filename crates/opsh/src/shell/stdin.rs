use std::io::stdin;

use super::{Shell, ShellInput};

/// A non-interactive shell that reads input from stdin.
///
/// Used when stdin is not a terminal. No prompt is displayed.
pub struct StdinShell;

impl Shell for StdinShell {
    fn prompt_line(&mut self, _prompt: &str) -> ShellInput {
        let mut line = String::new();
        match stdin().read_line(&mut line) {
            Ok(0) | Err(_) => ShellInput::None, // No more input to read.
            Ok(_) => ShellInput::Line(line),
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }

    fn add_history_entry(&mut self, _line: &str) {
        // Intentionally left blank.
    }
}
