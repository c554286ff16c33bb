use super::{Shell, ShellInput};

/// A non-interactive shell that executes a single line of input.
pub struct SingleCommandShell {
    it: Option<String>,
}

impl SingleCommandShell {
    pub fn new(line: String) -> Self {
        Self { it: Some(line) }
    }
}

impl Shell for SingleCommandShell {
    fn prompt_line(&mut self, _prompt: &str) -> ShellInput {
        match self.it.take() {
            Some(line) => ShellInput::Line(line),
            None => ShellInput::None,
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }

    fn add_history_entry(&mut self, _line: &str) {
        // Intentionally left blank.
    }
}
