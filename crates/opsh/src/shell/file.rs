use std::{
    fs,
    io::{BufRead, BufReader},
    path::Path,
};

use super::{Shell, ShellInput, ShellResult};

/// A non-interactive shell that executes the lines of a script file.
pub struct FileBufferShell {
    reader: BufReader<fs::File>,
}

impl FileBufferShell {
    /// Opens a script file for reading.
    pub fn new(script_file: impl AsRef<Path>) -> ShellResult<Self> {
        let reader = BufReader::new(fs::File::open(script_file)?);
        Ok(Self { reader })
    }
}

impl Shell for FileBufferShell {
    fn prompt_line(&mut self, _prompt: &str) -> ShellInput {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => ShellInput::None,
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

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn it_yields_each_line_of_a_file() {
        let mut script = tempfile::NamedTempFile::new().unwrap();
        write!(script, "echo one\necho two").unwrap();

        let mut shell = FileBufferShell::new(script.path()).unwrap();

        assert!(matches!(shell.prompt_line(""), ShellInput::Line(line) if line == "echo one\n"));
        assert!(matches!(shell.prompt_line(""), ShellInput::Line(line) if line == "echo two"));
        assert!(matches!(shell.prompt_line(""), ShellInput::None));
    }

    #[test]
    fn it_fails_to_open_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileBufferShell::new(dir.path().join("missing.sh"));
        assert!(matches!(result, Err(crate::shell::ShellError::IoError(_))));
    }
}
