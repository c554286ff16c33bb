use std::io::Write;

/// Output streams of a built-in command.
///
/// Built-in commands run inside the shell process and never read input, so
/// only their output streams are plain writers. Output redirection replaces
/// `stdout` with the target file.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use opsh_core::command::Io;
///
/// let mut io = Io::new(Box::new(Vec::new()), Box::new(std::io::sink()));
/// writeln!(io.stdout, "printed by a built-in command").unwrap();
/// ```
pub struct Io {
    pub stdout: Box<dyn Write + Send>,
    pub stderr: Box<dyn Write + Send>,
}

impl Io {
    pub fn new(stdout: Box<dyn Write + Send>, stderr: Box<dyn Write + Send>) -> Self {
        Self { stdout, stderr }
    }
}
