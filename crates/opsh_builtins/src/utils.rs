use opsh_core::command::{CommandResult, Io};

use crate::status;

/// Reports a command line that a built-in command could not accept.
///
/// Requests for help or version information are reported as errors by
/// `clap`. Those are written to stdout and succeed, while actual usage errors
/// are written to stderr.
pub fn exit_with_parse_error(io: &mut Io, error: clap::Error) -> CommandResult {
    let code = if error.use_stderr() {
        let _ = writeln!(io.stderr, "{error}");
        status::BUILTIN_ERROR
    } else {
        let _ = writeln!(io.stdout, "{error}");
        status::SUCCESS
    };

    CommandResult::code(code)
}

/// Returns an [`Io`] writing to temporary files, along with the files.
#[cfg(test)]
pub(crate) fn mock_io() -> (Io, std::fs::File, std::fs::File) {
    let stdout = tempfile::tempfile().unwrap();
    let stderr = tempfile::tempfile().unwrap();
    let io = Io::new(
        Box::new(stdout.try_clone().unwrap()),
        Box::new(stderr.try_clone().unwrap()),
    );
    (io, stdout, stderr)
}

/// Reads a temporary file from the start.
#[cfg(test)]
pub(crate) fn file_contents(file: &mut std::fs::File) -> String {
    use std::io::{Read, Seek};

    let mut contents = String::new();
    file.rewind().unwrap();
    file.read_to_string(&mut contents).unwrap();
    contents
}
