use std::fmt::Display;

use opsh_core::FileDescriptorError;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug)]
pub enum EvalError {
    FileDescriptorError(usize, FileDescriptorError),
    ChildSpawnFailed(String, std::io::Error),
    CreatePipeFailed(std::io::Error),
    PipelineFailed(Vec<std::io::Error>),
    UnknownCommand(String),
}

impl Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::FileDescriptorError(fd, err) => match err {
                FileDescriptorError::UnusableForOutput => {
                    write!(f, "file descriptor {fd} cannot be used for output")
                }
                FileDescriptorError::UnusableForInput => {
                    write!(f, "file descriptor {fd} cannot be used for input")
                }
                FileDescriptorError::FileNotReadable(path, err) => {
                    write!(f, "file '{}' is not readable: {err}", path.display())
                }
                FileDescriptorError::FileNotWritable(path, err) => {
                    write!(f, "file '{}' is not writable: {err}", path.display())
                }
            },
            EvalError::ChildSpawnFailed(program, err) => {
                write!(f, "failed to spawn child process '{program}': {err}")
            }
            EvalError::CreatePipeFailed(err) => write!(f, "failed to create pipe: {err}"),
            EvalError::PipelineFailed(errors) => write!(f, "pipeline failed: {:?}", errors),
            EvalError::UnknownCommand(command) => write!(f, "unknown command: {command}"),
        }
    }
}

impl std::error::Error for EvalError {}
