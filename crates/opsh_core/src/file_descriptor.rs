use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    os::unix::{fs::OpenOptionsExt, io::AsRawFd},
    path::PathBuf,
    process::Stdio,
};

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use os_pipe::{PipeReader, PipeWriter};

/// Index for the stdin file descriptor.
pub const FD_STDIN: usize = 0;

/// Index for the stdout file descriptor.
pub const FD_STDOUT: usize = 1;

/// Permissions for files created by output redirection.
const CREATE_MODE: u32 = 0o644;

/// File descriptor-related errors.
#[derive(Debug)]
pub enum FileDescriptorError {
    UnusableForOutput,
    UnusableForInput,
    FileNotReadable(PathBuf, io::Error),
    FileNotWritable(PathBuf, io::Error),
}

/// A file descriptor is a source, or target, for a command's standard streams.
///
/// Converting a file descriptor into a [`Stdio`] consumes it. Ownership of the
/// underlying handle moves into the child's stream configuration, and the
/// handle is closed in the shell once that configuration is dropped.
#[derive(Debug)]
pub enum FileDescriptor {
    /// The shell's own standard input.
    Stdin,
    /// The shell's own standard output.
    Stdout,
    /// The read end of a pipe.
    PipeReader(PipeReader),
    /// The write end of a pipe.
    PipeWriter(PipeWriter),
    /// A file that is opened for reading, or created for writing, on use.
    File(PathBuf),
}

impl FileDescriptor {
    /// Returns a [`Stdio`] for reading from.
    pub fn input(self) -> Result<Stdio, FileDescriptorError> {
        match self {
            FileDescriptor::Stdin => Ok(Stdio::inherit()),
            FileDescriptor::PipeReader(reader) => Ok(Stdio::from(reader)),
            FileDescriptor::File(path) => open_for_reading(path).map(Stdio::from),
            FileDescriptor::Stdout | FileDescriptor::PipeWriter(_) => {
                Err(FileDescriptorError::UnusableForInput)
            }
        }
    }

    /// Returns a [`Stdio`] for writing to.
    ///
    /// Files are created if missing, and truncated otherwise.
    pub fn output(self) -> Result<Stdio, FileDescriptorError> {
        match self {
            FileDescriptor::Stdout => Ok(Stdio::inherit()),
            FileDescriptor::PipeWriter(writer) => Ok(Stdio::from(writer)),
            FileDescriptor::File(path) => open_for_writing(path).map(Stdio::from),
            FileDescriptor::Stdin | FileDescriptor::PipeReader(_) => {
                Err(FileDescriptorError::UnusableForOutput)
            }
        }
    }

    /// Returns a writer for use within the shell process itself.
    pub fn writer(self) -> Result<Box<dyn Write + Send>, FileDescriptorError> {
        match self {
            FileDescriptor::Stdout => Ok(Box::new(io::stdout())),
            FileDescriptor::File(path) => Ok(Box::new(open_for_writing(path)?)),
            FileDescriptor::Stdin
            | FileDescriptor::PipeReader(_)
            | FileDescriptor::PipeWriter(_) => Err(FileDescriptorError::UnusableForOutput),
        }
    }
}

// Files are opened without blocking, so that a FIFO without a peer cannot hang
// the shell. Blocking mode is restored before the file is handed to a child.

fn open_for_reading(path: PathBuf) -> Result<File, FileDescriptorError> {
    OpenOptions::new()
        .read(true)
        .custom_flags(OFlag::O_NONBLOCK.bits())
        .open(&path)
        .and_then(clear_nonblock)
        .map_err(|error| FileDescriptorError::FileNotReadable(path, error))
}

fn open_for_writing(path: PathBuf) -> Result<File, FileDescriptorError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(CREATE_MODE)
        .custom_flags(OFlag::O_NONBLOCK.bits())
        .open(&path)
        .and_then(clear_nonblock)
        .map_err(|error| FileDescriptorError::FileNotWritable(path, error))
}

fn clear_nonblock(file: File) -> io::Result<File> {
    let fd = file.as_raw_fd();
    let mut flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
    flags.remove(OFlag::O_NONBLOCK);
    fcntl(fd, FcntlArg::F_SETFL(flags))?;
    Ok(file)
}
