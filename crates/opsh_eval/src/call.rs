use std::{
    io,
    process::{self, Child},
};

use opsh_ast::{CommandStage, Redirects};
use opsh_core::{
    command::{Action, Args, Command, Io},
    utils::resolve_path,
    Context, FileDescriptor, FD_STDIN, FD_STDOUT,
};
use tracing::debug;

use crate::{
    error::{EvalError, EvalResult},
    Flow,
};

/// Calls a built-in command within the shell process.
///
/// Output redirection applies to the command's standard output. The command's
/// actions are carried out once it returns.
pub fn call_builtin_command(
    command: &dyn Command,
    stage: &CommandStage,
    redirects: &Redirects,
    context: &mut Context,
) -> EvalResult<Flow> {
    let stdout = match &redirects.output {
        Some(path) => FileDescriptor::File(resolve_path(context, path)),
        None => FileDescriptor::Stdout,
    };
    let stdout = stdout
        .writer()
        .map_err(|e| EvalError::FileDescriptorError(FD_STDOUT, e))?;

    let io = Io::new(stdout, Box::new(io::stderr()));
    let result = command.run(Args::new(context, io, stage.arguments().to_vec()));
    debug!(builtin = command.name(), code = result.code, "built-in command finished");

    for action in result.actions {
        match action {
            Action::Exit(code) => return Ok(Flow::Exit(code)),
        }
    }

    Ok(Flow::Continue)
}

/// Spawns a child process for a stage, connecting its standard streams to file
/// descriptors.
///
/// Both file descriptors are consumed. Any handle they hold is closed in the
/// shell process before this function returns, leaving the child as its only
/// owner.
pub fn spawn_stage(
    stage: &CommandStage,
    stdin: FileDescriptor,
    stdout: FileDescriptor,
    context: &Context,
) -> EvalResult<Child> {
    let mut cmd = process::Command::new(stage.program());
    cmd.args(stage.args());

    // Spawn the new process within the context's working directory rather than that
    // of the current process.
    cmd.current_dir(context.pwd());

    cmd.stdin(
        stdin
            .input()
            .map_err(|e| EvalError::FileDescriptorError(FD_STDIN, e))?,
    );
    cmd.stdout(
        stdout
            .output()
            .map_err(|e| EvalError::FileDescriptorError(FD_STDOUT, e))?,
    );

    let child = cmd.spawn().map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => EvalError::UnknownCommand(stage.program().to_owned()),
        _ => EvalError::ChildSpawnFailed(stage.program().to_owned(), error),
    })?;

    debug!(pid = child.id(), stage = %stage, "spawned child process");
    Ok(child)
}
