use std::sync::Arc;

use opsh_ast::Pipeline;
use opsh_core::{utils::resolve_path, Completion, Context, FileDescriptor, ManagedProcess};
use tracing::debug;

use crate::{
    call::{call_builtin_command, spawn_stage},
    error::{EvalError, EvalResult},
    Flow,
};

/// Executes a pipeline.
///
/// Single-stage pipelines naming a built-in command are run within the shell.
/// Everything else is run as one child process per stage. Foreground pipelines
/// are waited for, while background pipelines are registered as jobs and left
/// running.
pub fn execute_pipeline(pipeline: &Pipeline, context: &mut Context) -> EvalResult<Flow> {
    if pipeline.is_empty() {
        return Ok(Flow::Continue); // Nothing to execute.
    }

    if let Some(stage) = pipeline.single_stage() {
        if let Some(builtin) = context.get_builtin(stage.program()).map(|b| b.clone_box()) {
            return call_builtin_command(builtin.as_ref(), stage, &pipeline.redirects, context);
        }
    }

    if pipeline.is_async {
        start_background_pipeline(pipeline, context)
    } else {
        run_foreground_pipeline(pipeline, context)
    }
}

/// Spawns all stages of a pipeline and waits for every one of them to
/// terminate, in stage order.
fn run_foreground_pipeline(pipeline: &Pipeline, context: &Context) -> EvalResult<Flow> {
    let (processes, spawn_error) = spawn_stages(pipeline, context);

    // Stages that were spawned before a failure must still be waited for.
    let mut io_errors = Vec::new();
    for process in processes {
        let pid = process.pid();
        match process.wait() {
            Ok(status) => debug!(pid, ?status, "foreground process exited"),
            Err(error) => io_errors.push(error),
        }
    }

    if let Some(error) = spawn_error {
        return Err(error);
    }
    if !io_errors.is_empty() {
        return Err(EvalError::PipelineFailed(io_errors));
    }

    Ok(Flow::Continue)
}

/// Spawns all stages of a pipeline and registers them as background jobs.
///
/// The job registry stays locked from before the first spawn until every
/// process is registered and acknowledged. This prevents the reaper from
/// observing a process before it is registered, and guarantees that launch
/// acknowledgements are printed before completion reports.
fn start_background_pipeline(pipeline: &Pipeline, context: &Context) -> EvalResult<Flow> {
    let jobs = Arc::clone(&context.jobs);
    let mut registry = jobs.lock();

    let (processes, spawn_error) = spawn_stages(pipeline, context);

    let mut host = context.host.lock();
    for process in processes {
        let pid = registry.insert(process);
        host.println(&Completion::launched(pid).to_string());
    }

    match spawn_error {
        Some(error) => Err(error),
        None => Ok(Flow::Continue),
    }
}

/// Spawns one child process per stage, connecting adjacent stages with pipes.
///
/// The first stage reads from the input redirect, or the shell's stdin, and the
/// last stage writes to the output redirect, or the shell's stdout.
///
/// Spawning stops at the first failure. All processes spawned up until that
/// point are returned alongside the error, so that they can be accounted for.
fn spawn_stages(
    pipeline: &Pipeline,
    context: &Context,
) -> (Vec<ManagedProcess>, Option<EvalError>) {
    let last = pipeline.stages.len() - 1;
    let mut processes = Vec::with_capacity(pipeline.stages.len());

    let mut stdin = match &pipeline.redirects.input {
        Some(path) => FileDescriptor::File(resolve_path(context, path)),
        None => FileDescriptor::Stdin,
    };

    for (index, stage) in pipeline.stages.iter().enumerate() {
        let (stdout, next_stdin) = if index == last {
            let stdout = match &pipeline.redirects.output {
                Some(path) => FileDescriptor::File(resolve_path(context, path)),
                None => FileDescriptor::Stdout,
            };
            (stdout, None)
        } else {
            match os_pipe::pipe() {
                Ok((reader, writer)) => (
                    FileDescriptor::PipeWriter(writer),
                    Some(FileDescriptor::PipeReader(reader)),
                ),
                Err(error) => return (processes, Some(EvalError::CreatePipeFailed(error))),
            }
        };

        // Both ends handed to the stage are closed in the shell once it has been
        // spawned. Only the read end for the next stage remains open.
        match spawn_stage(stage, stdin, stdout, context) {
            Ok(child) => processes.push(ManagedProcess::new(child, stage.clone())),
            Err(error) => {
                debug!(stage = index + 1, "stopped spawning pipeline");
                return (processes, Some(error));
            }
        }

        match next_stdin {
            Some(fd) => stdin = fd,
            None => break,
        }
    }

    (processes, None)
}
