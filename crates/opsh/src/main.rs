mod error;
mod logging;
mod prompt;
mod shell;


use std::{path::PathBuf, sync::Arc};

use clap::{crate_version, Parser};
use error::{ErrorHandler, GuidingErrorHandler, SimpleErrorHandler};
use logging::{init_logging, LogLevel};
use opsh_builtins::all_builtins;
use opsh_core::{wait_all, Context};
use opsh_eval::{execute_pipeline, Flow, Reaper};
use opsh_parse::parse;
use shell::{
    command::SingleCommandShell, file::FileBufferShell, interactive::RustylineShell,
    stdin::StdinShell, Shell, ShellError, ShellInput, ShellResult,
};
use tracing::debug;

/// Command line options for the application's CLI.
#[derive(Parser)]
#[clap(
    about = "An interactive shell for pipelines and background jobs.",
    version = crate_version!()
)]
struct Opts {
    /// Command
    #[clap(short, long, conflicts_with("input"))]
    command: Option<String>,

    /// Input file
    input: Option<PathBuf>,

    /// Do not display the startup banner
    #[clap(long)]
    no_banner: bool,

    /// Log level, overriding the OPSH_LOG environment variable
    #[clap(long, value_enum)]
    log_level: Option<LogLevel>,
}

/// Entrypoint for the application.
pub fn main() {
    let opts = Opts::parse();
    let mut context = init_context();
    let startup_errors = SimpleErrorHandler::new(Arc::clone(&context.host));

    if let Err(error) = init_logging(opts.log_level) {
        startup_errors.display_error(error);
    }

    let shell = match select_shell(&opts) {
        Ok(shell) => shell,
        Err(error) => {
            startup_errors.display_error(error);
            std::process::exit(1);
        }
    };

    // Background jobs may only be started once terminated jobs can be reaped.
    if let Err(error) = Reaper::new(&context).listen() {
        startup_errors.display_error(ShellError::IoError(error));
        std::process::exit(1);
    }

    let error_handler: Box<dyn ErrorHandler> = if shell.is_interactive() {
        if !opts.no_banner {
            context.host.lock().println(&prompt::banner());
        }
        Box::new(GuidingErrorHandler::new(Arc::clone(&context.host)))
    } else {
        Box::new(startup_errors)
    };

    let code = run_shell(shell, &mut context, error_handler.as_ref());
    std::process::exit(code);
}

/// Selects a shell for the input source given on the command line.
fn select_shell(opts: &Opts) -> ShellResult<Box<dyn Shell>> {
    let shell: Box<dyn Shell> = match (&opts.input, &opts.command) {
        (Some(script_file), _) => Box::new(FileBufferShell::new(script_file)?),
        (None, Some(command)) => Box::new(SingleCommandShell::new(command.clone())),
        (None, None) if atty::is(atty::Stream::Stdin) => Box::new(RustylineShell::new()?),
        (None, None) => Box::new(StdinShell),
    };

    Ok(shell)
}

/// Constructs a context with all built-in commands registered.
fn init_context() -> Context {
    let mut context = Context::default();
    for builtin in all_builtins() {
        context.register_builtin(builtin);
    }
    context
}

/// Main loop for running a [`Shell`].
///
/// Returns the shell's exit code once the shell is told to exit or runs out of
/// input. Background jobs that are still running at the end of input are
/// waited for.
fn run_shell(mut shell: Box<dyn Shell>, context: &mut Context, errors: &dyn ErrorHandler) -> i32 {
    let interactive = shell.is_interactive();

    loop {
        let prompt = if interactive {
            prompt::render_prompt(context)
        } else {
            String::new()
        };

        // Job reports only redisplay the prompt while waiting for input.
        context.host.lock().set_prompt(&prompt);
        let input = shell.prompt_line(&prompt);
        context.host.lock().set_prompt("");

        let line = match input {
            ShellInput::Line(line) => line,
            ShellInput::Interrupt => continue,
            ShellInput::Logout => {
                context.host.lock().println("");
                break;
            }
            ShellInput::None => break,
        };

        if !line.trim().is_empty() {
            shell.add_history_entry(line.trim());
        }

        match eval_line(&line, context) {
            Ok(Flow::Continue) => (),
            Ok(Flow::Exit(code)) => return code,
            Err(error) => errors.display_error(error),
        }
    }

    drain_jobs(context);
    0
}

/// Parses and executes a line of input.
fn eval_line(line: &str, context: &mut Context) -> ShellResult<Flow> {
    let pipeline =
        parse(line).map_err(|error| ShellError::ParseError(error, line.trim_end().to_owned()))?;
    debug!(?pipeline, "executing pipeline");
    let flow = execute_pipeline(&pipeline, context)?;
    debug!(status = flow.status(), "pipeline finished");
    Ok(flow)
}

/// Waits for all background jobs, reporting each job's exit code.
fn drain_jobs(context: &Context) {
    let host = Arc::clone(&context.host);
    wait_all(&context.jobs, |completion| {
        host.lock().println(&completion.to_string())
    });
}
