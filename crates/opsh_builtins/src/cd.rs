use std::ffi::OsString;

use clap::Parser;
use opsh_core::{
    command::{Args, Command, CommandResult, Io},
    utils::{path_to_string, resolve_path},
    Context,
};

use crate::{status, utils};

/// Command name.
const NAME: &str = "cd";

/// Change the shell's working directory.
///
/// This is a built-in shell command.
#[derive(Parser)]
#[clap(name = NAME, version)]
struct CdOpts {
    /// Directory to change to.
    directory: Option<OsString>,
}

/// Implementation for the "cd" built-in command.
#[derive(Clone)]
pub struct Cd;
impl Command for Cd {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self, mut args: Args) -> CommandResult {
        match CdOpts::try_parse_from(&args.arguments) {
            Ok(opts) => change_directory(opts, args.context, &mut args.io),
            Err(err) => utils::exit_with_parse_error(&mut args.io, err),
        }
    }
}

/// Changes the working directory of a context and of the shell process.
///
/// Returns an exit code.
fn change_directory(opts: CdOpts, ctx: &mut Context, io: &mut Io) -> CommandResult {
    let Some(directory) = opts.directory else {
        return exit_with_error(status::GENERAL_ERROR, io, "expected argument");
    };

    let path = resolve_path(ctx, &directory);
    if !path.is_dir() {
        let message = format!("{}: no such directory", path_to_string(&path));
        return exit_with_error(status::GENERAL_ERROR, io, &message);
    }

    // Store the canonical path so that ".." does not accumulate in the prompt.
    let changed = path
        .canonicalize()
        .and_then(|path| std::env::set_current_dir(&path).map(|_| path));
    match changed {
        Ok(path) => {
            ctx.set_pwd(path);
            CommandResult::code(status::SUCCESS)
        }
        Err(err) => exit_with_error(status::GENERAL_ERROR, io, &err.to_string()),
    }
}

/// Prints an error message to standard error.
///
/// Returns an exit code.
fn exit_with_error(status: i32, io: &mut Io, error: &str) -> CommandResult {
    let _ = writeln!(io.stderr, "{}: {}", NAME, error);
    CommandResult::code(status)
}
