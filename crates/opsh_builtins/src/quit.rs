use std::sync::Arc;

use clap::Parser;
use opsh_core::{
    command::{Action, Args, Command, CommandResult},
    wait_all,
};

use crate::{status, utils};

/// Command name.
const NAME: &str = "quit";

/// Exit the shell.
///
/// Waits for all background jobs to terminate before exiting, printing the
/// exit code of each job.
///
/// This is a built-in shell command.
#[derive(Parser)]
#[clap(name = NAME, version)]
struct QuitOpts {}

/// Implementation for the "quit" built-in command.
#[derive(Clone)]
pub struct Quit;
impl Command for Quit {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self, mut args: Args) -> CommandResult {
        if let Err(err) = QuitOpts::try_parse_from(&args.arguments) {
            return utils::exit_with_parse_error(&mut args.io, err);
        }

        let jobs = Arc::clone(&args.context.jobs);
        let stdout = &mut args.io.stdout;
        wait_all(&jobs, |completion| {
            let _ = writeln!(stdout, "{completion}");
        });

        CommandResult::with_actions(status::SUCCESS, vec![Action::Exit(status::SUCCESS)])
    }
}
