use clap::Parser;
use opsh_core::command::{Args, Command, CommandResult};

use crate::{status, utils};

/// Command name.
const NAME: &str = "help";

/// Display information about the shell's built-in commands.
///
/// This is a built-in shell command.
#[derive(Parser)]
#[clap(name = NAME, version)]
struct HelpOpts {}

/// Implementation for the "help" built-in command.
#[derive(Clone)]
pub struct Help;
impl Command for Help {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self, mut args: Args) -> CommandResult {
        if let Err(err) = HelpOpts::try_parse_from(&args.arguments) {
            return utils::exit_with_parse_error(&mut args.io, err);
        }

        let mut text = String::from("OS Project Shell\nBuilt-in commands:\n");
        for name in args.context.builtin_names() {
            text.push_str(&format!("  {name}\n"));
        }
        text.push_str("Use 'man' for information about other programs.\n");

        match write!(args.io.stdout, "{text}") {
            Ok(_) => CommandResult::code(status::SUCCESS),
            Err(_) => CommandResult::code(status::GENERAL_ERROR),
        }
    }
}
