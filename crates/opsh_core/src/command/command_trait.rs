use super::{args::Args, CommandResult};

/// A built-in command, executed within the shell process.
///
/// Built-in commands are looked up by name when a pipeline consists of a
/// single stage.
pub trait Command: CommandClone + Send + Sync {
    /// Returns the name that the command is invoked by.
    fn name(&self) -> &str;

    /// Runs the command to completion.
    fn run(&self, args: Args) -> CommandResult;
}

/// Clones boxed commands, so that a command can be run while the context
/// that registered it is mutably borrowed.
pub trait CommandClone {
    fn clone_box(&self) -> Box<dyn Command>;
}

impl<T: Command + Clone + 'static> CommandClone for T {
    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}
