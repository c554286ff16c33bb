use crate::{command::Io, Context};

/// Arguments that can be passed to a command.
pub struct Args<'a> {
    /// Execution context for the command.
    pub context: &'a mut Context,
    /// File descriptors that the command can use for input and output.
    pub io: Io,
    /// The command's full argument list, starting with its name.
    pub arguments: Vec<String>,
}

impl<'a> Args<'a> {
    pub fn new(context: &'a mut Context, io: Io, arguments: Vec<String>) -> Self {
        Self {
            context,
            io,
            arguments,
        }
    }
}
