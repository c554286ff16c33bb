use std::fmt::Display;

/// A command stage is a single program invocation within a pipeline.
///
/// The first argument is the name, or path, of the program to execute. A stage
/// always holds at least one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStage {
    arguments: Vec<String>,
}

impl CommandStage {
    /// Constructs a new stage from a list of arguments.
    ///
    /// Returns `None` if there are no arguments, as there is nothing to execute.
    pub fn new(arguments: Vec<String>) -> Option<Self> {
        if arguments.is_empty() {
            return None;
        }

        Some(Self { arguments })
    }

    /// Returns the name of the program to execute.
    pub fn program(&self) -> &str {
        &self.arguments[0]
    }

    /// Returns all arguments that are passed to the program, excluding the
    /// program name.
    pub fn args(&self) -> &[String] {
        &self.arguments[1..]
    }

    /// Returns the full argument list, including the program name.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

impl Display for CommandStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.arguments.join(" "))
    }
}
