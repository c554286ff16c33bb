use super::Action;

/// Represents the result of executing a command.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code.
    ///
    /// Successful execution is typically represented by `0`.
    pub code: i32,

    /// Actions that should be taken by the shell after executing the command.
    pub actions: Vec<Action>,
}

impl CommandResult {
    /// Constructs a new `CommandResult` without any actions.
    pub fn code(code: i32) -> Self {
        Self {
            code,
            actions: Vec::new(),
        }
    }

    /// Constructs a new `CommandResult` with a code and some actions.
    pub fn with_actions(code: i32, actions: Vec<Action>) -> Self {
        Self { code, actions }
    }
}
