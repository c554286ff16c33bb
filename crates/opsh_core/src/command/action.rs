type ExitCode = i32;

/// Represents an action that should be performed by the shell.
///
/// Actions allow commands to perform tasks that the shell is normally
/// responsible for, and that a command itself is unable to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Exit the shell with an exit code.
    Exit(ExitCode),
}
