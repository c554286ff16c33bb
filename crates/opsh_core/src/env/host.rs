/// A host is a shell's representation of its terminal.
///
/// All shell-level output that is not produced by a child process, such as job
/// reports, passes through the host. A host may be written to from any thread.
pub trait Host: Send {
    /// Prints a line of text to the host's stdout equivalent.
    fn println(&mut self, text: &str);

    /// Prints a line of text to the host's stderr equivalent.
    fn eprintln(&mut self, text: &str);

    /// Sets the prompt that the user is currently being shown.
    fn set_prompt(&mut self, prompt: &str);

    /// Prints the current prompt again, without a trailing newline.
    ///
    /// Used after asynchronous output has been written on top of a prompt that
    /// is waiting for input.
    fn redisplay_prompt(&mut self);
}
