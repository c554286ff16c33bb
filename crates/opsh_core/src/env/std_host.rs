use std::io::Write;

use super::host::Host;

/// A host wrapping the standard streams of the current process.
#[derive(Default)]
pub struct StdHost {
    /// The prompt most recently shown to the user.
    prompt: String,
}

impl Host for StdHost {
    fn println(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
        let _ = stdout.flush();
    }

    fn eprintln(&mut self, text: &str) {
        let _ = writeln!(std::io::stderr(), "{text}");
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_owned();
    }

    fn redisplay_prompt(&mut self) {
        if self.prompt.is_empty() {
            return;
        }

        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", self.prompt);
        let _ = stdout.flush();
    }
}
