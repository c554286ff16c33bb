use std::{borrow::Cow, path::PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use rustyline::{
    completion::{Completer, FilenameCompleter, Pair},
    error::ReadlineError,
    highlight::{Highlighter, MatchingBracketHighlighter},
    hint::{Hinter, HistoryHinter},
    history::FileHistory,
    validate::{self, ValidationResult, Validator},
    Config, Context, Editor,
};
use rustyline_derive::Helper;
use tracing::warn;

use super::{Shell, ShellError, ShellInput, ShellResult};

/// History file location relative to the user's home directory.
const USER_HISTORY_FILE_NAME: &str = ".opsh/history.txt";

/// An interactive shell that prompts the user for input.
///
/// Reads input from stdin.
pub struct RustylineShell {
    /// Rustyline editor.
    editor: Editor<ShellHelper, FileHistory>,
}

impl RustylineShell {
    /// Constructs a new interactive shell with history loaded from the user's
    /// history file.
    pub fn new() -> ShellResult<Self> {
        let helper = ShellHelper {
            completer: FilenameCompleter::new(),
            highlighter: MatchingBracketHighlighter::new(),
            hinter: HistoryHinter {},
            colored_prompt: "> ".to_owned(),
        };

        let config = Config::builder().build();
        let mut editor =
            Editor::with_config(config).map_err(|err| ShellError::Error(err.to_string()))?;
        editor.set_helper(Some(helper));

        let mut shell = Self { editor };
        shell.load_history_file();

        Ok(shell)
    }

    fn load_history_file(&mut self) {
        if let Some(history_file) = history_file_path() {
            if history_file.exists() {
                if let Err(error) = self.editor.load_history(&history_file) {
                    warn!(%error, "failed to load history");
                }
            }
        }
    }
}

impl Shell for RustylineShell {
    fn prompt_line(&mut self, prompt: &str) -> ShellInput {
        // Set a colored prompt from the input. This prompt allows ANSI control sequences to be
        // passed to the terminal.
        if let Some(helper) = self.editor.helper_mut() {
            helper.colored_prompt = prompt.to_string();
        }

        // The editor determines the cursor's position through the prompt's length in characters.
        // ANSI escape codes contribute to that length, so they must be stripped.
        let prompt_text = strip_ansi_escapes(prompt);
        match self.editor.readline(&prompt_text) {
            Ok(mut line) => {
                line.push('\n');
                ShellInput::Line(line)
            }
            Err(ReadlineError::Interrupted) => ShellInput::Interrupt,
            Err(ReadlineError::Eof) => ShellInput::Logout,
            Err(error) => {
                eprintln!("opsh: unhandled input: {error}");
                ShellInput::None
            }
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn add_history_entry(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);

        let Some(history_file) = history_file_path() else {
            return;
        };
        if let Some(parent) = history_file.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(error) = self.editor.append_history(&history_file) {
            warn!(%error, "failed to save history");
        }
    }
}

/// Rustyline shell helper for enhancing the user experience.
#[derive(Helper)]
struct ShellHelper {
    /// File name completion for command arguments.
    completer: FilenameCompleter,

    /// Text color highlighter.
    highlighter: MatchingBracketHighlighter,

    /// Suggestion hinter.
    hinter: HistoryHinter,

    /// Colored shell prompt optionally containing ANSI control sequences.
    colored_prompt: String,
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ShellHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Borrowed(&self.colored_prompt)
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned("\x1b[2m".to_owned() + hint + "\x1b[m")
    }

    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize) -> bool {
        self.highlighter.highlight_char(line, pos)
    }
}

impl Validator for ShellHelper {
    fn validate(&self, _: &mut validate::ValidationContext) -> rustyline::Result<ValidationResult> {
        // Every line is a complete pipeline. The parser reports invalid input.
        Ok(ValidationResult::Valid(None))
    }

    fn validate_while_typing(&self) -> bool {
        false
    }
}

/// Returns a path to the current user's shell history file.
fn history_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|mut path| {
        path.push(USER_HISTORY_FILE_NAME);
        path
    })
}

/// Strips all ANSI control sequences from some text.
pub(crate) fn strip_ansi_escapes(text: &str) -> Cow<str> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").unwrap();
    }
    RE.replace_all(text, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_strips_ansi_escapes() {
        assert_eq!(
            strip_ansi_escapes("\x1b[34muser@host:/tmp > \x1b[0m"),
            "user@host:/tmp > "
        );
        assert_eq!(strip_ansi_escapes("plain > "), "plain > ");
    }

    #[test]
    fn it_configures_an_editor_with_file_history() {
        let shell = RustylineShell::new().unwrap();

        assert!(shell.is_interactive());
        assert!(shell.editor.helper().is_some());
        assert!(history_file_path().map_or(true, |path| path.ends_with(USER_HISTORY_FILE_NAME)));
    }
}
