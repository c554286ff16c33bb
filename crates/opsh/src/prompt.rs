use std::path::Path;

use ansi_term::Colour::{Blue, Cyan};
use opsh_core::Context;

/// Placeholder for prompt values that cannot be determined.
const UNKNOWN: &str = "?";

/// Width of the startup banner's frame.
const BANNER_WIDTH: usize = 40;

/// Title displayed in the startup banner.
const BANNER_TITLE: &str = "OS PROJECT SHELL";

/// Returns the startup banner.
pub(crate) fn banner() -> String {
    let frame = "=".repeat(BANNER_WIDTH);
    let title = format!("{BANNER_TITLE:^width$}", width = BANNER_WIDTH - 2);
    format!("{frame}\n={}=\n{frame}", Cyan.paint(title))
}

/// Returns the prompt `user@host:cwd > ` for a context.
pub(crate) fn render_prompt(context: &Context) -> String {
    let user = std::env::var("USER").unwrap_or_else(|_| UNKNOWN.to_owned());
    let host = read_hostname().unwrap_or_else(|| UNKNOWN.to_owned());
    format_prompt(&user, &host, context.pwd())
}

fn format_prompt(user: &str, host: &str, pwd: &Path) -> String {
    let cwd = format!("{} > ", pwd.display());
    format!("{user}@{host}:{}", Blue.paint(cwd))
}

fn read_hostname() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use crate::shell::interactive::strip_ansi_escapes;

    use super::*;

    #[test]
    fn it_formats_prompts() {
        let prompt = format_prompt("alice", "box", Path::new("/home/alice"));
        assert_eq!(strip_ansi_escapes(&prompt), "alice@box:/home/alice > ");
    }

    #[test]
    fn it_renders_the_working_directory_of_a_context() {
        let context = Context::new("/tmp".into());
        assert!(strip_ansi_escapes(&render_prompt(&context)).ends_with(":/tmp > "));
    }

    #[test]
    fn it_frames_the_banner() {
        let banner = banner();
        let lines: Vec<_> = banner.lines().map(strip_ansi_escapes).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(BANNER_WIDTH));
        assert_eq!(lines[2], lines[0]);
        assert_eq!(lines[1].chars().count(), BANNER_WIDTH);
        assert_eq!(lines[1].trim_matches(|c| c == '=' || c == ' '), BANNER_TITLE);
    }
}
