/// Returns `true` if a character separates words.
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\u{0007}')
}

/// Splits a line of input into words.
///
/// Words are separated by any amount of whitespace. Quotes and escapes carry no
/// special meaning.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(is_whitespace)
        .filter(|word| !word.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_empty_input() {
        assert_eq!(tokenize(""), Vec::<&str>::new());
        assert_eq!(tokenize(" \t\r\n"), Vec::<&str>::new());
    }

    #[test]
    fn tokenize_words_separated_by_whitespace() {
        assert_eq!(
            tokenize("first\tsecond  third\n"),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn tokenize_treats_quotes_as_plain_text() {
        assert_eq!(tokenize(r#"echo "a b""#), vec!["echo", r#""a"#, r#"b""#]);
    }
}
