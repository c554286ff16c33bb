use opsh_ast::CommandStage;

use crate::ParseError;

use super::ParseResult;

/// Background marker.
const AMP: &str = "&";

/// Input redirection operator.
const READ: &str = "<";

/// Output redirection operator.
const WRITE: &str = ">";

/// Where a stage is located within its pipeline.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StagePosition {
    /// 1-based stage number.
    pub number: usize,
    pub is_first: bool,
    pub is_last: bool,
}

/// Words and directives extracted from a single stage.
#[derive(Debug, Default)]
pub(crate) struct StageParts {
    pub arguments: Vec<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub is_async: bool,
}

impl StageParts {
    /// Converts the parts into a [`CommandStage`], or `None` if no arguments
    /// remain after removing all directives.
    pub fn into_stage(self) -> Option<CommandStage> {
        CommandStage::new(self.arguments)
    }
}

/// Parses the tokens of a single pipeline stage.
///
/// The background marker is located first, and terminates the stage at its
/// position. Redirections are then extracted from the remaining tokens, and
/// whatever is left makes up the command's arguments.
pub(crate) fn parse_stage(tokens: Vec<&str>, position: StagePosition) -> ParseResult<StageParts> {
    let mut parts = StageParts::default();
    let mut tokens = tokens;

    // Only the last stage can send the pipeline to the background. A leading
    // "&" is an ordinary word.
    if position.is_last {
        if let Some(index) = tokens.iter().skip(1).position(|token| *token == AMP) {
            tokens.truncate(index + 1);
            parts.is_async = true;
        }
    }

    let mut tokens = tokens.into_iter();
    while let Some(token) = tokens.next() {
        match token {
            READ => {
                let target = redirect_target(&mut tokens, '<')?;
                if !position.is_first {
                    return Err(ParseError::MisplacedRedirection('<', position.number));
                }
                parts.input = Some(target);
            }
            WRITE => {
                let target = redirect_target(&mut tokens, '>')?;
                if !position.is_last {
                    return Err(ParseError::MisplacedRedirection('>', position.number));
                }
                parts.output = Some(target);
            }
            word => parts.arguments.push(word.to_owned()),
        }
    }

    Ok(parts)
}

/// Consumes the target of a redirection operator.
fn redirect_target<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    operator: char,
) -> ParseResult<String> {
    tokens
        .next()
        .map(str::to_owned)
        .ok_or(ParseError::MissingRedirectionTarget(operator))
}
