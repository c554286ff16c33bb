use opsh_ast::Pipeline;
use tracing::debug;

use crate::{lex::tokenize, ParseError};

use super::{
    stage::{parse_stage, StagePosition},
    ParseResult,
};

/// Pipe delimiter separating pipeline stages.
const PIPE: char = '|';

/// Parses a line of input into a [`Pipeline`].
///
/// The line is first split on pipes, after which each segment is tokenized and
/// parsed as a separate stage. Blank input results in an empty pipeline.
pub fn parse(line: &str) -> ParseResult<Pipeline> {
    let segments: Vec<&str> = line.split(PIPE).collect();
    let last = segments.len() - 1;
    let mut pipeline = Pipeline::default();

    for (index, segment) in segments.into_iter().enumerate() {
        let position = StagePosition {
            number: index + 1,
            is_first: index == 0,
            is_last: index == last,
        };
        let mut parts = parse_stage(tokenize(segment), position)?;

        // A lone command may be empty, but every stage in a chain must do something.
        if parts.arguments.is_empty() && last > 0 {
            return Err(ParseError::EmptyStage(position.number));
        }
        debug!(stage = position.number, words = ?parts.arguments, "parsed pipeline stage");

        if let Some(input) = parts.input.take() {
            pipeline.redirects.input = Some(input);
        }
        if let Some(output) = parts.output.take() {
            pipeline.redirects.output = Some(output);
        }
        pipeline.is_async |= parts.is_async;
        pipeline.stages.extend(parts.into_stage());
    }

    Ok(pipeline)
}
