mod pipeline;
mod stage;


pub use pipeline::parse;

use crate::ParseError;

pub type ParseResult<T> = Result<T, ParseError>;
