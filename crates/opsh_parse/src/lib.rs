mod error;
mod lex;
mod parse;

pub use error::ParseError;
pub use lex::{is_whitespace, tokenize};
pub use parse::{parse, ParseResult};
