use thiserror::Error;

/// Parse errors are returned by the parser when a line cannot be turned into a
/// pipeline.
///
/// All parse errors abort the current line only. The shell should report them
/// and read the next line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A redirection operator was not followed by a target file.
    #[error("missing redirection target after '{0}'")]
    MissingRedirectionTarget(char),

    /// A redirection operator was used in a pipeline stage that cannot be
    /// redirected. Input may only be redirected for the first stage, and
    /// output may only be redirected for the last stage.
    ///
    /// Contains the operator and the 1-based stage number.
    #[error("redirection '{0}' is not allowed in pipeline stage {1}")]
    MisplacedRedirection(char, usize),

    /// A pipeline stage between pipes contains no words.
    ///
    /// Contains the 1-based stage number.
    #[error("pipeline stage {0} is empty")]
    EmptyStage(usize),
}

impl ParseError {
    /// Returns a help text associated with the error.
    pub fn help(&self) -> &str {
        match self {
            ParseError::MissingRedirectionTarget(_) => "a file name is expected here",
            ParseError::MisplacedRedirection('<', _) => {
                "only the first command in a pipeline can read from a file"
            }
            ParseError::MisplacedRedirection(_, _) => {
                "only the last command in a pipeline can write to a file"
            }
            ParseError::EmptyStage(_) => "a command is expected between pipes",
        }
    }
}
