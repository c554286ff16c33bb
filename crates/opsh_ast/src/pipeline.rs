use crate::CommandStage;

/// A pipeline allows multiple programs to be connected using "pipes", sending
/// one program's output as input for another program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    /// Whether or not to execute the pipeline in the background.
    ///
    /// Background pipelines are not waited for when executed. Their processes
    /// are instead tracked as jobs until they are reaped.
    pub is_async: bool,

    /// Individual stages arranged such that the `n`-th stage writes its output
    /// to the input of the `(n+1)`-th stage.
    ///
    /// An empty list of stages represents a no-op.
    pub stages: Vec<CommandStage>,

    /// File redirects for the pipeline's outermost standard streams.
    pub redirects: Redirects,
}

/// File redirects for a pipeline.
///
/// The input file is connected to the first stage's standard input, and the
/// output file is connected to the last stage's standard output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirects {
    /// File to read standard input from.
    pub input: Option<String>,

    /// File to write standard output to. The file is created or truncated.
    pub output: Option<String>,
}

impl Pipeline {
    /// Returns `true` if there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the pipeline's only stage, if it consists of exactly one stage.
    pub fn single_stage(&self) -> Option<&CommandStage> {
        match self.stages.as_slice() {
            [stage] => Some(stage),
            _ => None,
        }
    }
}
