use thiserror::Error;

/// Errors that can occur in tempora-eval.
#[derive(Error, Debug)]
pub enum Error {
    /// Score arrays disagree in length.
    #[error("score arrays disagree in length: {0} vs {1}")]
    LengthMismatch(usize, usize),
    /// A query has no candidates to rank against.
    #[error("query {0} has no negative candidates")]
    EmptyCandidates(usize),
    /// Label and prediction rows disagree in width.
    #[error("query {query}: label width {truth} != prediction width {pred}")]
    WidthMismatch {
        query: usize,
        truth: usize,
        pred: usize,
    },
    /// A requested metric does not apply to the task being scored.
    #[error("metric `{metric}` is not defined for {task} queries")]
    UnsupportedMetric { metric: String, task: &'static str },
}

/// Result type alias for tempora-eval.
pub type Result<T> = std::result::Result<T, Error>;
