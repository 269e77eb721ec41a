use thiserror::Error;

/// Errors that can occur in tempora-baseline.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the dataset layer.
    #[error(transparent)]
    Core(#[from] tempora_core::Error),
    /// Error from the negative-sampling layer.
    #[error(transparent)]
    Sample(#[from] tempora_sample::Error),
    /// Error from the metric layer.
    #[error(transparent)]
    Eval(#[from] tempora_eval::Error),
    /// An observation's width does not match the forecaster's class count.
    #[error("observation width {got} != forecaster class count {expected}")]
    WidthMismatch { expected: usize, got: usize },
}

/// Result type alias for tempora-baseline.
pub type Result<T> = std::result::Result<T, Error>;
