use thiserror::Error;

use tempora_core::{NodeId, Split, Timestamp};

/// Errors that can occur in tempora-sample.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Binary (bincode) encode/decode error.
    #[error("Binary codec error: {0}")]
    Binary(#[from] bincode::Error),
    /// Error from the dataset layer.
    #[error(transparent)]
    Core(#[from] tempora_core::Error),
    /// A negative set was queried with the wrong split.
    #[error("negative set is for split `{expected}`, queried with `{got}`")]
    SplitMismatch { expected: Split, got: Split },
    /// A negative set was built for a different dataset.
    #[error("negative set is for dataset `{expected}`, used with `{got}`")]
    DatasetMismatch { expected: String, got: String },
    /// No pre-generated negatives exist for a positive edge.
    #[error("no negatives for edge ({src}, {dst}) at t={ts}")]
    EdgeNotFound {
        src: NodeId,
        dst: NodeId,
        ts: Timestamp,
    },
    /// Query columns disagree in length.
    #[error("query columns disagree in length: {0} vs {1}")]
    LengthMismatch(usize, usize),
    /// The destination universe has no valid candidate.
    #[error("destination universe has no candidate other than the positive")]
    EmptyUniverse,
    /// Unrecognized negative-set file extension.
    #[error("unknown negative-set format `{0}` (expected .json or .bin)")]
    UnknownFormat(String),
}

/// Result type alias for tempora-sample.
pub type Result<T> = std::result::Result<T, Error>;
