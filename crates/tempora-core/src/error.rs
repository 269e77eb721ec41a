use thiserror::Error;

use crate::edge::Timestamp;

/// Errors that can occur in tempora-core.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Binary (bincode) encode/decode error.
    #[cfg(feature = "binary")]
    #[error("Binary codec error: {0}")]
    Binary(#[from] bincode::Error),
    /// A required CSV column is missing.
    #[error("missing column `{0}` in {1}")]
    MissingColumn(&'static str, String),
    /// A cell could not be parsed as the expected type.
    #[error("row {row}: cannot parse `{value}` as {expected}")]
    BadCell {
        row: usize,
        value: String,
        expected: &'static str,
    },
    /// Split masks were requested before being generated or loaded.
    #[error("split masks have not been loaded; call generate_splits first")]
    SplitNotLoaded,
    /// Node label events were requested but the dataset has none.
    #[error("node label events have not been loaded for dataset `{0}`")]
    LabelsNotLoaded(String),
    /// Vector/matrix shapes disagree.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    /// Operation requires at least one edge.
    #[error("dataset `{0}` has no edges")]
    EmptyDataset(String),
    /// Split ratios must be in [0, 1) and sum below 1.
    #[error("invalid split ratios: val={val}, test={test}")]
    InvalidRatio { val: f64, test: f64 },
    /// Invalid time range for a window query.
    #[error("invalid time range: start {start} > end {end}")]
    InvalidTimeRange { start: Timestamp, end: Timestamp },
    /// Chronological order is required before batching or splitting.
    #[error("edge list must be sorted by time; call sort_by_time first")]
    Unsorted,
    /// Batch size of zero makes no progress.
    #[error("batch size must be positive")]
    ZeroBatchSize,
    /// A split mask did not select a contiguous run of the sorted stream.
    #[error("split `{0}` is not a contiguous time range of the stream")]
    NonContiguousSplit(String),
    /// Split masks overlap or leave an edge uncovered.
    #[error("split masks are not a partition at edge {0}")]
    MaskNotPartition(usize),
}

/// Result type alias for tempora-core.
pub type Result<T> = std::result::Result<T, Error>;
