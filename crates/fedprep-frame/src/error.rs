//! Error types for partitioned frames.

use fedprep_device::{DeviceError, Owner};
use fedprep_security::SecurityError;
use thiserror::Error;

/// Errors that can occur while building or querying partitioned frames.
#[derive(Debug, Error)]
pub enum FrameError {
    // === Construction ===
    /// A frame needs at least one partition (or element).
    #[error("frame has no partitions")]
    EmptyFrame,

    /// The same owner was given two partitions of one frame.
    #[error("owner {owner} holds more than one partition")]
    DuplicateOwner { owner: Owner },

    /// Row-partitioned fragments disagree on their column set.
    #[error("partition held by {owner} has columns {actual:?}, expected {expected:?}")]
    SchemaMismatch {
        owner: Owner,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A column appears in more than one column-partitioned fragment.
    #[error("column '{column}' appears in more than one partition")]
    DuplicateColumn { column: String },

    /// Composite elements are not held by the same owners.
    #[error("mix element {element} is held by {actual:?}, expected {expected:?}")]
    OwnerSetMismatch {
        element: usize,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    // === Column access ===
    /// Column not present in the frame's schema.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// Column selected for a statistic is not numeric.
    #[error("column '{column}' is not numeric ({dtype})")]
    NonNumericColumn { column: String, dtype: String },

    /// Owner not part of the frame.
    #[error("owner {owner} is not part of this frame")]
    UnknownOwner { owner: Owner },

    /// Owner-held scaling parameters are missing for a partition.
    #[error("no scaling parameters held by {owner}")]
    MissingParams { owner: Owner },

    // === Collaborators ===
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for FrameError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for frame operations.
pub type Result<T> = std::result::Result<T, FrameError>;
