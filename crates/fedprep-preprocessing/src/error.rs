//! Error types for scalers.

use fedprep_frame::FrameError;
use thiserror::Error;

/// Errors raised by `fit`, `transform` and their variants.
#[derive(Debug, Error)]
pub enum PreprocessError {
    // === Contract violations ===
    /// Input is not a partitioned frame.
    #[error("Accepts HDataFrame/VDataFrame/MixDataFrame only")]
    UnsupportedInput,

    /// `transform` called before `fit`.
    #[error("Scaler has not been fit yet.")]
    NotFitted,

    /// Column count differs from the one seen at fit time.
    #[error("X has {actual} features, but {scaler} is expecting {expected} features as input.")]
    FeatureCountMismatch {
        scaler: &'static str,
        actual: usize,
        expected: usize,
    },

    /// Fitted state does not match the layout of the frame being transformed.
    #[error("scaler was fitted on {fitted} but got {actual}")]
    StateMismatch { fitted: String, actual: String },

    // === Options ===
    /// Requested output range is empty or reversed.
    #[error("minimum of desired feature range must be smaller than maximum, got ({min}, {max})")]
    InvalidFeatureRange { min: f64, max: f64 },

    // === Collaborators ===
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Result type for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count_message() {
        let err = PreprocessError::FeatureCountMismatch {
            scaler: "StandardScaler",
            actual: 6,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "X has 6 features, but StandardScaler is expecting 1 features as input."
        );
    }

    #[test]
    fn test_frame_error_is_transparent() {
        let err: PreprocessError = FrameError::ColumnNotFound {
            column: "b9".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "column 'b9' not found");
    }
}
