//! Error types for aggregation and comparison.

use fedprep_device::Owner;
use thiserror::Error;

/// Errors raised while merging per-owner values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// Nothing to merge.
    #[error("no values to merge")]
    EmptyInput,

    /// A per-owner vector does not line up with the others.
    #[error("value from {owner} has {actual} elements, expected {expected}")]
    LengthMismatch {
        owner: Owner,
        expected: usize,
        actual: usize,
    },

    /// Weighted average called with a different number of weights than values.
    #[error("got {weights} weight vectors for {values} values")]
    WeightCountMismatch { values: usize, weights: usize },
}

/// Result type for merge strategies.
pub type Result<T> = std::result::Result<T, SecurityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SecurityError::LengthMismatch {
            owner: Owner::new("bob"),
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "value from bob has 2 elements, expected 3");
    }
}
