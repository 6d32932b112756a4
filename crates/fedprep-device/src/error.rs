//! Error types for owner-scoped computation.

use thiserror::Error;

use crate::Owner;

/// Errors raised by the execution substrate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Two values held by different owners were combined without a reveal.
    #[error("cannot combine a value held by {left} with a value held by {right}")]
    OwnerMismatch { left: Owner, right: Owner },
}

/// Result type for substrate operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeviceError::OwnerMismatch {
            left: Owner::new("alice"),
            right: Owner::new("bob"),
        };
        assert_eq!(
            err.to_string(),
            "cannot combine a value held by alice with a value held by bob"
        );
    }
}
