//! Cross-owner merge strategies.
//!
//! Statistics that span several owners are merged by an [`Aggregator`]
//! (weighted numeric combination) or a [`Comparator`] (order statistics).
//! Both are injected as trait objects so a secure multi-party protocol can
//! replace the plaintext reference strategies without touching the engine.
//!
//! [`PlainAggregator`] and [`PlainComparator`] reveal their inputs and compute
//! on the owner they are bound to. They are suitable for simulation and tests.

mod aggregation;
mod comparison;
mod error;

pub use aggregation::{Aggregator, PlainAggregator};
pub use comparison::{Comparator, PlainComparator};
pub use error::{Result, SecurityError};

use fedprep_device::{OwnerValue, reveal};

/// Reveal every input and check they all have the same length.
fn reveal_aligned(data: &[OwnerValue<Vec<f64>>]) -> Result<Vec<Vec<f64>>> {
    if data.is_empty() {
        return Err(SecurityError::EmptyInput);
    }
    let revealed: Vec<Vec<f64>> = data.iter().map(reveal).collect();
    let expected = revealed[0].len();
    for (value, values) in data.iter().zip(&revealed) {
        if values.len() != expected {
            return Err(SecurityError::LengthMismatch {
                owner: value.owner().clone(),
                expected,
                actual: values.len(),
            });
        }
    }
    Ok(revealed)
}
