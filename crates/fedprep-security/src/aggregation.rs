//! Weighted numeric combination across owners.

use std::fmt;

use fedprep_device::{Owner, OwnerValue};

use crate::{Result, SecurityError, reveal_aligned};

/// Merges per-owner numeric vectors element-wise.
///
/// Implementations must be associative and commutative over their inputs;
/// callers never rely on owner order for correctness.
pub trait Aggregator: Send + Sync + fmt::Debug {
    /// Element-wise sum of the inputs.
    ///
    /// # Errors
    ///
    /// Fails on empty input or on vectors of different lengths.
    fn sum(&self, data: &[OwnerValue<Vec<f64>>]) -> Result<OwnerValue<Vec<f64>>>;

    /// Element-wise (weighted) average of the inputs.
    ///
    /// With weights, a term whose weight is zero is left out entirely and an
    /// element whose total weight is zero is NaN.
    ///
    /// # Errors
    ///
    /// Fails on empty input, vectors of different lengths, or a weight
    /// count that does not match the value count.
    fn average(
        &self,
        data: &[OwnerValue<Vec<f64>>],
        weights: Option<&[OwnerValue<Vec<f64>>]>,
    ) -> Result<OwnerValue<Vec<f64>>>;
}

/// Plaintext aggregation computed on a single owner.
#[derive(Debug, Clone)]
pub struct PlainAggregator {
    device: Owner,
}

impl PlainAggregator {
    /// Aggregate on `device`.
    pub fn new(device: Owner) -> Self {
        Self { device }
    }

    /// The owner the merged values are placed on.
    pub fn device(&self) -> &Owner {
        &self.device
    }
}

impl Aggregator for PlainAggregator {
    fn sum(&self, data: &[OwnerValue<Vec<f64>>]) -> Result<OwnerValue<Vec<f64>>> {
        let values = reveal_aligned(data)?;
        Ok(self.device.run(|| {
            let mut total = vec![0.0; values[0].len()];
            for row in &values {
                for (acc, v) in total.iter_mut().zip(row) {
                    *acc += v;
                }
            }
            total
        }))
    }

    fn average(
        &self,
        data: &[OwnerValue<Vec<f64>>],
        weights: Option<&[OwnerValue<Vec<f64>>]>,
    ) -> Result<OwnerValue<Vec<f64>>> {
        let values = reveal_aligned(data)?;
        let weights = match weights {
            Some(weights) => {
                if weights.len() != data.len() {
                    return Err(SecurityError::WeightCountMismatch {
                        values: data.len(),
                        weights: weights.len(),
                    });
                }
                let weights = reveal_aligned(weights)?;
                if weights[0].len() != values[0].len() {
                    return Err(SecurityError::LengthMismatch {
                        owner: self.device.clone(),
                        expected: values[0].len(),
                        actual: weights[0].len(),
                    });
                }
                weights
            }
            None => vec![vec![1.0; values[0].len()]; values.len()],
        };
        tracing::debug!(
            device = %self.device,
            inputs = values.len(),
            width = values[0].len(),
            "plain weighted average"
        );
        Ok(self.device.run(|| weighted_average(&values, &weights)))
    }
}

fn weighted_average(values: &[Vec<f64>], weights: &[Vec<f64>]) -> Vec<f64> {
    let width = values[0].len();
    let mut result = Vec::with_capacity(width);
    for idx in 0..width {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (row, row_weights) in values.iter().zip(weights) {
            let weight = row_weights[idx];
            if weight == 0.0 {
                continue;
            }
            weighted += weight * row[idx];
            total += weight;
        }
        result.push(if total == 0.0 {
            f64::NAN
        } else {
            weighted / total
        });
    }
    result
}
