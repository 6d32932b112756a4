//! Order statistics across owners.

use std::fmt;

use fedprep_device::{Owner, OwnerValue};

use crate::{Result, reveal_aligned};

/// Computes element-wise order statistics over per-owner vectors.
///
/// NaN entries are ignored; an element that is NaN for every owner stays NaN.
pub trait Comparator: Send + Sync + fmt::Debug {
    /// Element-wise minimum.
    ///
    /// # Errors
    ///
    /// Fails on empty input or on vectors of different lengths.
    fn min(&self, data: &[OwnerValue<Vec<f64>>]) -> Result<OwnerValue<Vec<f64>>>;

    /// Element-wise maximum.
    ///
    /// # Errors
    ///
    /// Fails on empty input or on vectors of different lengths.
    fn max(&self, data: &[OwnerValue<Vec<f64>>]) -> Result<OwnerValue<Vec<f64>>>;
}

/// Plaintext comparison computed on a single owner.
#[derive(Debug, Clone)]
pub struct PlainComparator {
    device: Owner,
}

impl PlainComparator {
    /// Compare on `device`.
    pub fn new(device: Owner) -> Self {
        Self { device }
    }

    /// The owner the results are placed on.
    pub fn device(&self) -> &Owner {
        &self.device
    }

    fn fold(
        &self,
        data: &[OwnerValue<Vec<f64>>],
        pick: fn(f64, f64) -> f64,
    ) -> Result<OwnerValue<Vec<f64>>> {
        let values = reveal_aligned(data)?;
        Ok(self.device.run(|| {
            let mut acc = vec![f64::NAN; values[0].len()];
            for row in &values {
                for (slot, v) in acc.iter_mut().zip(row) {
                    *slot = pick(*slot, *v);
                }
            }
            acc
        }))
    }
}

impl Comparator for PlainComparator {
    fn min(&self, data: &[OwnerValue<Vec<f64>>]) -> Result<OwnerValue<Vec<f64>>> {
        self.fold(data, f64::min)
    }

    fn max(&self, data: &[OwnerValue<Vec<f64>>]) -> Result<OwnerValue<Vec<f64>>> {
        self.fold(data, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecurityError;

    fn values(owner: &str, data: &[f64]) -> OwnerValue<Vec<f64>> {
        let data = data.to_vec();
        Owner::new(owner).run(move || data)
    }

    #[test]
    fn test_min_max_elementwise() {
        let comparator = PlainComparator::new(Owner::new("carol"));
        let data = [values("alice", &[1.0, 9.0]), values("bob", &[4.0, -2.0])];
        let min = comparator.min(&data).unwrap();
        assert_eq!(min.owner(), &Owner::new("carol"));
        assert_eq!(min.reveal(), vec![1.0, -2.0]);
        assert_eq!(comparator.max(&data).unwrap().reveal(), vec![4.0, 9.0]);
    }

    #[test]
    fn test_nan_is_ignored() {
        let comparator = PlainComparator::new(Owner::new("carol"));
        let data = [
            values("alice", &[f64::NAN, f64::NAN]),
            values("bob", &[3.0, f64::NAN]),
        ];
        let max = comparator.max(&data).unwrap().reveal();
        assert_eq!(max[0], 3.0);
        assert!(max[1].is_nan());
    }

    #[test]
    fn test_rejects_empty_input() {
        let comparator = PlainComparator::new(Owner::new("carol"));
        assert_eq!(comparator.min(&[]).unwrap_err(), SecurityError::EmptyInput);
    }
}
