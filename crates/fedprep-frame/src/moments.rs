//! Per-column count, mean and variance, and how they merge across owners.
//!
//! An owner summarises its own rows into [`Moments`]; only those summaries
//! ever leave the owner. Two merge paths exist and agree up to rounding:
//!
//! - [`Moments::merge`] combines two summaries pairwise (parallel variance
//!   formula). Used when every summary already sits on one owner.
//! - [`merge_moments`] runs the direct weighted form through an
//!   [`Aggregator`], so the merge itself can be a secure protocol.

use fedprep_device::OwnerValue;
use fedprep_security::Aggregator;
use polars::prelude::DataFrame;

use crate::Result;
use crate::column::numeric_values;

/// Count, mean and population variance for a list of columns.
///
/// Missing values are excluded. A column with no values has count 0 and NaN
/// mean and variance.
#[derive(Debug, Clone, PartialEq)]
pub struct Moments {
    pub count: Vec<f64>,
    pub mean: Vec<f64>,
    pub var: Vec<f64>,
}

impl Moments {
    /// Summarise the named columns of a fragment.
    ///
    /// # Errors
    ///
    /// Fails if a column is missing or not numeric.
    pub fn from_frame(df: &DataFrame, columns: &[String]) -> Result<Self> {
        let mut moments = Self::with_capacity(columns.len());
        for name in columns {
            let values: Vec<f64> = numeric_values(df, name)?.into_iter().flatten().collect();
            let (count, mean, var) = column_moments(&values);
            moments.count.push(count);
            moments.mean.push(mean);
            moments.var.push(var);
        }
        Ok(moments)
    }

    fn with_capacity(width: usize) -> Self {
        Self {
            count: Vec::with_capacity(width),
            mean: Vec::with_capacity(width),
            var: Vec::with_capacity(width),
        }
    }

    /// Number of columns summarised.
    pub fn width(&self) -> usize {
        self.count.len()
    }

    /// Population standard deviation per column.
    pub fn std(&self) -> Vec<f64> {
        self.var.iter().map(|v| v.sqrt()).collect()
    }

    /// Combine with a summary of other rows over the same columns.
    pub fn merge(&self, other: &Moments) -> Moments {
        let mut merged = Self::with_capacity(self.width());
        for idx in 0..self.width() {
            let (na, nb) = (self.count[idx], other.count[idx]);
            let (count, mean, var) = if nb == 0.0 {
                (na, self.mean[idx], self.var[idx])
            } else if na == 0.0 {
                (nb, other.mean[idx], other.var[idx])
            } else {
                let n = na + nb;
                let delta = other.mean[idx] - self.mean[idx];
                let mean = self.mean[idx] + delta * nb / n;
                let m2 = self.var[idx] * na + other.var[idx] * nb + delta * delta * na * nb / n;
                (n, mean, m2 / n)
            };
            merged.count.push(count);
            merged.mean.push(mean);
            merged.var.push(var);
        }
        merged
    }

    /// Pairwise merge of any number of summaries.
    ///
    /// Returns `None` for an empty slice.
    pub fn merge_all<'a>(parts: impl IntoIterator<Item = &'a Moments>) -> Option<Moments> {
        parts.into_iter().fold(None, |acc: Option<Moments>, part| {
            Some(match acc {
                Some(acc) => acc.merge(part),
                None => part.clone(),
            })
        })
    }
}

fn column_moments(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (n, mean, var)
}

/// Merge per-owner summaries through an aggregator and reveal the result.
///
/// Owners contribute only their counts, means, and `var + (mean - global_mean)^2`.
/// Owners with no values in a column carry zero weight for that column.
///
/// # Errors
///
/// Propagates aggregator failures.
pub fn merge_moments(
    parts: &[OwnerValue<Moments>],
    aggregator: &dyn Aggregator,
) -> Result<Moments> {
    let counts: Vec<_> = parts.iter().map(|m| m.apply(|m| m.count.clone())).collect();
    let means: Vec<_> = parts.iter().map(|m| m.apply(|m| m.mean.clone())).collect();

    let mean = aggregator.average(&means, Some(&counts))?.reveal();
    let count = aggregator.sum(&counts)?.reveal();

    let spreads: Vec<_> = parts
        .iter()
        .map(|m| {
            m.apply(|m| {
                m.var
                    .iter()
                    .zip(&m.mean)
                    .zip(&mean)
                    .map(|((var, local), global)| var + (local - global).powi(2))
                    .collect::<Vec<f64>>()
            })
        })
        .collect();
    let var = aggregator.average(&spreads, Some(&counts))?.reveal();

    tracing::debug!(
        owners = parts.len(),
        columns = mean.len(),
        "merged moments across owners"
    );
    Ok(Moments { count, mean, var })
}
