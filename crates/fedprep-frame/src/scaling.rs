//! Per-column affine scaling applied inside an owner.

use fedprep_common::{column_names, f64_column};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::column::numeric_values;
use crate::{FrameError, Result};

/// Parameters of `x' = (x - shift) / scale + offset`, one entry per column.
///
/// Missing values stay missing in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParams {
    pub columns: Vec<String>,
    pub shift: Vec<f64>,
    pub scale: Vec<f64>,
    pub offset: Vec<f64>,
}

impl ScalingParams {
    /// Parameters without an offset term.
    pub fn new(columns: Vec<String>, shift: Vec<f64>, scale: Vec<f64>) -> Self {
        let offset = vec![0.0; columns.len()];
        Self {
            columns,
            shift,
            scale,
            offset,
        }
    }

    /// Set a per-column offset added after scaling.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec<f64>) -> Self {
        self.offset = offset;
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn position(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| FrameError::ColumnNotFound {
                column: column.to_string(),
            })
    }

    /// Restrict the parameters to `columns`, in that order.
    ///
    /// # Errors
    ///
    /// Fails if a column has no parameters.
    pub fn subset(&self, columns: &[String]) -> Result<Self> {
        let mut subset = Self {
            columns: Vec::with_capacity(columns.len()),
            shift: Vec::with_capacity(columns.len()),
            scale: Vec::with_capacity(columns.len()),
            offset: Vec::with_capacity(columns.len()),
        };
        for name in columns {
            let idx = self.position(name)?;
            subset.columns.push(name.clone());
            subset.shift.push(self.shift[idx]);
            subset.scale.push(self.scale[idx]);
            subset.offset.push(self.offset[idx]);
        }
        Ok(subset)
    }

    /// Scale every column of `df`, keeping names and order.
    ///
    /// # Errors
    ///
    /// Fails if a column of `df` has no parameters or is not numeric.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        self.map_columns(df, |x, shift, scale, offset| (x - shift) / scale + offset)
    }

    /// Undo [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// Fails if a column of `df` has no parameters or is not numeric.
    pub fn invert(&self, df: &DataFrame) -> Result<DataFrame> {
        self.map_columns(df, |x, shift, scale, offset| (x - offset) * scale + shift)
    }

    fn map_columns(
        &self,
        df: &DataFrame,
        f: impl Fn(f64, f64, f64, f64) -> f64,
    ) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(df.width());
        for name in column_names(df) {
            let idx = self.position(&name)?;
            let (shift, scale, offset) = (self.shift[idx], self.scale[idx], self.offset[idx]);
            let values: Vec<Option<f64>> = numeric_values(df, &name)?
                .into_iter()
                .map(|value| value.map(|x| f(x, shift, scale, offset)))
                .collect();
            columns.push(f64_column(&name, values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fedprep_common::numeric_column_f64;
    use polars::prelude::{NamedFrom, Series};

    fn params() -> ScalingParams {
        ScalingParams::new(
            vec!["a".into(), "b".into()],
            vec![2.5, 10.0],
            vec![1.118_033_988_749_895, 2.0],
        )
    }

    #[test]
    fn test_apply_standardizes() {
        let df = DataFrame::new(vec![Series::new("a".into(), &[1.0, 4.0]).into()]).unwrap();
        let scaled = params().apply(&df).unwrap();
        let values = numeric_column_f64(&scaled, "a").unwrap();
        assert_relative_eq!(values[0].unwrap(), -1.341_640_786_499_874, epsilon = 1e-12);
        assert_relative_eq!(values[1].unwrap(), 1.341_640_786_499_874, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_values_stay_missing() {
        let df = DataFrame::new(vec![Series::new("b".into(), &[Some(12.0), None]).into()]).unwrap();
        let scaled = params().apply(&df).unwrap();
        assert_eq!(
            numeric_column_f64(&scaled, "b").unwrap(),
            vec![Some(1.0), None]
        );
    }

    #[test]
    fn test_invert_restores_values() {
        let df = DataFrame::new(vec![
            Series::new("b".into(), &[3.0, -7.5]).into(),
            Series::new("a".into(), &[0.25, 9.0]).into(),
        ])
        .unwrap();
        let p = params().with_offset(vec![1.0, -1.0]);
        let restored = p.invert(&p.apply(&df).unwrap()).unwrap();
        for name in ["a", "b"] {
            let before = numeric_column_f64(&df, name).unwrap();
            let after = numeric_column_f64(&restored, name).unwrap();
            for (x, y) in before.iter().zip(&after) {
                assert_relative_eq!(x.unwrap(), y.unwrap(), epsilon = 1e-12);
            }
        }
        assert_eq!(column_names(&restored), vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let df = DataFrame::new(vec![Series::new("z".into(), &[1.0]).into()]).unwrap();
        assert!(matches!(
            params().apply(&df).unwrap_err(),
            FrameError::ColumnNotFound { column } if column == "z"
        ));
    }

    #[test]
    fn test_subset_in_requested_order() {
        let subset = params()
            .subset(&["b".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(subset.columns, vec!["b", "a"]);
        assert_eq!(subset.shift, vec![10.0, 2.5]);
    }
}
