//! One owner's fragment of a logical table.

use fedprep_common::column_names;
use fedprep_device::{Owner, OwnerValue};
use polars::prelude::DataFrame;

use fedprep_security::Comparator;

use crate::column::{ensure_columns, numeric_values};
use crate::{Moments, Result, ScalingParams};

/// Which order statistic to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extreme {
    Min,
    Max,
}

impl Extreme {
    /// The owner-local statistic of a partition.
    pub(crate) fn local(
        self,
        partition: &Partition,
        columns: &[String],
    ) -> Result<OwnerValue<Vec<f64>>> {
        match self {
            Self::Min => partition.min(columns),
            Self::Max => partition.max(columns),
        }
    }

    /// The cross-owner statistic of local values.
    pub(crate) fn compare(
        self,
        comparator: &dyn Comparator,
        data: &[OwnerValue<Vec<f64>>],
    ) -> Result<OwnerValue<Vec<f64>>> {
        Ok(match self {
            Self::Min => comparator.min(data)?,
            Self::Max => comparator.max(data)?,
        })
    }
}

/// A fragment held by a single owner.
///
/// The column schema is kept as plaintext metadata; the values themselves
/// only ever change through computations dispatched to the owner.
#[derive(Debug, Clone)]
pub struct Partition {
    data: OwnerValue<DataFrame>,
    columns: Vec<String>,
}

impl Partition {
    /// Wrap a fragment already held by its owner.
    pub fn new(data: OwnerValue<DataFrame>) -> Self {
        let columns = data.apply(column_names).into_revealed();
        Self { data, columns }
    }

    /// Place `df` on `owner` and wrap it.
    pub fn from_frame(owner: &Owner, df: DataFrame) -> Self {
        Self::new(owner.run(move || df))
    }

    pub fn owner(&self) -> &Owner {
        self.data.owner()
    }

    /// Handle to the underlying fragment.
    pub fn data(&self) -> &OwnerValue<DataFrame> {
        &self.data
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    /// Number of rows, kept on the owner.
    pub fn height(&self) -> OwnerValue<usize> {
        self.data.apply(DataFrame::height)
    }

    /// Keep only `columns`, in that order.
    ///
    /// # Errors
    ///
    /// Fails with `ColumnNotFound` for an unknown column.
    pub fn select(&self, columns: &[String]) -> Result<Self> {
        ensure_columns(&self.columns, columns)?;
        let data = self
            .data
            .try_apply(|df| df.select(columns.iter().map(String::as_str)))?;
        Ok(Self {
            data,
            columns: columns.to_vec(),
        })
    }

    /// Count, mean and variance of `columns`, computed by the owner.
    ///
    /// # Errors
    ///
    /// Fails if a column is unknown or not numeric.
    pub fn moments(&self, columns: &[String]) -> Result<OwnerValue<Moments>> {
        ensure_columns(&self.columns, columns)?;
        self.data.try_apply(|df| Moments::from_frame(df, columns))
    }

    /// Non-missing values per column, computed by the owner.
    ///
    /// # Errors
    ///
    /// Fails if a column is unknown or not numeric.
    pub fn count(&self, columns: &[String]) -> Result<OwnerValue<Vec<f64>>> {
        ensure_columns(&self.columns, columns)?;
        self.data.try_apply(|df| {
            columns
                .iter()
                .map(|name| -> Result<f64> {
                    Ok(numeric_values(df, name)?.into_iter().flatten().count() as f64)
                })
                .collect()
        })
    }

    /// Smallest non-missing value per column (NaN when a column has none).
    ///
    /// # Errors
    ///
    /// Fails if a column is unknown or not numeric.
    pub fn min(&self, columns: &[String]) -> Result<OwnerValue<Vec<f64>>> {
        self.extreme(columns, f64::min)
    }

    /// Largest non-missing value per column (NaN when a column has none).
    ///
    /// # Errors
    ///
    /// Fails if a column is unknown or not numeric.
    pub fn max(&self, columns: &[String]) -> Result<OwnerValue<Vec<f64>>> {
        self.extreme(columns, f64::max)
    }

    fn extreme(
        &self,
        columns: &[String],
        pick: fn(f64, f64) -> f64,
    ) -> Result<OwnerValue<Vec<f64>>> {
        ensure_columns(&self.columns, columns)?;
        self.data.try_apply(|df| {
            columns
                .iter()
                .map(|name| -> Result<f64> {
                    let values = numeric_values(df, name)?;
                    Ok(values.into_iter().flatten().fold(f64::NAN, pick))
                })
                .collect()
        })
    }

    /// Scale this fragment with plaintext parameters sent to the owner.
    ///
    /// # Errors
    ///
    /// Fails if a column has no parameters or is not numeric.
    pub fn scale(&self, params: &ScalingParams) -> Result<Self> {
        let params = params.subset(&self.columns)?;
        Ok(self.replace(self.data.try_apply(|df| params.apply(df))?))
    }

    /// Scale this fragment with parameters the owner already holds.
    ///
    /// # Errors
    ///
    /// Fails if `params` is held by a different owner or does not cover
    /// every column.
    pub fn scale_with(&self, params: &OwnerValue<ScalingParams>) -> Result<Self> {
        Ok(self.replace(self.data.try_zip_apply(params, |df, p| p.apply(df))?))
    }

    /// Inverse of [`scale`](Self::scale).
    ///
    /// # Errors
    ///
    /// Fails if a column has no parameters or is not numeric.
    pub fn unscale(&self, params: &ScalingParams) -> Result<Self> {
        let params = params.subset(&self.columns)?;
        Ok(self.replace(self.data.try_apply(|df| params.invert(df))?))
    }

    /// Inverse of [`scale_with`](Self::scale_with).
    ///
    /// # Errors
    ///
    /// Fails if `params` is held by a different owner or does not cover
    /// every column.
    pub fn unscale_with(&self, params: &OwnerValue<ScalingParams>) -> Result<Self> {
        Ok(self.replace(self.data.try_zip_apply(params, |df, p| p.invert(df))?))
    }

    fn replace(&self, data: OwnerValue<DataFrame>) -> Self {
        Self {
            data,
            columns: self.columns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrameError;
    use fedprep_common::numeric_column_f64;
    use fedprep_device::reveal;
    use polars::prelude::{NamedFrom, Series};

    fn alice_part() -> Partition {
        let df = DataFrame::new(vec![
            Series::new("a1".into(), &[Some("K5"), Some("K1"), None, Some("K6")]).into(),
            Series::new("a3".into(), &[5i64, 1, 2, 6]).into(),
        ])
        .unwrap();
        Partition::from_frame(&Owner::new("alice"), df)
    }

    #[test]
    fn test_schema_is_plaintext_metadata() {
        let part = alice_part();
        assert_eq!(part.owner(), &Owner::new("alice"));
        assert_eq!(part.columns(), ["a1", "a3"]);
        assert_eq!(reveal(&part.height()), 4);
    }

    #[test]
    fn test_select_keeps_owner() {
        let part = alice_part().select(&["a3".to_string()]).unwrap();
        assert_eq!(part.owner(), &Owner::new("alice"));
        assert_eq!(reveal(part.data()).width(), 1);
    }

    #[test]
    fn test_select_unknown_column() {
        let err = alice_part().select(&["b4".to_string()]).unwrap_err();
        assert!(matches!(err, FrameError::ColumnNotFound { column } if column == "b4"));
    }

    #[test]
    fn test_moments_on_owner() {
        let moments = alice_part().moments(&["a3".to_string()]).unwrap();
        assert_eq!(moments.owner(), &Owner::new("alice"));
        let moments = moments.reveal();
        assert_eq!(moments.count, vec![4.0]);
        assert_eq!(moments.mean, vec![3.5]);
    }

    #[test]
    fn test_moments_reject_text_column() {
        let err = alice_part().moments(&["a1".to_string()]).unwrap_err();
        assert!(matches!(err, FrameError::NonNumericColumn { .. }));
    }

    #[test]
    fn test_count_skips_missing() {
        let df = DataFrame::new(vec![
            Series::new("b4".into(), &[Some(10.2), None, Some(f64::NAN)]).into(),
        ])
        .unwrap();
        let part = Partition::from_frame(&Owner::new("bob"), df);
        assert_eq!(part.count(&["b4".to_string()]).unwrap().reveal(), vec![1.0]);
    }

    #[test]
    fn test_min_max() {
        let part = alice_part();
        let columns = ["a3".to_string()];
        assert_eq!(part.min(&columns).unwrap().reveal(), vec![1.0]);
        assert_eq!(part.max(&columns).unwrap().reveal(), vec![6.0]);
    }

    #[test]
    fn test_scale_with_params_from_other_owner_fails() {
        let part = alice_part().select(&["a3".to_string()]).unwrap();
        let params = ScalingParams::new(vec!["a3".into()], vec![0.0], vec![1.0]);
        let held_by_bob = Owner::new("bob").run(move || params);
        let err = part.scale_with(&held_by_bob).unwrap_err();
        assert!(matches!(err, FrameError::Device(_)));
    }

    #[test]
    fn test_scale_then_unscale() {
        let part = alice_part().select(&["a3".to_string()]).unwrap();
        let params = ScalingParams::new(vec!["a3".into()], vec![3.5], vec![2.0]);
        let scaled = part.scale(&params).unwrap();
        assert_eq!(
            numeric_column_f64(&reveal(scaled.data()), "a3").unwrap(),
            vec![Some(0.75), Some(-1.25), Some(-0.75), Some(1.25)]
        );
        let restored = scaled.unscale(&params).unwrap();
        assert_eq!(
            numeric_column_f64(&reveal(restored.data()), "a3").unwrap(),
            vec![Some(5.0), Some(1.0), Some(2.0), Some(6.0)]
        );
    }
}
