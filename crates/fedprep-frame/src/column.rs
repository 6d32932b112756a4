//! Per-column results and column access helpers.

use fedprep_common::{is_numeric_dtype, numeric_column_f64};
use polars::prelude::DataFrame;

use crate::{FrameError, Result};

/// One plaintext value per column, in frame column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValues {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl ColumnValues {
    pub(crate) fn new(columns: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(columns.len(), values.len(), "one value per column");
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value for a named column.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Reads a numeric column with skip-NA semantics.
pub(crate) fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name).map_err(|_| FrameError::ColumnNotFound {
        column: name.to_string(),
    })?;
    if !is_numeric_dtype(column.dtype()) {
        return Err(FrameError::NonNumericColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    Ok(numeric_column_f64(df, name)?)
}

/// Owned copies of caller-supplied column names.
pub(crate) fn owned_names<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    columns.iter().map(|c| c.as_ref().to_string()).collect()
}

/// Fails with `ColumnNotFound` for the first requested column missing from `available`.
pub(crate) fn ensure_columns(available: &[String], requested: &[String]) -> Result<()> {
    match requested.iter().find(|name| !available.contains(name)) {
        Some(missing) => Err(FrameError::ColumnNotFound {
            column: missing.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    #[test]
    fn test_get_by_name() {
        let values = ColumnValues::new(vec!["a".into(), "b".into()], vec![1.0, 2.0]);
        assert_eq!(values.get("b"), Some(2.0));
        assert_eq!(values.get("c"), None);
        assert_eq!(
            values.iter().collect::<Vec<_>>(),
            vec![("a", 1.0), ("b", 2.0)]
        );
    }

    #[test]
    fn test_numeric_values_rejects_strings() {
        let df = DataFrame::new(vec![Series::new("s".into(), &["x", "y"]).into()]).unwrap();
        let err = numeric_values(&df, "s").unwrap_err();
        assert!(matches!(err, FrameError::NonNumericColumn { .. }));
    }

    #[test]
    fn test_numeric_values_missing_column() {
        let df = DataFrame::new(vec![Series::new("a".into(), &[1.0]).into()]).unwrap();
        let err = numeric_values(&df, "b").unwrap_err();
        assert!(matches!(err, FrameError::ColumnNotFound { column } if column == "b"));
    }

    #[test]
    fn test_ensure_columns() {
        let available = vec!["a".to_string(), "b".to_string()];
        assert!(ensure_columns(&available, &["b".to_string()]).is_ok());
        assert!(ensure_columns(&available, &["z".to_string()]).is_err());
    }
}
