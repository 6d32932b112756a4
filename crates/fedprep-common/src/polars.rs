//! Polars column utility functions.
//!
//! This module provides helper functions for reading numeric columns out of a
//! Polars `DataFrame` with skip-NA semantics and for building `Float64`
//! columns back from optional values.

use polars::prelude::*;

/// Converts an `AnyValue` to `f64`, returning `None` for missing values.
///
/// Nulls and NaN are both treated as missing, so statistics computed from
/// the result follow conventional skip-NA semantics. Integer types, floats
/// and numeric strings are converted.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    let value = match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    };
    value.filter(|v| !v.is_nan())
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Returns true for the integer and floating point data types.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Reads a column as optional `f64` values, one entry per row.
///
/// Numeric columns are cast to `Float64` in one pass; other columns fall back
/// to [`any_to_f64`] row by row.
///
/// # Errors
///
/// Returns an error if the column does not exist.
pub fn numeric_column_f64(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?;
    if !is_numeric_dtype(column.dtype()) {
        return Ok((0..column.len())
            .map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect());
    }
    let floats = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect())
}

/// Builds a `Float64` column from optional values.
pub fn f64_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into()
}

/// Returns the column names of a frame in schema order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("a".into(), &[Some(1.0), None, Some(f64::NAN), Some(4.0)]).into(),
            Series::new("b".into(), &[1i64, 2, 3, 4]).into(),
            Series::new("c".into(), &["x", "y", "z", "w"]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Null), None);
        assert_eq!(any_to_f64(AnyValue::Int32(42)), Some(42.0));
        assert_eq!(any_to_f64(AnyValue::Float64(3.25)), Some(3.25));
        assert_eq!(any_to_f64(AnyValue::String("2.5")), Some(2.5));
        assert_eq!(any_to_f64(AnyValue::String("invalid")), None);
    }

    #[test]
    fn test_any_to_f64_nan_is_missing() {
        assert_eq!(any_to_f64(AnyValue::Float64(f64::NAN)), None);
        assert_eq!(any_to_f64(AnyValue::Float32(f32::NAN)), None);
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("  3.5  "), Some(3.5));
        assert_eq!(parse_f64("invalid"), None);
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(is_numeric_dtype(&DataType::UInt8));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_numeric_column_skips_missing() {
        let df = sample();
        assert_eq!(
            numeric_column_f64(&df, "a").unwrap(),
            vec![Some(1.0), None, None, Some(4.0)]
        );
        assert_eq!(
            numeric_column_f64(&df, "b").unwrap(),
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]
        );
    }

    #[test]
    fn test_numeric_column_parses_text() {
        let df = DataFrame::new(vec![
            Series::new("t".into(), &[Some(" 1.5"), Some("n/a"), None]).into(),
            Series::new("f".into(), &[Some(2.5f32), Some(f32::NAN), None]).into(),
        ])
        .unwrap();
        assert_eq!(
            numeric_column_f64(&df, "t").unwrap(),
            vec![Some(1.5), None, None]
        );
        assert_eq!(
            numeric_column_f64(&df, "f").unwrap(),
            vec![Some(2.5), None, None]
        );
    }

    #[test]
    fn test_numeric_column_missing_column() {
        assert!(numeric_column_f64(&sample(), "nope").is_err());
    }

    #[test]
    fn test_f64_column_roundtrip() {
        let column = f64_column("z", vec![Some(0.5), None]);
        let df = DataFrame::new(vec![column]).unwrap();
        assert_eq!(column_names(&df), vec!["z"]);
        assert_eq!(numeric_column_f64(&df, "z").unwrap(), vec![Some(0.5), None]);
    }

    #[test]
    fn test_column_names_in_schema_order() {
        assert_eq!(column_names(&sample()), vec!["a", "b", "c"]);
    }
}
