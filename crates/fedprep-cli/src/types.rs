use std::path::PathBuf;

use fedprep_frame::ColumnValues;

/// Outcome of `fedprep fit`.
#[derive(Debug)]
pub struct FitResult {
    pub scaler: &'static str,
    pub kind: &'static str,
    pub shape: (usize, usize),
    pub params: Vec<ParamRow>,
    pub outputs: Vec<PathBuf>,
}

/// One column of revealed scaling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRow {
    /// `global`, or the owner that holds these parameters.
    pub scope: String,
    pub column: String,
    pub shift: f64,
    pub scale: f64,
    pub offset: f64,
}

/// Outcome of `fedprep describe`.
#[derive(Debug)]
pub struct Description {
    pub kind: &'static str,
    pub shape: (usize, usize),
    pub count: ColumnValues,
    pub mean: ColumnValues,
    pub std: ColumnValues,
    pub min: ColumnValues,
    pub max: ColumnValues,
}
