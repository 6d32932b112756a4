//! Closed sum over the partitioned frame kinds.

use fedprep_security::{Aggregator, Comparator};

use crate::{ColumnValues, HDataFrame, MixDataFrame, Moments, Result, ScalingParams, VDataFrame};

/// Any partitioned frame.
#[derive(Debug, Clone)]
pub enum FedDataFrame {
    Horizontal(HDataFrame),
    Vertical(VDataFrame),
    Mixed(MixDataFrame),
}

impl FedDataFrame {
    /// Type name of the wrapped frame.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Horizontal(_) => "HDataFrame",
            Self::Vertical(_) => "VDataFrame",
            Self::Mixed(_) => "MixDataFrame",
        }
    }

    pub fn columns(&self) -> &[String] {
        match self {
            Self::Horizontal(frame) => frame.columns(),
            Self::Vertical(frame) => frame.columns(),
            Self::Mixed(frame) => frame.columns(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Horizontal(frame) => frame.shape(),
            Self::Vertical(frame) => frame.shape(),
            Self::Mixed(frame) => frame.shape(),
        }
    }

    /// Keep only `columns`, preserving the frame kind.
    ///
    /// # Errors
    ///
    /// Fails with `ColumnNotFound` for an unknown column.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self> {
        Ok(match self {
            Self::Horizontal(frame) => Self::Horizontal(frame.select(columns)?),
            Self::Vertical(frame) => Self::Vertical(frame.select(columns)?),
            Self::Mixed(frame) => Self::Mixed(frame.select(columns)?),
        })
    }

    /// Count, mean and variance per column, merged with `aggregator` where
    /// a cross-owner merge takes place.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn moments_with(&self, aggregator: Option<&dyn Aggregator>) -> Result<Moments> {
        match self {
            Self::Horizontal(frame) => frame.moments_with(aggregator),
            Self::Vertical(frame) => frame.moments(),
            Self::Mixed(frame) => frame.moments_with(aggregator),
        }
    }

    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn moments(&self) -> Result<Moments> {
        self.moments_with(None)
    }

    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn count(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.count))
    }

    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn mean(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.mean))
    }

    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn var(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.var))
    }

    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn std(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.std()))
    }

    /// Minimum per column, compared with `comparator` where a cross-owner
    /// comparison takes place.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a comparison fails.
    pub fn min_with(&self, comparator: Option<&dyn Comparator>) -> Result<ColumnValues> {
        match self {
            Self::Horizontal(frame) => frame.min_with(comparator),
            Self::Vertical(frame) => frame.min(),
            Self::Mixed(frame) => frame.min_with(comparator),
        }
    }

    /// Maximum per column, compared with `comparator` where a cross-owner
    /// comparison takes place.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a comparison fails.
    pub fn max_with(&self, comparator: Option<&dyn Comparator>) -> Result<ColumnValues> {
        match self {
            Self::Horizontal(frame) => frame.max_with(comparator),
            Self::Vertical(frame) => frame.max(),
            Self::Mixed(frame) => frame.max_with(comparator),
        }
    }

    /// # Errors
    ///
    /// Fails if a column is not numeric or a comparison fails.
    pub fn min(&self) -> Result<ColumnValues> {
        self.min_with(None)
    }

    /// # Errors
    ///
    /// Fails if a column is not numeric or a comparison fails.
    pub fn max(&self) -> Result<ColumnValues> {
        self.max_with(None)
    }

    /// Scale every owner's fragment with the same plaintext parameters.
    ///
    /// # Errors
    ///
    /// Fails if a column has no parameters or is not numeric.
    pub fn scale(&self, params: &ScalingParams) -> Result<Self> {
        Ok(match self {
            Self::Horizontal(frame) => Self::Horizontal(frame.scale(params)?),
            Self::Vertical(frame) => Self::Vertical(frame.scale(params)?),
            Self::Mixed(frame) => Self::Mixed(frame.scale(params)?),
        })
    }

    /// Inverse of [`scale`](Self::scale).
    ///
    /// # Errors
    ///
    /// Fails if a column has no parameters or is not numeric.
    pub fn unscale(&self, params: &ScalingParams) -> Result<Self> {
        Ok(match self {
            Self::Horizontal(frame) => Self::Horizontal(frame.unscale(params)?),
            Self::Vertical(frame) => Self::Vertical(frame.unscale(params)?),
            Self::Mixed(frame) => Self::Mixed(frame.unscale(params)?),
        })
    }

    pub fn as_horizontal(&self) -> Option<&HDataFrame> {
        match self {
            Self::Horizontal(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_vertical(&self) -> Option<&VDataFrame> {
        match self {
            Self::Vertical(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_mixed(&self) -> Option<&MixDataFrame> {
        match self {
            Self::Mixed(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn into_horizontal(self) -> Option<HDataFrame> {
        match self {
            Self::Horizontal(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn into_vertical(self) -> Option<VDataFrame> {
        match self {
            Self::Vertical(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn into_mixed(self) -> Option<MixDataFrame> {
        match self {
            Self::Mixed(frame) => Some(frame),
            _ => None,
        }
    }

    fn values(&self, values: Vec<f64>) -> ColumnValues {
        ColumnValues::new(self.columns().to_vec(), values)
    }
}

impl From<HDataFrame> for FedDataFrame {
    fn from(frame: HDataFrame) -> Self {
        Self::Horizontal(frame)
    }
}

impl From<VDataFrame> for FedDataFrame {
    fn from(frame: VDataFrame) -> Self {
        Self::Vertical(frame)
    }
}

impl From<MixDataFrame> for FedDataFrame {
    fn from(frame: MixDataFrame) -> Self {
        Self::Mixed(frame)
    }
}
