//! What a scaler accepts.

use fedprep_frame::{FedDataFrame, HDataFrame, MixDataFrame, Partition, VDataFrame};
use polars::prelude::DataFrame;

use crate::Result;

/// Borrowed view of a partitioned frame.
#[derive(Debug, Clone, Copy)]
pub enum FederatedRef<'a> {
    Horizontal(&'a HDataFrame),
    Vertical(&'a VDataFrame),
    Mixed(&'a MixDataFrame),
}

impl FederatedRef<'_> {
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

    /// Owned copy of the frame.
    pub fn to_frame(&self) -> FedDataFrame {
        match *self {
            Self::Horizontal(frame) => FedDataFrame::Horizontal(frame.clone()),
            Self::Vertical(frame) => FedDataFrame::Vertical(frame.clone()),
            Self::Mixed(frame) => FedDataFrame::Mixed(frame.clone()),
        }
    }

    /// Owned copy restricted to `columns`.
    ///
    /// # Errors
    ///
    /// Fails for an unknown column.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<FedDataFrame> {
        Ok(match *self {
            Self::Horizontal(frame) => FedDataFrame::Horizontal(frame.select(columns)?),
            Self::Vertical(frame) => FedDataFrame::Vertical(frame.select(columns)?),
            Self::Mixed(frame) => FedDataFrame::Mixed(frame.select(columns)?),
        })
    }
}

impl<'a> From<&'a FedDataFrame> for FederatedRef<'a> {
    fn from(frame: &'a FedDataFrame) -> Self {
        match frame {
            FedDataFrame::Horizontal(frame) => Self::Horizontal(frame),
            FedDataFrame::Vertical(frame) => Self::Vertical(frame),
            FedDataFrame::Mixed(frame) => Self::Mixed(frame),
        }
    }
}

/// Anything that can be handed to a scaler.
///
/// Only the three partitioned frame kinds are recognized. Plaintext tables
/// and single partitions implement the trait so they can be passed in, and
/// are rejected with [`PreprocessError::UnsupportedInput`].
///
/// [`PreprocessError::UnsupportedInput`]: crate::PreprocessError::UnsupportedInput
pub trait ScalerInput {
    fn federated(&self) -> Option<FederatedRef<'_>>;
}

impl ScalerInput for FedDataFrame {
    fn federated(&self) -> Option<FederatedRef<'_>> {
        Some(self.into())
    }
}

impl ScalerInput for HDataFrame {
    fn federated(&self) -> Option<FederatedRef<'_>> {
        Some(FederatedRef::Horizontal(self))
    }
}

impl ScalerInput for VDataFrame {
    fn federated(&self) -> Option<FederatedRef<'_>> {
        Some(FederatedRef::Vertical(self))
    }
}

impl ScalerInput for MixDataFrame {
    fn federated(&self) -> Option<FederatedRef<'_>> {
        Some(FederatedRef::Mixed(self))
    }
}

impl ScalerInput for DataFrame {
    fn federated(&self) -> Option<FederatedRef<'_>> {
        None
    }
}

impl ScalerInput for Partition {
    fn federated(&self) -> Option<FederatedRef<'_>> {
        None
    }
}
