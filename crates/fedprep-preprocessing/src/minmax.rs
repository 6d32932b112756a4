//! Min-max scaling into a target range.

use std::sync::Arc;

use fedprep_device::OwnerValue;
use fedprep_frame::{
    ColumnValues, FedDataFrame, FrameError, HDataFrame, MixDataFrame, Partition, ScalingParams,
};
use fedprep_security::Aggregator;
use serde::{Deserialize, Serialize};

use crate::fitted::{Fitted, Fitter, check_input, fit_params, handle_zero_scale, select_input};
use crate::{FederatedRef, FittedParams, PreprocessError, Result, ScalerInput};

/// Options for [`MinMaxScaler`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinMaxScalerOptions {
    /// Output range `(min, max)`.
    pub feature_range: (f64, f64),
}

impl Default for MinMaxScalerOptions {
    fn default() -> Self {
        Self {
            feature_range: (0.0, 1.0),
        }
    }
}

impl MinMaxScalerOptions {
    #[must_use]
    pub fn with_feature_range(mut self, min: f64, max: f64) -> Self {
        self.feature_range = (min, max);
        self
    }

    /// # Errors
    ///
    /// Fails unless `feature_range.0 < feature_range.1`.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.feature_range;
        if min < max {
            Ok(())
        } else {
            Err(PreprocessError::InvalidFeatureRange { min, max })
        }
    }

    fn params(&self, columns: &[String], min: &[f64], max: &[f64]) -> ScalingParams {
        let (lo, hi) = self.feature_range;
        let scale = columns
            .iter()
            .zip(min.iter().zip(max))
            .map(|(column, (min, max))| handle_zero_scale(column, max - min) / (hi - lo))
            .collect();
        ScalingParams::new(columns.to_vec(), min.to_vec(), scale)
            .with_offset(vec![lo; columns.len()])
    }

    fn params_from(
        &self,
        columns: &[String],
        min: &ColumnValues,
        max: &ColumnValues,
    ) -> ScalingParams {
        self.params(columns, min.values(), max.values())
    }
}

impl Fitter for MinMaxScalerOptions {
    fn rows(
        &self,
        frame: &HDataFrame,
        _aggregator: Option<&dyn Aggregator>,
    ) -> Result<ScalingParams> {
        Ok(self.params_from(frame.columns(), &frame.min()?, &frame.max()?))
    }

    fn row_groups(
        &self,
        frame: &MixDataFrame,
        _aggregator: Option<&dyn Aggregator>,
    ) -> Result<ScalingParams> {
        Ok(self.params_from(frame.columns(), &frame.min()?, &frame.max()?))
    }

    fn local(&self, partition: &Partition) -> Result<OwnerValue<ScalingParams>> {
        let columns = partition.columns();
        let min = partition.min(columns)?;
        let max = partition.max(columns)?;
        let params = min
            .zip_apply(&max, |min, max| self.params(columns, min, max))
            .map_err(FrameError::from)?;
        Ok(params)
    }
}

/// Rescales each column of a partitioned frame into `feature_range`.
///
/// Column extremes are found with the frame's comparator for row splits and
/// on the owning party for column splits.
#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler {
    options: MinMaxScalerOptions,
    state: Option<Fitted>,
}

impl MinMaxScaler {
    const NAME: &'static str = "MinMaxScaler";

    /// # Errors
    ///
    /// Fails with `InvalidFeatureRange` for an empty or reversed range.
    pub fn new(options: MinMaxScalerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            state: None,
        })
    }

    pub fn options(&self) -> &MinMaxScalerOptions {
        &self.options
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    pub fn n_features_in(&self) -> Option<usize> {
        self.state.as_ref().map(|state| state.n_features_in)
    }

    pub fn params(&self) -> Option<&FittedParams> {
        self.state.as_ref().map(|state| &state.params)
    }

    /// Fit on `columns` of `input` (all columns when `None`).
    ///
    /// # Errors
    ///
    /// Fails for an unrecognized input, an unknown or non-numeric column, or
    /// a failed comparison.
    pub fn fit<I: ScalerInput + ?Sized>(
        &mut self,
        input: &I,
        columns: Option<&[&str]>,
    ) -> Result<()> {
        self.fit_with_aggregator(input, columns, None)
    }

    /// Same as [`fit`](Self::fit). Extremes never go through an aggregator;
    /// the argument keeps the scaler surfaces interchangeable.
    ///
    /// # Errors
    ///
    /// Same as [`fit`](Self::fit).
    pub fn fit_with_aggregator<I: ScalerInput + ?Sized>(
        &mut self,
        input: &I,
        columns: Option<&[&str]>,
        aggregator: Option<Arc<dyn Aggregator>>,
    ) -> Result<()> {
        let frame = select_input(input, columns)?;
        let frame = FederatedRef::from(&frame);
        tracing::debug!(
            kind = frame.kind_name(),
            columns = frame.columns().len(),
            feature_range = ?self.options.feature_range,
            "fitting MinMaxScaler"
        );
        let params = fit_params(&self.options, frame, aggregator.as_deref())?;
        self.state = Some(Fitted {
            params,
            n_features_in: frame.columns().len(),
        });
        Ok(())
    }

    /// Rescale `input` with the fitted parameters.
    ///
    /// # Errors
    ///
    /// Fails when not fitted, for an unrecognized input, for a column count
    /// different from the fitted one, or when the frame layout does not
    /// match the fitted state.
    pub fn transform<I: ScalerInput + ?Sized>(&self, input: &I) -> Result<FedDataFrame> {
        let (fitted, frame) = check_input(self.state.as_ref(), input, Self::NAME)?;
        tracing::debug!(kind = frame.kind_name(), "transforming with MinMaxScaler");
        fitted.params.apply(frame)
    }

    /// # Errors
    ///
    /// Same as [`transform`](Self::transform).
    pub fn inverse_transform<I: ScalerInput + ?Sized>(&self, input: &I) -> Result<FedDataFrame> {
        let (fitted, frame) = check_input(self.state.as_ref(), input, Self::NAME)?;
        fitted.params.invert(frame)
    }

    /// # Errors
    ///
    /// Same as [`fit`](Self::fit) and [`transform`](Self::transform).
    pub fn fit_transform<I: ScalerInput + ?Sized>(
        &mut self,
        input: &I,
        columns: Option<&[&str]>,
        aggregator: Option<Arc<dyn Aggregator>>,
    ) -> Result<FedDataFrame> {
        let frame = select_input(input, columns)?;
        self.fit_with_aggregator(&frame, None, aggregator)?;
        self.transform(&frame)
    }
}
