//! Standardization: `(x - mean) / std` per column.

use std::sync::Arc;

use fedprep_device::OwnerValue;
use fedprep_frame::{FedDataFrame, HDataFrame, MixDataFrame, Moments, Partition, ScalingParams};
use fedprep_security::Aggregator;
use serde::{Deserialize, Serialize};

use crate::fitted::{Fitted, Fitter, check_input, fit_params, handle_zero_scale, select_input};
use crate::{FederatedRef, FittedParams, Result, ScalerInput};

/// Options for [`StandardScaler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardScalerOptions {
    /// Center each column on its mean.
    pub with_mean: bool,
    /// Divide each column by its population standard deviation.
    pub with_std: bool,
}

impl Default for StandardScalerOptions {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

impl StandardScalerOptions {
    #[must_use]
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    #[must_use]
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }

    /// Turn merged moments into scaling parameters.
    ///
    /// Variance is always taken about the true mean, even without centering.
    /// A column with no values keeps a NaN shift; its values stay missing.
    fn params(&self, columns: &[String], moments: &Moments) -> ScalingParams {
        let shift = if self.with_mean {
            moments.mean.clone()
        } else {
            vec![0.0; columns.len()]
        };
        let scale = if self.with_std {
            columns
                .iter()
                .zip(moments.std())
                .map(|(column, std)| handle_zero_scale(column, std))
                .collect()
        } else {
            vec![1.0; columns.len()]
        };
        for (column, count) in columns.iter().zip(&moments.count) {
            if *count == 0.0 {
                tracing::warn!(column = %column, "column has no values");
            }
        }
        ScalingParams::new(columns.to_vec(), shift, scale)
    }
}

impl Fitter for StandardScalerOptions {
    fn rows(
        &self,
        frame: &HDataFrame,
        aggregator: Option<&dyn Aggregator>,
    ) -> Result<ScalingParams> {
        Ok(self.params(frame.columns(), &frame.moments_with(aggregator)?))
    }

    fn row_groups(
        &self,
        frame: &MixDataFrame,
        aggregator: Option<&dyn Aggregator>,
    ) -> Result<ScalingParams> {
        Ok(self.params(frame.columns(), &frame.moments_with(aggregator)?))
    }

    fn local(&self, partition: &Partition) -> Result<OwnerValue<ScalingParams>> {
        let columns = partition.columns();
        let moments = partition.moments(columns)?;
        Ok(moments.apply(|moments| self.params(columns, moments)))
    }
}

/// Standardizes columns of a partitioned frame.
///
/// The scaler starts unfitted. `fit` records parameters scoped to how the
/// frame is split; `transform` applies them owner by owner.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    options: StandardScalerOptions,
    state: Option<Fitted>,
}

impl StandardScaler {
    const NAME: &'static str = "StandardScaler";

    pub fn new(options: StandardScalerOptions) -> Self {
        Self {
            options,
            state: None,
        }
    }

    pub fn options(&self) -> &StandardScalerOptions {
        &self.options
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Number of columns seen at fit time.
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
    /// a failed merge.
    pub fn fit<I: ScalerInput + ?Sized>(
        &mut self,
        input: &I,
        columns: Option<&[&str]>,
    ) -> Result<()> {
        self.fit_with_aggregator(input, columns, None)
    }

    /// Fit, merging row-partitioned statistics with `aggregator` instead of
    /// each frame's own.
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
            with_mean = self.options.with_mean,
            with_std = self.options.with_std,
            "fitting StandardScaler"
        );
        let params = fit_params(&self.options, frame, aggregator.as_deref())?;
        self.state = Some(Fitted {
            params,
            n_features_in: frame.columns().len(),
        });
        Ok(())
    }

    /// Standardize `input` with the fitted parameters.
    ///
    /// # Errors
    ///
    /// Fails when not fitted, for an unrecognized input, for a column count
    /// different from the fitted one, or when the frame layout does not
    /// match the fitted state.
    pub fn transform<I: ScalerInput + ?Sized>(&self, input: &I) -> Result<FedDataFrame> {
        let (fitted, frame) = check_input(self.state.as_ref(), input, Self::NAME)?;
        tracing::debug!(kind = frame.kind_name(), "transforming with StandardScaler");
        fitted.params.apply(frame)
    }

    /// Map standardized values back to the original scale.
    ///
    /// # Errors
    ///
    /// Same as [`transform`](Self::transform).
    pub fn inverse_transform<I: ScalerInput + ?Sized>(&self, input: &I) -> Result<FedDataFrame> {
        let (fitted, frame) = check_input(self.state.as_ref(), input, Self::NAME)?;
        fitted.params.invert(frame)
    }

    /// Fit on `columns` of `input`, then transform those columns.
    ///
    /// # Errors
    ///
    /// Same as [`fit_with_aggregator`](Self::fit_with_aggregator).
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_from_json() {
        let options: StandardScalerOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, StandardScalerOptions::default());
        let options: StandardScalerOptions =
            serde_json::from_str(r#"{"with_mean": false}"#).unwrap();
        assert!(!options.with_mean);
        assert!(options.with_std);
    }

    #[test]
    fn test_params_without_mean_keep_true_variance() {
        let moments = Moments {
            count: vec![4.0],
            mean: vec![2.5],
            var: vec![1.25],
        };
        let params = StandardScalerOptions::default()
            .with_mean(false)
            .params(&["x".to_string()], &moments);
        assert_eq!(params.shift, vec![0.0]);
        assert_eq!(params.scale, vec![1.25f64.sqrt()]);
    }

    #[test]
    fn test_params_constant_column() {
        let moments = Moments {
            count: vec![3.0],
            mean: vec![7.0],
            var: vec![0.0],
        };
        let params = StandardScalerOptions::default().params(&["x".to_string()], &moments);
        assert_eq!(params.shift, vec![7.0]);
        assert_eq!(params.scale, vec![1.0]);
    }

    #[test]
    fn test_fresh_scaler_is_unfitted() {
        let scaler = StandardScaler::default();
        assert!(!scaler.is_fitted());
        assert_eq!(scaler.n_features_in(), None);
        assert!(scaler.params().is_none());
    }
}
