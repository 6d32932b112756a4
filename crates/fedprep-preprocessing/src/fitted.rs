//! Fitted scaler state and how it is routed back onto a frame.

use fedprep_device::{Owner, OwnerValue};
use fedprep_frame::{
    FedDataFrame, HDataFrame, MixDataFrame, MixPartitions, Partition, ScalingParams, VDataFrame,
};
use fedprep_security::Aggregator;
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::{FederatedRef, PreprocessError, Result, ScalerInput};

/// Parameters produced by `fit`, scoped the way the fitted frame was split.
#[derive(Debug, Clone)]
pub enum FittedParams {
    /// One set of parameters valid for every owner (row splits and
    /// row-group composites).
    Global(ScalingParams),
    /// Parameters kept on the owner holding each column.
    PerOwner(IndexMap<Owner, OwnerValue<ScalingParams>>),
    /// One fitted state per column-group element, in element order.
    PerElement(Vec<FittedParams>),
}

impl FittedParams {
    /// Layout this state was fitted on, for error messages.
    pub fn layout(&self) -> String {
        match self {
            Self::Global(_) => "a row-partitioned frame".to_string(),
            Self::PerOwner(params) => {
                let owners: Vec<&str> = params.keys().map(Owner::party).collect();
                format!("a VDataFrame held by {owners:?}")
            }
            Self::PerElement(elements) => {
                format!(
                    "a column-group MixDataFrame with {} elements",
                    elements.len()
                )
            }
        }
    }

    /// Scale `frame` with this state.
    ///
    /// # Errors
    ///
    /// Fails with `StateMismatch` when the frame is not laid out like the
    /// fitted one, or with a frame error for unknown or non-numeric columns.
    pub fn apply(&self, frame: FederatedRef<'_>) -> Result<FedDataFrame> {
        self.route(frame, Direction::Forward)
    }

    /// Undo [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// Same as [`apply`](Self::apply).
    pub fn invert(&self, frame: FederatedRef<'_>) -> Result<FedDataFrame> {
        self.route(frame, Direction::Inverse)
    }

    fn route(&self, frame: FederatedRef<'_>, direction: Direction) -> Result<FedDataFrame> {
        match (self, frame) {
            (Self::Global(params), frame) => Ok(match direction {
                Direction::Forward => frame.to_frame().scale(params)?,
                Direction::Inverse => frame.to_frame().unscale(params)?,
            }),
            (Self::PerOwner(params), FederatedRef::Vertical(v)) if same_owners(params, v) => {
                Ok(FedDataFrame::Vertical(match direction {
                    Direction::Forward => v.scale_each(params)?,
                    Direction::Inverse => v.unscale_each(params)?,
                }))
            }
            (Self::PerElement(elements), FederatedRef::Mixed(mix)) => {
                let MixPartitions::HFrames(frames) = mix.partitions() else {
                    return Err(self.mismatch(frame));
                };
                if frames.len() != elements.len() {
                    return Err(self.mismatch(frame));
                }
                let routed = elements
                    .iter()
                    .zip(frames)
                    .map(|(params, element)| {
                        params
                            .route(FederatedRef::Horizontal(element), direction)?
                            .into_horizontal()
                            .ok_or_else(|| self.mismatch(frame))
                    })
                    .collect::<Result<Vec<HDataFrame>>>()?;
                Ok(FedDataFrame::Mixed(MixDataFrame::from_horizontal(routed)?))
            }
            (_, frame) => Err(self.mismatch(frame)),
        }
    }

    fn mismatch(&self, frame: FederatedRef<'_>) -> PreprocessError {
        PreprocessError::StateMismatch {
            fitted: self.layout(),
            actual: frame.kind_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Inverse,
}

fn same_owners(params: &IndexMap<Owner, OwnerValue<ScalingParams>>, frame: &VDataFrame) -> bool {
    params.len() == frame.partitions().len() && frame.owners().all(|o| params.contains_key(o))
}

/// Column rule of a scaler: how statistics become parameters.
pub(crate) trait Fitter: Sync {
    /// Parameters from cross-owner statistics of a row-partitioned frame.
    fn rows(
        &self,
        frame: &HDataFrame,
        aggregator: Option<&dyn Aggregator>,
    ) -> Result<ScalingParams>;

    /// Parameters from a row-group composite.
    fn row_groups(
        &self,
        frame: &MixDataFrame,
        aggregator: Option<&dyn Aggregator>,
    ) -> Result<ScalingParams>;

    /// Parameters for one owner's columns, computed on that owner.
    fn local(&self, partition: &Partition) -> Result<OwnerValue<ScalingParams>>;
}

/// Dispatch a fit to the statistics procedure of the frame kind.
pub(crate) fn fit_params(
    fitter: &impl Fitter,
    frame: FederatedRef<'_>,
    aggregator: Option<&dyn Aggregator>,
) -> Result<FittedParams> {
    match frame {
        FederatedRef::Horizontal(h) => Ok(FittedParams::Global(fitter.rows(h, aggregator)?)),
        FederatedRef::Vertical(v) => {
            let params: Vec<(Owner, OwnerValue<ScalingParams>)> = v
                .partitions()
                .par_iter()
                .map(|(owner, partition)| Ok((owner.clone(), fitter.local(partition)?)))
                .collect::<Result<_>>()?;
            Ok(FittedParams::PerOwner(params.into_iter().collect()))
        }
        FederatedRef::Mixed(mix) => match mix.partitions() {
            MixPartitions::VFrames(_) => {
                Ok(FittedParams::Global(fitter.row_groups(mix, aggregator)?))
            }
            MixPartitions::HFrames(frames) => frames
                .iter()
                .map(|h| fit_params(fitter, FederatedRef::Horizontal(h), aggregator))
                .collect::<Result<Vec<_>>>()
                .map(FittedParams::PerElement),
        },
    }
}

/// State recorded by a successful fit.
#[derive(Debug, Clone)]
pub(crate) struct Fitted {
    pub(crate) params: FittedParams,
    pub(crate) n_features_in: usize,
}

/// Run the transform preconditions in contract order: fitted, recognized
/// input, matching column count.
pub(crate) fn check_input<'a, I: ScalerInput + ?Sized>(
    state: Option<&'a Fitted>,
    input: &'a I,
    scaler: &'static str,
) -> Result<(&'a Fitted, FederatedRef<'a>)> {
    let fitted = state.ok_or(PreprocessError::NotFitted)?;
    let frame = input.federated().ok_or(PreprocessError::UnsupportedInput)?;
    let actual = frame.columns().len();
    if actual != fitted.n_features_in {
        return Err(PreprocessError::FeatureCountMismatch {
            scaler,
            actual,
            expected: fitted.n_features_in,
        });
    }
    Ok((fitted, frame))
}

/// Recognize the input and narrow it to `columns`.
pub(crate) fn select_input<I: ScalerInput + ?Sized>(
    input: &I,
    columns: Option<&[&str]>,
) -> Result<FedDataFrame> {
    let frame = input.federated().ok_or(PreprocessError::UnsupportedInput)?;
    match columns {
        Some(columns) => frame.select(columns),
        None => Ok(frame.to_frame()),
    }
}

/// Replace a scale that would blow up the transform with 1.
pub(crate) fn handle_zero_scale(column: &str, scale: f64) -> f64 {
    if scale.is_finite() && scale >= 10.0 * f64::EPSILON {
        scale
    } else {
        tracing::warn!(column, scale, "degenerate scale, using 1");
        1.0
    }
}
