//! Scalers fitted over partitioned data frames.
//!
//! [`StandardScaler`] and [`MinMaxScaler`] accept any [`ScalerInput`] and
//! recognize the three partitioned frame kinds. Fitting computes statistics
//! with the frame's own protocol and records [`FittedParams`] scoped to how
//! the frame is split:
//!
//! | Input                         | Statistics                       | State       |
//! |-------------------------------|----------------------------------|-------------|
//! | `HDataFrame`                  | merged across owners             | `Global`    |
//! | `VDataFrame`                  | on each owner                    | `PerOwner`  |
//! | `MixDataFrame` of row groups  | merged per owner across elements | `Global`    |
//! | `MixDataFrame` of col groups  | per element, as `HDataFrame`     | `PerElement`|
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use fedprep_device::Owner;
//! use fedprep_frame::{HDataFrame, Partition};
//! use fedprep_preprocessing::StandardScaler;
//! use fedprep_security::{PlainAggregator, PlainComparator};
//! use polars::prelude::{DataFrame, NamedFrom, Series};
//!
//! let column = |values: &[f64]| {
//!     DataFrame::new(vec![Series::new("x".into(), values).into()]).unwrap()
//! };
//! let carol = Owner::new("carol");
//! let frame = HDataFrame::new(
//!     [
//!         Partition::from_frame(&Owner::new("alice"), column(&[1.0, 2.0, 3.0])),
//!         Partition::from_frame(&Owner::new("bob"), column(&[4.0])),
//!     ],
//!     Arc::new(PlainAggregator::new(carol.clone())),
//!     Arc::new(PlainComparator::new(carol)),
//! )
//! .unwrap();
//!
//! let mut scaler = StandardScaler::default();
//! let scaled = scaler.fit_transform(&frame, None, None).unwrap();
//! assert_eq!(scaled.kind_name(), "HDataFrame");
//! assert_eq!(scaler.n_features_in(), Some(1));
//! ```

mod error;
mod fitted;
mod input;
mod minmax;
mod standard;

pub use error::{PreprocessError, Result};
pub use fitted::FittedParams;
pub use input::{FederatedRef, ScalerInput};
pub use minmax::{MinMaxScaler, MinMaxScalerOptions};
pub use standard::{StandardScaler, StandardScalerOptions};

pub use fedprep_frame::ScalingParams;
