//! Tests for FedDataFrame dispatch over the three frame kinds.

use std::sync::Arc;

use approx::assert_relative_eq;
use fedprep_common::numeric_column_f64;
use fedprep_device::{Owner, reveal};
use fedprep_frame::{
    FedDataFrame, FrameError, HDataFrame, MixDataFrame, Partition, ScalingParams, VDataFrame,
};
use fedprep_security::{PlainAggregator, PlainComparator};
use polars::prelude::{DataFrame, NamedFrom, Series};

fn frame(name: &str, values: &[f64]) -> DataFrame {
    DataFrame::new(vec![Series::new(name.into(), values).into()]).unwrap()
}

fn horizontal() -> HDataFrame {
    let carol = Owner::new("carol");
    HDataFrame::new(
        [
            Partition::from_frame(&Owner::new("alice"), frame("x", &[1.0, 2.0, 3.0])),
            Partition::from_frame(&Owner::new("bob"), frame("x", &[4.0])),
        ],
        Arc::new(PlainAggregator::new(carol.clone())),
        Arc::new(PlainComparator::new(carol)),
    )
    .unwrap()
}

fn vertical() -> VDataFrame {
    VDataFrame::new([
        Partition::from_frame(&Owner::new("alice"), frame("x", &[1.0, 3.0])),
        Partition::from_frame(&Owner::new("bob"), frame("y", &[10.0, 30.0])),
    ])
    .unwrap()
}

#[test]
fn kind_names() {
    assert_eq!(FedDataFrame::from(horizontal()).kind_name(), "HDataFrame");
    assert_eq!(FedDataFrame::from(vertical()).kind_name(), "VDataFrame");
    let mix = MixDataFrame::from_vertical(vec![vertical(), vertical()]).unwrap();
    assert_eq!(FedDataFrame::from(mix).kind_name(), "MixDataFrame");
}

#[test]
fn statistics_dispatch() {
    let fed = FedDataFrame::from(horizontal());
    assert_relative_eq!(fed.mean().unwrap().values()[0], 2.5);
    assert_relative_eq!(fed.std().unwrap().values()[0], 1.25f64.sqrt(), epsilon = 1e-12);

    let fed = FedDataFrame::from(vertical());
    assert_eq!(fed.columns(), ["x", "y"]);
    assert_eq!(fed.mean().unwrap().values(), &[2.0, 20.0]);
    assert_eq!(fed.min().unwrap().values(), &[1.0, 10.0]);
    assert_eq!(fed.max().unwrap().values(), &[3.0, 30.0]);
}

#[test]
fn scaling_keeps_kind_and_owner() {
    let fed = FedDataFrame::from(horizontal());
    let params = ScalingParams::new(vec!["x".into()], vec![2.5], vec![1.25f64.sqrt()]);
    let scaled = fed.scale(&params).unwrap();
    let frame = scaled.as_horizontal().unwrap();
    let bob = frame.partition(&Owner::new("bob")).unwrap();
    assert_eq!(bob.owner(), &Owner::new("bob"));
    let x = numeric_column_f64(&reveal(bob.data()), "x").unwrap();
    assert_relative_eq!(x[0].unwrap(), 1.341_640_786_499_874, epsilon = 1e-12);

    let restored = scaled.unscale(&params).unwrap().into_horizontal().unwrap();
    let alice = reveal(restored.partition(&Owner::new("alice")).unwrap().data());
    let x = numeric_column_f64(&alice, "x").unwrap();
    assert_relative_eq!(x[2].unwrap(), 3.0, epsilon = 1e-12);
}

#[test]
fn select_preserves_kind() {
    let fed = FedDataFrame::from(vertical()).select(&["y"]).unwrap();
    let frame = fed.as_vertical().unwrap();
    assert_eq!(frame.owners().collect::<Vec<_>>(), vec![&Owner::new("bob")]);
    assert!(fed.as_horizontal().is_none());
    assert!(matches!(
        FedDataFrame::from(horizontal())
            .select(&["nope"])
            .unwrap_err(),
        FrameError::ColumnNotFound { .. }
    ));
}
