//! MinMaxScaler over row- and column-partitioned frames.

use std::sync::Arc;

use approx::assert_relative_eq;
use fedprep_common::numeric_column_f64;
use fedprep_device::{Owner, reveal};
use fedprep_frame::{HDataFrame, MixDataFrame, MixPartitions, Partition, VDataFrame};
use fedprep_preprocessing::{MinMaxScaler, MinMaxScalerOptions};
use fedprep_security::{PlainAggregator, PlainComparator};
use polars::prelude::{DataFrame, NamedFrom, Series};

fn frame(name: &str, values: &[Option<f64>]) -> DataFrame {
    DataFrame::new(vec![Series::new(name.into(), values).into()]).unwrap()
}

fn values(partition: &Partition, name: &str) -> Vec<Option<f64>> {
    numeric_column_f64(&reveal(partition.data()), name).unwrap()
}

fn assert_close(actual: &[Option<f64>], expected: &[Option<f64>]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        match (a, e) {
            (Some(a), Some(e)) => assert_relative_eq!(*a, *e, epsilon = 1e-12),
            (None, None) => {}
            _ => panic!("missing mismatch: {actual:?} vs {expected:?}"),
        }
    }
}

fn hdf() -> HDataFrame {
    let carol = Owner::new("carol");
    HDataFrame::new(
        [
            Partition::from_frame(
                &Owner::new("alice"),
                frame("x", &[Some(2.0), None, Some(4.0)]),
            ),
            Partition::from_frame(&Owner::new("bob"), frame("x", &[Some(10.0), Some(6.0)])),
        ],
        Arc::new(PlainAggregator::new(carol.clone())),
        Arc::new(PlainComparator::new(carol)),
    )
    .unwrap()
}

#[test]
fn row_split_uses_global_extremes() {
    let mut scaler = MinMaxScaler::default();
    let scaled = scaler
        .fit_transform(&hdf(), None, None)
        .unwrap()
        .into_horizontal()
        .unwrap();
    assert_close(
        &values(scaled.partition(&Owner::new("alice")).unwrap(), "x"),
        &[Some(0.0), None, Some(0.25)],
    );
    assert_close(
        &values(scaled.partition(&Owner::new("bob")).unwrap(), "x"),
        &[Some(1.0), Some(0.5)],
    );
}

#[test]
fn custom_range_and_inverse() {
    let options = MinMaxScalerOptions::default().with_feature_range(-1.0, 1.0);
    let mut scaler = MinMaxScaler::new(options).unwrap();
    let scaled = scaler.fit_transform(&hdf(), None, None).unwrap();
    let bob = scaled
        .as_horizontal()
        .unwrap()
        .partition(&Owner::new("bob"))
        .unwrap()
        .clone();
    assert_close(&values(&bob, "x"), &[Some(1.0), Some(0.0)]);

    let restored = scaler
        .inverse_transform(&scaled)
        .unwrap()
        .into_horizontal()
        .unwrap();
    assert_close(
        &values(restored.partition(&Owner::new("alice")).unwrap(), "x"),
        &[Some(2.0), None, Some(4.0)],
    );
}

#[test]
fn column_split_is_local_and_constant_column_is_safe() {
    let vdf = VDataFrame::new([
        Partition::from_frame(&Owner::new("alice"), frame("a", &[Some(1.0), Some(3.0)])),
        Partition::from_frame(&Owner::new("bob"), frame("b", &[Some(5.0), Some(5.0)])),
    ])
    .unwrap();
    let scaled = MinMaxScaler::default()
        .fit_transform(&vdf, None, None)
        .unwrap()
        .into_vertical()
        .unwrap();
    assert_close(
        &values(scaled.partition(&Owner::new("alice")).unwrap(), "a"),
        &[Some(0.0), Some(1.0)],
    );
    assert_close(
        &values(scaled.partition(&Owner::new("bob")).unwrap(), "b"),
        &[Some(0.0), Some(0.0)],
    );
}

#[test]
fn row_group_mix_compares_per_owner() {
    let element = |alice: &[Option<f64>], bob: &[Option<f64>]| {
        VDataFrame::new([
            Partition::from_frame(&Owner::new("alice"), frame("a", alice)),
            Partition::from_frame(&Owner::new("bob"), frame("b", bob)),
        ])
        .unwrap()
    };
    let mix = MixDataFrame::from_vertical(vec![
        element(&[Some(0.0), Some(5.0)], &[Some(-1.0), None]),
        element(&[Some(10.0)], &[Some(1.0)]),
    ])
    .unwrap();
    let scaled = MinMaxScaler::default()
        .fit_transform(&mix, None, None)
        .unwrap()
        .into_mixed()
        .unwrap();
    let MixPartitions::VFrames(frames) = scaled.partitions() else {
        panic!("row-group mix keeps its elements");
    };
    assert_close(
        &values(frames[0].partition(&Owner::new("alice")).unwrap(), "a"),
        &[Some(0.0), Some(0.5)],
    );
    assert_close(
        &values(frames[0].partition(&Owner::new("bob")).unwrap(), "b"),
        &[Some(0.0), None],
    );
    assert_close(
        &values(frames[1].partition(&Owner::new("bob")).unwrap(), "b"),
        &[Some(1.0)],
    );
}

#[test]
fn row_group_mix_with_empty_owner_element() {
    let element = |alice: &[Option<f64>], bob: &[Option<f64>]| {
        VDataFrame::new([
            Partition::from_frame(&Owner::new("alice"), frame("a", alice)),
            Partition::from_frame(&Owner::new("bob"), frame("b", bob)),
        ])
        .unwrap()
    };
    let mix = MixDataFrame::from_vertical(vec![
        element(&[Some(0.0), Some(4.0)], &[None, None]),
        element(&[Some(2.0)], &[Some(1.0)]),
        element(&[Some(8.0)], &[Some(3.0)]),
    ])
    .unwrap();
    let scaled = MinMaxScaler::default()
        .fit_transform(&mix, None, None)
        .unwrap()
        .into_mixed()
        .unwrap();
    let MixPartitions::VFrames(frames) = scaled.partitions() else {
        panic!("row-group mix keeps its elements");
    };
    let bob: Vec<_> = frames
        .iter()
        .flat_map(|frame| values(frame.partition(&Owner::new("bob")).unwrap(), "b"))
        .collect();
    assert_close(&bob, &[None, None, Some(0.0), Some(1.0)]);
    let alice: Vec<_> = frames
        .iter()
        .flat_map(|frame| values(frame.partition(&Owner::new("alice")).unwrap(), "a"))
        .collect();
    assert_close(&alice, &[Some(0.0), Some(0.5), Some(0.25), Some(1.0)]);
}

#[test]
fn all_missing_and_constant_columns() {
    let fragment = |x: &[Option<f64>], k: &[Option<f64>]| {
        DataFrame::new(vec![
            Series::new("x".into(), x).into(),
            Series::new("k".into(), k).into(),
        ])
        .unwrap()
    };
    let carol = Owner::new("carol");
    let hdf = HDataFrame::new(
        [
            Partition::from_frame(&Owner::new("alice"), fragment(&[None], &[Some(7.0)])),
            Partition::from_frame(
                &Owner::new("bob"),
                fragment(&[None, None], &[Some(7.0), None]),
            ),
        ],
        Arc::new(PlainAggregator::new(carol.clone())),
        Arc::new(PlainComparator::new(carol)),
    )
    .unwrap();

    let scaled = MinMaxScaler::default()
        .fit_transform(&hdf, None, None)
        .unwrap()
        .into_horizontal()
        .unwrap();
    let alice = scaled.partition(&Owner::new("alice")).unwrap();
    assert_close(&values(alice, "x"), &[None]);
    assert_close(&values(alice, "k"), &[Some(0.0)]);
    let bob = scaled.partition(&Owner::new("bob")).unwrap();
    assert_close(&values(bob, "x"), &[None, None]);
    assert_close(&values(bob, "k"), &[Some(0.0), None]);
}

#[test]
fn feature_count_message_names_the_scaler() {
    let mut scaler = MinMaxScaler::default();
    scaler.fit(&hdf(), None).unwrap();
    let wider = VDataFrame::new([
        Partition::from_frame(&Owner::new("alice"), frame("a", &[Some(1.0)])),
        Partition::from_frame(&Owner::new("bob"), frame("b", &[Some(1.0)])),
    ])
    .unwrap();
    let err = scaler.transform(&wider).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"X has 2 features, but MinMaxScaler is expecting 1 features as input."
    );
}
