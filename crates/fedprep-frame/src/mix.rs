//! Composite frames: an ordered list of partitioned frames.
//!
//! A composite of [`VDataFrame`]s stacks row groups (every element has the
//! same columns per owner), so it is partitioned horizontally overall. A
//! composite of [`HDataFrame`]s places column groups side by side, so it is
//! partitioned vertically overall.

use std::collections::BTreeSet;

use fedprep_device::{Owner, OwnerValue};
use fedprep_security::{Aggregator, Comparator, PlainAggregator, PlainComparator};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::column::{ensure_columns, owned_names};
use crate::partition::Extreme;
use crate::vertical::concat_disjoint;
use crate::{
    ColumnValues, FrameError, HDataFrame, Moments, Partition, Result, ScalingParams, VDataFrame,
    merge_moments,
};

/// How the elements of a composite split the logical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionWay {
    /// Elements are row groups over the same columns.
    Horizontal,
    /// Elements are column groups over the same rows.
    Vertical,
}

/// The elements of a composite. All elements share one kind.
#[derive(Debug, Clone)]
pub enum MixPartitions {
    VFrames(Vec<VDataFrame>),
    HFrames(Vec<HDataFrame>),
}

#[derive(Debug, Clone)]
pub struct MixDataFrame {
    partitions: MixPartitions,
    columns: Vec<String>,
}

impl MixDataFrame {
    /// Stack column-partitioned row groups.
    ///
    /// # Errors
    ///
    /// Fails when no element is given, when elements involve different
    /// owners, or when an owner's columns differ between elements.
    pub fn from_vertical(frames: Vec<VDataFrame>) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(FrameError::EmptyFrame);
        };
        let expected = owner_names(first.owners());
        for (element, frame) in frames.iter().enumerate().skip(1) {
            ensure_same_owners(element, &expected, frame.owners())?;
            for (owner, partition) in frame.partitions() {
                let reference = first
                    .partition(owner)
                    .ok_or_else(|| FrameError::UnknownOwner {
                        owner: owner.clone(),
                    })?;
                let same_set = reference.columns().len() == partition.columns().len()
                    && reference.columns().iter().all(|c| partition.has_column(c));
                if !same_set {
                    return Err(FrameError::SchemaMismatch {
                        owner: owner.clone(),
                        expected: reference.columns().to_vec(),
                        actual: partition.columns().to_vec(),
                    });
                }
            }
        }
        let columns = first.columns().to_vec();
        Ok(Self {
            partitions: MixPartitions::VFrames(frames),
            columns,
        })
    }

    /// Place row-partitioned column groups side by side.
    ///
    /// # Errors
    ///
    /// Fails when no element is given, when elements involve different
    /// owners, or when two elements share a column.
    pub fn from_horizontal(frames: Vec<HDataFrame>) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(FrameError::EmptyFrame);
        };
        let expected = owner_names(first.owners());
        for (element, frame) in frames.iter().enumerate().skip(1) {
            ensure_same_owners(element, &expected, frame.owners())?;
        }
        let columns = concat_disjoint(frames.iter().map(HDataFrame::columns))?;
        Ok(Self {
            partitions: MixPartitions::HFrames(frames),
            columns,
        })
    }

    /// Column names of the logical table.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn partition_way(&self) -> PartitionWay {
        match self.partitions {
            MixPartitions::VFrames(_) => PartitionWay::Horizontal,
            MixPartitions::HFrames(_) => PartitionWay::Vertical,
        }
    }

    pub fn partitions(&self) -> &MixPartitions {
        &self.partitions
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match &self.partitions {
            MixPartitions::VFrames(frames) => frames.len(),
            MixPartitions::HFrames(frames) => frames.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Owners involved, in the order of the first element.
    pub fn owners(&self) -> Vec<&Owner> {
        match &self.partitions {
            MixPartitions::VFrames(frames) => frames[0].owners().collect(),
            MixPartitions::HFrames(frames) => frames[0].owners().collect(),
        }
    }

    /// Total rows and number of columns.
    pub fn shape(&self) -> (usize, usize) {
        let rows = match &self.partitions {
            MixPartitions::VFrames(frames) => frames.iter().map(|f| f.shape().0).sum(),
            MixPartitions::HFrames(frames) => frames[0].shape().0,
        };
        (rows, self.columns.len())
    }

    /// Keep only `columns` in every element.
    ///
    /// Column-group elements left without a column are dropped.
    ///
    /// # Errors
    ///
    /// Fails with `ColumnNotFound` for an unknown column, or with
    /// `EmptyFrame` when `columns` is empty.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self> {
        let columns = owned_names(columns);
        ensure_columns(&self.columns, &columns)?;
        match &self.partitions {
            MixPartitions::VFrames(frames) => Self::from_vertical(
                frames
                    .iter()
                    .map(|frame| frame.select(&columns))
                    .collect::<Result<_>>()?,
            ),
            MixPartitions::HFrames(frames) => {
                let mut selected = Vec::with_capacity(frames.len());
                for frame in frames {
                    let own: Vec<&String> = columns
                        .iter()
                        .filter(|name| frame.columns().contains(name))
                        .collect();
                    if !own.is_empty() {
                        selected.push(frame.select(&own)?);
                    }
                }
                Self::from_horizontal(selected)
            }
        }
    }

    /// Count, mean and variance per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn moments(&self) -> Result<Moments> {
        self.moments_with(None)
    }

    /// Count, mean and variance per column, merged with `aggregator` when
    /// given.
    ///
    /// Row groups are merged per owner across elements. Without an
    /// aggregator, each owner merges its own summaries. Column groups are
    /// summarised element by element, each with its own aggregator unless
    /// one is given here.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn moments_with(&self, aggregator: Option<&dyn Aggregator>) -> Result<Moments> {
        tracing::debug!(
            way = ?self.partition_way(),
            elements = self.len(),
            columns = self.columns.len(),
            "computing composite moments"
        );
        let parts = match &self.partitions {
            MixPartitions::VFrames(frames) => per_owner(frames, |owner, partitions, columns| {
                let local: Vec<OwnerValue<Moments>> = partitions
                    .iter()
                    .map(|partition| partition.moments(columns))
                    .collect::<Result<_>>()?;
                match aggregator {
                    Some(aggregator) => merge_moments(&local, aggregator),
                    None => merge_moments(&local, &PlainAggregator::new(owner.clone())),
                }
            })?,
            MixPartitions::HFrames(frames) => frames
                .iter()
                .map(|frame| frame.moments_with(aggregator))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(concat_moments(parts))
    }

    /// Non-missing values per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn count(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.count))
    }

    /// Mean per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn mean(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.mean))
    }

    /// Population variance per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn var(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.var))
    }

    /// Population standard deviation per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a merge fails.
    pub fn std(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.std()))
    }

    /// Minimum per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a comparison fails.
    pub fn min(&self) -> Result<ColumnValues> {
        self.min_with(None)
    }

    /// Maximum per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a comparison fails.
    pub fn max(&self) -> Result<ColumnValues> {
        self.max_with(None)
    }

    /// Minimum per column, compared with `comparator` when given.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a comparison fails.
    pub fn min_with(&self, comparator: Option<&dyn Comparator>) -> Result<ColumnValues> {
        self.extremes(Extreme::Min, comparator)
    }

    /// Maximum per column, compared with `comparator` when given.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or a comparison fails.
    pub fn max_with(&self, comparator: Option<&dyn Comparator>) -> Result<ColumnValues> {
        self.extremes(Extreme::Max, comparator)
    }

    /// Scale every element with the same plaintext parameters.
    ///
    /// # Errors
    ///
    /// Fails if a column has no parameters or is not numeric.
    pub fn scale(&self, params: &ScalingParams) -> Result<Self> {
        self.map_elements(|v| v.scale(params), |h| h.scale(params))
    }

    /// Inverse of [`scale`](Self::scale).
    ///
    /// # Errors
    ///
    /// Fails if a column has no parameters or is not numeric.
    pub fn unscale(&self, params: &ScalingParams) -> Result<Self> {
        self.map_elements(|v| v.unscale(params), |h| h.unscale(params))
    }

    fn map_elements<V, H>(&self, on_vertical: V, on_horizontal: H) -> Result<Self>
    where
        V: Fn(&VDataFrame) -> Result<VDataFrame>,
        H: Fn(&HDataFrame) -> Result<HDataFrame>,
    {
        let partitions = match &self.partitions {
            MixPartitions::VFrames(frames) => {
                MixPartitions::VFrames(frames.iter().map(on_vertical).collect::<Result<_>>()?)
            }
            MixPartitions::HFrames(frames) => {
                MixPartitions::HFrames(frames.iter().map(on_horizontal).collect::<Result<_>>()?)
            }
        };
        Ok(Self {
            partitions,
            columns: self.columns.clone(),
        })
    }

    fn extremes(
        &self,
        extreme: Extreme,
        comparator: Option<&dyn Comparator>,
    ) -> Result<ColumnValues> {
        let values = match &self.partitions {
            MixPartitions::VFrames(frames) => per_owner(frames, |owner, partitions, columns| {
                let data: Vec<OwnerValue<Vec<f64>>> = partitions
                    .iter()
                    .map(|partition| extreme.local(partition, columns))
                    .collect::<Result<_>>()?;
                let merged = match comparator {
                    Some(comparator) => extreme.compare(comparator, &data)?,
                    None => extreme.compare(&PlainComparator::new(owner.clone()), &data)?,
                };
                Ok(merged.into_revealed())
            })?
            .into_iter()
            .flatten()
            .collect(),
            MixPartitions::HFrames(frames) => {
                let mut values = Vec::with_capacity(self.columns.len());
                for frame in frames {
                    values.extend_from_slice(frame.extreme_with(extreme, comparator)?.values());
                }
                values
            }
        };
        Ok(self.values(values))
    }

    fn values(&self, values: Vec<f64>) -> ColumnValues {
        ColumnValues::new(self.columns.clone(), values)
    }
}

fn owner_names<'a>(owners: impl Iterator<Item = &'a Owner>) -> Vec<String> {
    owners.map(|owner| owner.party().to_string()).collect()
}

fn ensure_same_owners<'a>(
    element: usize,
    expected: &[String],
    owners: impl Iterator<Item = &'a Owner>,
) -> Result<()> {
    let actual = owner_names(owners);
    let lhs: BTreeSet<&String> = expected.iter().collect();
    let rhs: BTreeSet<&String> = actual.iter().collect();
    if lhs == rhs {
        Ok(())
    } else {
        Err(FrameError::OwnerSetMismatch {
            element,
            expected: expected.to_vec(),
            actual,
        })
    }
}

/// Run `f` once per owner over that owner's partitions from every row group.
///
/// Results come back in the owner order of the first element.
fn per_owner<T, F>(frames: &[VDataFrame], f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&Owner, &[&Partition], &[String]) -> Result<T> + Sync,
{
    let first = &frames[0];
    first
        .partitions()
        .par_iter()
        .map(|(owner, reference)| {
            let partitions: Vec<&Partition> = frames
                .iter()
                .map(|frame| {
                    frame
                        .partition(owner)
                        .ok_or_else(|| FrameError::UnknownOwner {
                            owner: owner.clone(),
                        })
                })
                .collect::<Result<_>>()?;
            f(owner, &partitions, reference.columns())
        })
        .collect()
}

fn concat_moments(parts: Vec<Moments>) -> Moments {
    let mut merged = Moments {
        count: Vec::new(),
        mean: Vec::new(),
        var: Vec::new(),
    };
    for part in parts {
        merged.count.extend(part.count);
        merged.mean.extend(part.mean);
        merged.var.extend(part.var);
    }
    merged
}
