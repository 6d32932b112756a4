//! Partitioned data frames and cross-owner statistics.
//!
//! A logical table can be split across owners in three ways:
//!
//! - [`HDataFrame`]: rows split across owners that share one schema. Per-owner
//!   summaries are merged with an injected [`Aggregator`] or [`Comparator`].
//! - [`VDataFrame`]: columns split across owners. Every statistic is local
//!   to the owner holding the column.
//! - [`MixDataFrame`]: an ordered list of either kind, partitioned the other
//!   way overall.
//!
//! [`FedDataFrame`] is the closed sum over the three kinds.
//!
//! Every owner-local step runs through [`fedprep_device::OwnerValue`]; only
//! per-owner summaries cross owner boundaries.
//!
//! [`Aggregator`]: fedprep_security::Aggregator
//! [`Comparator`]: fedprep_security::Comparator

mod column;
mod error;
mod fed;
mod horizontal;
mod mix;
mod moments;
mod partition;
mod scaling;
mod vertical;

pub use column::ColumnValues;
pub use error::{FrameError, Result};
pub use fed::FedDataFrame;
pub use horizontal::HDataFrame;
pub use mix::{MixDataFrame, MixPartitions, PartitionWay};
pub use moments::{Moments, merge_moments};
pub use partition::Partition;
pub use scaling::ScalingParams;
pub use vertical::VDataFrame;

use fedprep_device::Owner;
use indexmap::IndexMap;
use rayon::prelude::*;

/// Key partitions by owner, rejecting an owner that appears twice.
fn index_by_owner(
    partitions: impl IntoIterator<Item = Partition>,
) -> Result<IndexMap<Owner, Partition>> {
    let mut indexed = IndexMap::new();
    for partition in partitions {
        let owner = partition.owner().clone();
        if indexed.contains_key(&owner) {
            return Err(FrameError::DuplicateOwner { owner });
        }
        indexed.insert(owner, partition);
    }
    Ok(indexed)
}

/// Apply `f` to every partition on its owner, keeping owner order.
fn map_partitions<F>(
    partitions: &IndexMap<Owner, Partition>,
    f: F,
) -> Result<IndexMap<Owner, Partition>>
where
    F: Fn(&Partition) -> Result<Partition> + Sync,
{
    let mapped: Vec<(Owner, Partition)> = partitions
        .par_iter()
        .map(|(owner, partition)| Ok((owner.clone(), f(partition)?)))
        .collect::<Result<_>>()?;
    Ok(mapped.into_iter().collect())
}
