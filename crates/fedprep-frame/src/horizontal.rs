//! Row-partitioned frames: every owner holds different rows of the same columns.

use std::fmt;
use std::sync::Arc;

use fedprep_device::{Owner, OwnerValue};
use fedprep_security::{Aggregator, Comparator};
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::column::{ensure_columns, owned_names};
use crate::partition::Extreme;
use crate::{ColumnValues, FrameError, Moments, Partition, Result, ScalingParams, merge_moments};

/// A logical table whose rows are split across owners.
///
/// Statistics are computed by each owner over its own rows and merged with
/// the frame's [`Aggregator`] (means, variances, counts) or [`Comparator`]
/// (minimum, maximum). Raw rows never leave their owner.
#[derive(Clone)]
pub struct HDataFrame {
    partitions: IndexMap<Owner, Partition>,
    columns: Vec<String>,
    aggregator: Arc<dyn Aggregator>,
    comparator: Arc<dyn Comparator>,
}

impl HDataFrame {
    /// Build a frame from one partition per owner.
    ///
    /// # Errors
    ///
    /// Fails when no partition is given, when an owner appears twice, or
    /// when the partitions do not share the same column set.
    pub fn new(
        partitions: impl IntoIterator<Item = Partition>,
        aggregator: Arc<dyn Aggregator>,
        comparator: Arc<dyn Comparator>,
    ) -> Result<Self> {
        let partitions = crate::index_by_owner(partitions)?;
        let Some(first) = partitions.values().next() else {
            return Err(FrameError::EmptyFrame);
        };
        let columns = first.columns().to_vec();
        for partition in partitions.values() {
            let same_set = partition.columns().len() == columns.len()
                && columns.iter().all(|name| partition.has_column(name));
            if !same_set {
                return Err(FrameError::SchemaMismatch {
                    owner: partition.owner().clone(),
                    expected: columns,
                    actual: partition.columns().to_vec(),
                });
            }
        }
        Ok(Self {
            partitions,
            columns,
            aggregator,
            comparator,
        })
    }

    /// Column names, in the order of the first partition.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn owners(&self) -> impl Iterator<Item = &Owner> {
        self.partitions.keys()
    }

    pub fn partitions(&self) -> &IndexMap<Owner, Partition> {
        &self.partitions
    }

    pub fn partition(&self, owner: &Owner) -> Option<&Partition> {
        self.partitions.get(owner)
    }

    pub fn aggregator(&self) -> &Arc<dyn Aggregator> {
        &self.aggregator
    }

    pub fn comparator(&self) -> &Arc<dyn Comparator> {
        &self.comparator
    }

    /// Same data, merged with a different aggregator.
    #[must_use]
    pub fn with_aggregator(mut self, aggregator: Arc<dyn Aggregator>) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Keep only `columns` on every owner.
    ///
    /// # Errors
    ///
    /// Fails with `ColumnNotFound` for an unknown column.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self> {
        let columns = owned_names(columns);
        ensure_columns(&self.columns, &columns)?;
        let partitions = self.try_map_partitions(|partition| partition.select(&columns))?;
        Ok(Self {
            partitions,
            columns,
            aggregator: Arc::clone(&self.aggregator),
            comparator: Arc::clone(&self.comparator),
        })
    }

    /// Total rows and number of columns.
    pub fn shape(&self) -> (usize, usize) {
        let rows = self
            .partitions
            .values()
            .map(|partition| partition.height().reveal())
            .sum();
        (rows, self.columns.len())
    }

    /// Per-owner summaries over every column, left on their owners.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric.
    pub fn local_moments(&self) -> Result<Vec<OwnerValue<Moments>>> {
        self.partitions
            .par_iter()
            .map(|(_, partition)| partition.moments(&self.columns))
            .collect()
    }

    /// Global count, mean and variance merged with the frame's aggregator.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the merge fails.
    pub fn moments(&self) -> Result<Moments> {
        self.moments_with(None)
    }

    /// Global moments, optionally merged with `aggregator` instead of the
    /// frame's own.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the merge fails.
    pub fn moments_with(&self, aggregator: Option<&dyn Aggregator>) -> Result<Moments> {
        let aggregator = aggregator.unwrap_or(self.aggregator.as_ref());
        tracing::debug!(
            owners = self.partitions.len(),
            columns = self.columns.len(),
            aggregator = ?aggregator,
            "merging row-partitioned moments"
        );
        merge_moments(&self.local_moments()?, aggregator)
    }

    /// Non-missing values per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the merge fails.
    pub fn count(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.count))
    }

    /// Mean per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the merge fails.
    pub fn mean(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.mean))
    }

    /// Population variance per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the merge fails.
    pub fn var(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.var))
    }

    /// Population standard deviation per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the merge fails.
    pub fn std(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.std()))
    }

    /// Minimum per column, compared across owners with the frame's comparator.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the comparison fails.
    pub fn min(&self) -> Result<ColumnValues> {
        self.extreme_with(Extreme::Min, None)
    }

    /// Maximum per column, compared across owners with the frame's comparator.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the comparison fails.
    pub fn max(&self) -> Result<ColumnValues> {
        self.extreme_with(Extreme::Max, None)
    }

    /// Minimum per column, optionally compared with `comparator` instead of
    /// the frame's own.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the comparison fails.
    pub fn min_with(&self, comparator: Option<&dyn Comparator>) -> Result<ColumnValues> {
        self.extreme_with(Extreme::Min, comparator)
    }

    /// Maximum per column, optionally compared with `comparator` instead of
    /// the frame's own.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric or the comparison fails.
    pub fn max_with(&self, comparator: Option<&dyn Comparator>) -> Result<ColumnValues> {
        self.extreme_with(Extreme::Max, comparator)
    }

    pub(crate) fn extreme_with(
        &self,
        extreme: Extreme,
        comparator: Option<&dyn Comparator>,
    ) -> Result<ColumnValues> {
        let comparator = comparator.unwrap_or(self.comparator.as_ref());
        let local: Vec<OwnerValue<Vec<f64>>> = self
            .partitions
            .par_iter()
            .map(|(_, partition)| extreme.local(partition, &self.columns))
            .collect::<Result<_>>()?;
        Ok(self.values(extreme.compare(comparator, &local)?.reveal()))
    }

    /// Scale every owner's rows with the same plaintext parameters.
    ///
    /// # Errors
    ///
    /// Fails if a column has no parameters or is not numeric.
    pub fn scale(&self, params: &ScalingParams) -> Result<Self> {
        self.map_same_schema(|partition| partition.scale(params))
    }

    /// Inverse of [`scale`](Self::scale).
    ///
    /// # Errors
    ///
    /// Fails if a column has no parameters or is not numeric.
    pub fn unscale(&self, params: &ScalingParams) -> Result<Self> {
        self.map_same_schema(|partition| partition.unscale(params))
    }

    fn map_same_schema<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(&Partition) -> Result<Partition> + Sync,
    {
        Ok(Self {
            partitions: self.try_map_partitions(f)?,
            columns: self.columns.clone(),
            aggregator: Arc::clone(&self.aggregator),
            comparator: Arc::clone(&self.comparator),
        })
    }

    fn try_map_partitions<F>(&self, f: F) -> Result<IndexMap<Owner, Partition>>
    where
        F: Fn(&Partition) -> Result<Partition> + Sync,
    {
        crate::map_partitions(&self.partitions, f)
    }

    fn values(&self, values: Vec<f64>) -> ColumnValues {
        ColumnValues::new(self.columns.clone(), values)
    }
}

impl fmt::Debug for HDataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HDataFrame")
            .field("owners", &self.partitions.keys().collect::<Vec<_>>())
            .field("columns", &self.columns)
            .field("aggregator", &self.aggregator)
            .field("comparator", &self.comparator)
            .finish()
    }
}
