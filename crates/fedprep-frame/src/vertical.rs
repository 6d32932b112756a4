//! Column-partitioned frames: every owner holds different columns of the same rows.

use fedprep_device::{Owner, OwnerValue};
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::column::{ensure_columns, owned_names};
use crate::partition::Extreme;
use crate::{ColumnValues, FrameError, Moments, Partition, Result, ScalingParams};

/// A logical table whose columns are split across owners.
///
/// Each column belongs to exactly one owner, so statistics never need a
/// cross-owner merge. Results are revealed per owner and concatenated in
/// owner order.
#[derive(Debug, Clone)]
pub struct VDataFrame {
    partitions: IndexMap<Owner, Partition>,
    columns: Vec<String>,
}

impl VDataFrame {
    /// Build a frame from one partition per owner.
    ///
    /// # Errors
    ///
    /// Fails when no partition is given, when an owner appears twice, or
    /// when two owners hold a column with the same name.
    pub fn new(partitions: impl IntoIterator<Item = Partition>) -> Result<Self> {
        let partitions = crate::index_by_owner(partitions)?;
        if partitions.is_empty() {
            return Err(FrameError::EmptyFrame);
        }
        let columns = concat_disjoint(partitions.values().map(Partition::columns))?;
        Ok(Self {
            partitions,
            columns,
        })
    }

    /// Column names: owner order, then each owner's column order.
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

    /// The owner holding `column`.
    pub fn owner_of(&self, column: &str) -> Option<&Owner> {
        self.partitions
            .iter()
            .find(|(_, partition)| partition.has_column(column))
            .map(|(owner, _)| owner)
    }

    /// Keep only `columns`. Owners left without a column are dropped.
    ///
    /// # Errors
    ///
    /// Fails with `ColumnNotFound` for an unknown column, or with
    /// `EmptyFrame` when `columns` is empty.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self> {
        let columns = owned_names(columns);
        ensure_columns(&self.columns, &columns)?;
        let mut partitions = IndexMap::new();
        for (owner, partition) in &self.partitions {
            let own: Vec<String> = columns
                .iter()
                .filter(|name| partition.has_column(name))
                .cloned()
                .collect();
            if !own.is_empty() {
                partitions.insert(owner.clone(), partition.select(&own)?);
            }
        }
        if partitions.is_empty() {
            return Err(FrameError::EmptyFrame);
        }
        let columns = concat_disjoint(partitions.values().map(Partition::columns))?;
        Ok(Self {
            partitions,
            columns,
        })
    }

    /// Rows (taken from the first owner) and number of columns.
    pub fn shape(&self) -> (usize, usize) {
        let rows = self
            .partitions
            .values()
            .next()
            .map_or(0, |partition| partition.height().reveal());
        (rows, self.columns.len())
    }

    /// Each owner's summary of its own columns, left on that owner.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric.
    pub fn local_moments(&self) -> Result<Vec<OwnerValue<Moments>>> {
        self.partitions
            .par_iter()
            .map(|(_, partition)| partition.moments(partition.columns()))
            .collect()
    }

    /// Per-owner moments, revealed and concatenated in column order.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric.
    pub fn moments(&self) -> Result<Moments> {
        tracing::debug!(
            owners = self.partitions.len(),
            columns = self.columns.len(),
            "computing column-partitioned moments"
        );
        let mut merged = Moments {
            count: Vec::with_capacity(self.columns.len()),
            mean: Vec::with_capacity(self.columns.len()),
            var: Vec::with_capacity(self.columns.len()),
        };
        for local in self.local_moments()? {
            let local = local.into_revealed();
            merged.count.extend(local.count);
            merged.mean.extend(local.mean);
            merged.var.extend(local.var);
        }
        Ok(merged)
    }

    /// Non-missing values per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric.
    pub fn count(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.count))
    }

    /// Mean per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric.
    pub fn mean(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.mean))
    }

    /// Population variance per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric.
    pub fn var(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.var))
    }

    /// Population standard deviation per column.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric.
    pub fn std(&self) -> Result<ColumnValues> {
        Ok(self.values(self.moments()?.std()))
    }

    /// Minimum per column, computed by each owner on its own columns.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric.
    pub fn min(&self) -> Result<ColumnValues> {
        self.local_extremes(Extreme::Min)
    }

    /// Maximum per column, computed by each owner on its own columns.
    ///
    /// # Errors
    ///
    /// Fails if a column is not numeric.
    pub fn max(&self) -> Result<ColumnValues> {
        self.local_extremes(Extreme::Max)
    }

    /// Scale every owner's columns with plaintext parameters.
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

    /// Scale each owner's columns with parameters that owner already holds.
    ///
    /// # Errors
    ///
    /// Fails with `MissingParams` when an owner has no entry in `params`,
    /// or if an entry is held by a different owner.
    pub fn scale_each(&self, params: &IndexMap<Owner, OwnerValue<ScalingParams>>) -> Result<Self> {
        self.map_same_schema(|partition| partition.scale_with(owner_params(params, partition)?))
    }

    /// Inverse of [`scale_each`](Self::scale_each).
    ///
    /// # Errors
    ///
    /// Fails with `MissingParams` when an owner has no entry in `params`,
    /// or if an entry is held by a different owner.
    pub fn unscale_each(
        &self,
        params: &IndexMap<Owner, OwnerValue<ScalingParams>>,
    ) -> Result<Self> {
        self.map_same_schema(|partition| partition.unscale_with(owner_params(params, partition)?))
    }

    fn local_extremes(&self, extreme: Extreme) -> Result<ColumnValues> {
        let local: Vec<OwnerValue<Vec<f64>>> = self
            .partitions
            .par_iter()
            .map(|(_, partition)| extreme.local(partition, partition.columns()))
            .collect::<Result<_>>()?;
        let values = local
            .into_iter()
            .flat_map(OwnerValue::into_revealed)
            .collect();
        Ok(self.values(values))
    }

    fn map_same_schema<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(&Partition) -> Result<Partition> + Sync,
    {
        Ok(Self {
            partitions: crate::map_partitions(&self.partitions, f)?,
            columns: self.columns.clone(),
        })
    }

    fn values(&self, values: Vec<f64>) -> ColumnValues {
        ColumnValues::new(self.columns.clone(), values)
    }
}

fn owner_params<'a>(
    params: &'a IndexMap<Owner, OwnerValue<ScalingParams>>,
    partition: &Partition,
) -> Result<&'a OwnerValue<ScalingParams>> {
    params
        .get(partition.owner())
        .ok_or_else(|| FrameError::MissingParams {
            owner: partition.owner().clone(),
        })
}

/// Concatenate column lists that must not share a name.
pub(crate) fn concat_disjoint<'a>(
    groups: impl IntoIterator<Item = &'a [String]>,
) -> Result<Vec<String>> {
    let mut columns: Vec<String> = Vec::new();
    for group in groups {
        for name in group {
            if columns.contains(name) {
                return Err(FrameError::DuplicateColumn {
                    column: name.clone(),
                });
            }
            columns.push(name.clone());
        }
    }
    Ok(columns)
}
