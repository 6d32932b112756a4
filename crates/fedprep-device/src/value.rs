//! Owner-scoped values.

use std::fmt;

use crate::{DeviceError, Owner, Result};

/// A value held by exactly one owner.
///
/// The payload is never exposed through `Deref`, `Display` or `Debug`.
/// Owner-local computation goes through [`apply`](Self::apply) and friends;
/// plaintext is only obtained through [`reveal`](Self::reveal).
#[derive(Clone)]
pub struct OwnerValue<T> {
    owner: Owner,
    value: T,
}

impl<T> OwnerValue<T> {
    pub(crate) fn new(owner: Owner, value: T) -> Self {
        Self { owner, value }
    }

    /// The owner holding this value.
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Run `f` on the owning party and keep the result there.
    pub fn apply<U, F>(&self, f: F) -> OwnerValue<U>
    where
        F: FnOnce(&T) -> U,
    {
        OwnerValue::new(self.owner.clone(), f(&self.value))
    }

    /// Fallible form of [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// Returns the computation's error unchanged.
    pub fn try_apply<U, E, F>(&self, f: F) -> std::result::Result<OwnerValue<U>, E>
    where
        F: FnOnce(&T) -> std::result::Result<U, E>,
    {
        Ok(OwnerValue::new(self.owner.clone(), f(&self.value)?))
    }

    /// Combine two values held by the same owner.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::OwnerMismatch`] when `other` is held elsewhere.
    pub fn zip_apply<S, U, F>(&self, other: &OwnerValue<S>, f: F) -> Result<OwnerValue<U>>
    where
        F: FnOnce(&T, &S) -> U,
    {
        self.ensure_same_owner(other)?;
        Ok(OwnerValue::new(
            self.owner.clone(),
            f(&self.value, &other.value),
        ))
    }

    /// Fallible form of [`zip_apply`](Self::zip_apply).
    ///
    /// # Errors
    ///
    /// Returns an owner mismatch or the computation's error.
    pub fn try_zip_apply<S, U, E, F>(
        &self,
        other: &OwnerValue<S>,
        f: F,
    ) -> std::result::Result<OwnerValue<U>, E>
    where
        E: From<DeviceError>,
        F: FnOnce(&T, &S) -> std::result::Result<U, E>,
    {
        self.ensure_same_owner(other)?;
        Ok(OwnerValue::new(
            self.owner.clone(),
            f(&self.value, &other.value)?,
        ))
    }

    /// Consume the handle and materialize the plaintext value.
    pub fn into_revealed(self) -> T {
        tracing::trace!(owner = %self.owner, "reveal");
        self.value
    }

    fn ensure_same_owner<S>(&self, other: &OwnerValue<S>) -> Result<()> {
        if self.owner == other.owner {
            Ok(())
        } else {
            Err(DeviceError::OwnerMismatch {
                left: self.owner.clone(),
                right: other.owner.clone(),
            })
        }
    }
}

impl<T: Clone> OwnerValue<T> {
    /// Materialize a plaintext copy of the value.
    pub fn reveal(&self) -> T {
        tracing::trace!(owner = %self.owner, "reveal");
        self.value.clone()
    }
}

impl<T> fmt::Debug for OwnerValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerValue")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Materialize a plaintext copy of an owner-scoped value.
pub fn reveal<T: Clone>(value: &OwnerValue<T>) -> T {
    value.reveal()
}
