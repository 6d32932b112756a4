//! Data-holding parties.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::OwnerValue;

/// Identifier of a data holder.
///
/// Owners are cheap to clone, totally ordered and usable as map keys. An
/// owner is also the handle through which computation is dispatched into
/// that party's execution context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner {
    party: String,
}

impl Owner {
    /// Create an owner for the named party.
    pub fn new(party: impl Into<String>) -> Self {
        Self {
            party: party.into(),
        }
    }

    /// Name of the party.
    pub fn party(&self) -> &str {
        &self.party
    }

    /// Run a computation in this owner's execution context.
    pub fn run<T, F>(&self, f: F) -> OwnerValue<T>
    where
        F: FnOnce() -> T,
    {
        OwnerValue::new(self.clone(), f())
    }

    /// Run a fallible computation in this owner's execution context.
    ///
    /// # Errors
    ///
    /// Returns the computation's error unchanged.
    pub fn try_run<T, E, F>(&self, f: F) -> Result<OwnerValue<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        Ok(OwnerValue::new(self.clone(), f()?))
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.party)
    }
}

impl From<&str> for Owner {
    fn from(party: &str) -> Self {
        Self::new(party)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_party_name() {
        assert_eq!(Owner::new("alice").to_string(), "alice");
    }

    #[test]
    fn test_ordering_follows_party_name() {
        let mut owners = vec![Owner::new("carol"), Owner::new("alice"), Owner::new("bob")];
        owners.sort();
        let names: Vec<&str> = owners.iter().map(Owner::party).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Owner::new("bob")).unwrap();
        assert_eq!(json, "\"bob\"");
        let owner: Owner = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(owner, Owner::new("bob"));
    }

    #[test]
    fn test_try_run_propagates_error() {
        let alice = Owner::new("alice");
        let result: Result<OwnerValue<i32>, &str> = alice.try_run(|| Err("boom"));
        assert_eq!(result.unwrap_err(), "boom");
    }
}
