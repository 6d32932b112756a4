//! Execution substrate for partitioned data.
//!
//! An [`Owner`] is a data-holding party. Computation on an owner's data is
//! dispatched with [`Owner::run`] or [`OwnerValue::apply`] and yields an
//! [`OwnerValue`], an opaque handle bound to that owner. The only way to turn
//! an owner-scoped value into plaintext is [`reveal`] (or
//! [`OwnerValue::reveal`]), which is the single trust-boundary crossing.
//!
//! # Example
//!
//! ```
//! use fedprep_device::{Owner, reveal};
//!
//! let alice = Owner::new("alice");
//! let data = alice.run(|| vec![1.0, 2.0, 3.0]);
//! let total = data.apply(|values| values.iter().sum::<f64>());
//!
//! assert_eq!(total.owner(), &alice);
//! assert_eq!(reveal(&total), 6.0);
//! ```

mod error;
mod owner;
mod value;

pub use error::{DeviceError, Result};
pub use owner::Owner;
pub use value::{OwnerValue, reveal};
