//! Command-line simulation of federated preprocessing.
//!
//! Every `--part` is loaded on its own owner; the commands then run the same
//! fit and statistics paths a real deployment would.

#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
