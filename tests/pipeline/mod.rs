//! End-to-end tests for the validation pipeline
//!
//! External programs are replaced by a scripted runner, so these run without
//! a .NET SDK or the analysis tool installed.

pub mod action_map;
pub mod fixtures;
pub mod helpers;
pub mod retention;
pub mod setup;

pub use fixtures::*;
pub use helpers::*;
