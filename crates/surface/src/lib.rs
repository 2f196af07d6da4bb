//! # surface
//!
//! An in-memory implementation of [`vdom::MutationSurface`].
//!
//! - [`MemorySurface`]: arena-backed node store addressed by mount identity,
//!   with containers, delegated event dispatch and materialization back to
//!   [`vdom::Markup`].
//! - [`snapshot`]: deterministic comparisons of markup trees for tests.

mod delegation;
mod store;

pub mod snapshot;

pub use delegation::DelegationTable;
pub use snapshot::{Snapshot, SnapshotOptions, assert_markup_eq, compare_markup};
pub use store::{MemorySurface, NodeKey};
