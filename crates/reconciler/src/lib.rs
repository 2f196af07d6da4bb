//! Keyed reconciliation of declarative element trees onto a mutation surface.
//!
//! [`render`] mounts an element tree, installs its markup and returns a
//! [`Root`]. State updates requested through a root (directly, from lifecycle
//! hooks, or from event handlers) are drained as one batch: every host unit
//! touched diffs its children into a shared queue, and the queue is applied to
//! the surface once, when the outermost batch level is left.

mod batch;
mod config;
mod context;
mod diff;
mod error;
mod instance;
mod patch;
mod root;
mod unit;

pub use crate::batch::{DiffOp, DiffQueue, Edit, PassId, PatchStats, QueueEntry};
pub use crate::config::ReconcilerConfig;
pub use crate::error::{PatchError, ReconcileError};
pub use crate::root::{Root, render};
