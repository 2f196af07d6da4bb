//! Shared diff queue and batching depth.
//!
//! Every mutation computed during one root update lands here, in visitation
//! order (depth-first, sibling order). The queue is handed to the patch
//! executor once, when the outermost batch level is left.
//!
//! Invariants:
//! - Operations of one diff pass are contiguous and share one `PassId`.
//! - `from` indices of a pass refer to the parent's live order before that
//!   pass is applied; `to` indices to the order after it.
//! - The queue is empty and the depth zero between root updates.

use std::sync::Arc;
use vdom::{Markup, MountId};

pub type PassId = u32;

/// Structural child-list operation of a diff pass.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffOp {
    Move {
        parent: MountId,
        from: usize,
        to: usize,
    },
    Insert {
        parent: MountId,
        to: usize,
        markup: Markup,
    },
    Delete {
        parent: MountId,
        from: usize,
    },
}

impl DiffOp {
    pub fn parent(&self) -> &MountId {
        match self {
            DiffOp::Move { parent, .. }
            | DiffOp::Insert { parent, .. }
            | DiffOp::Delete { parent, .. } => parent,
        }
    }
}

/// In-place mutation of one live node.
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    SetText {
        target: MountId,
        text: String,
    },
    SetAttribute {
        target: MountId,
        name: Arc<str>,
        value: String,
    },
    RemoveAttribute {
        target: MountId,
        name: Arc<str>,
    },
    SetStyle {
        target: MountId,
        declarations: Vec<(Arc<str>, Arc<str>)>,
    },
    SetClass {
        target: MountId,
        class: String,
    },
    /// Wholesale swap of a node for freshly mounted markup.
    Replace {
        target: MountId,
        markup: Markup,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum QueueEntry {
    Diff { pass: PassId, op: DiffOp },
    Edit(Edit),
}

#[derive(Debug, Default)]
pub struct DiffQueue {
    entries: Vec<QueueEntry>,
    depth: usize,
    next_pass: PassId,
}

impl DiffQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) {
        self.depth += 1;
    }

    /// Leaves one level; returns `true` when the outermost level was left.
    pub fn leave(&mut self) -> bool {
        debug_assert!(self.depth > 0, "unbalanced batch leave");
        self.depth = self.depth.saturating_sub(1);
        self.depth == 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn begin_pass(&mut self) -> PassId {
        self.next_pass = self.next_pass.wrapping_add(1);
        self.next_pass
    }

    pub fn push_diff(&mut self, pass: PassId, op: DiffOp) {
        self.entries.push(QueueEntry::Diff { pass, op });
    }

    pub fn push_edit(&mut self, edit: Edit) {
        self.entries.push(QueueEntry::Edit(edit));
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn diff_ops(&self) -> impl Iterator<Item = &DiffOp> {
        self.entries.iter().filter_map(|entry| match entry {
            QueueEntry::Diff { op, .. } => Some(op),
            QueueEntry::Edit(_) => None,
        })
    }

    pub fn take(&mut self) -> Vec<QueueEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops queued work and the depth after a failed update.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.depth = 0;
    }
}

/// Counters over the lifetime of a root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatchStats {
    pub flushes: usize,
    pub moves: usize,
    pub inserts: usize,
    pub deletes: usize,
    pub edits: usize,
    pub state_updates: usize,
}
