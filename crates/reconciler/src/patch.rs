//! Patch executor.
//!
//! Structural operations are applied one diff pass at a time. Within a pass,
//! every source position is resolved against the order the parent had before
//! the pass, all sources are detached (DELETE targets discarded, MOVE sources
//! retained), and only then are INSERTs and MOVEs placed in queue order.
//! Because the queue emits destinations in ascending order, placing each one
//! before whatever currently sits at that position yields the final order.
//! Edits between passes are applied where they were queued.

use crate::batch::{DiffOp, Edit, PassId, PatchStats, QueueEntry};
use crate::error::PatchError;
use std::collections::HashMap;
use vdom::{MountId, MutationSurface};

pub fn apply_queue<S: MutationSurface>(
    surface: &mut S,
    entries: Vec<QueueEntry>,
    stats: &mut PatchStats,
) -> Result<(), PatchError> {
    let mut pending: Vec<DiffOp> = Vec::new();
    let mut current: Option<PassId> = None;

    for entry in entries {
        match entry {
            QueueEntry::Diff { pass, op } => {
                if current != Some(pass) && !pending.is_empty() {
                    apply_pass(surface, std::mem::take(&mut pending), stats)?;
                }
                current = Some(pass);
                pending.push(op);
            }
            QueueEntry::Edit(edit) => {
                if !pending.is_empty() {
                    apply_pass(surface, std::mem::take(&mut pending), stats)?;
                }
                current = None;
                apply_edit(surface, edit)?;
                stats.edits += 1;
            }
        }
    }
    if !pending.is_empty() {
        apply_pass(surface, pending, stats)?;
    }
    Ok(())
}

fn apply_pass<S: MutationSurface>(
    surface: &mut S,
    ops: Vec<DiffOp>,
    stats: &mut PatchStats,
) -> Result<(), PatchError> {
    let mut sources: Vec<(S::Node, Option<(MountId, usize)>)> = Vec::new();
    for op in &ops {
        match op {
            DiffOp::Move { parent, from, .. } => {
                let node = surface.child_at(parent, *from)?;
                sources.push((node, Some((parent.clone(), *from))));
            }
            DiffOp::Delete { parent, from } => {
                sources.push((surface.child_at(parent, *from)?, None));
            }
            DiffOp::Insert { .. } => {}
        }
    }

    let mut retained: HashMap<(MountId, usize), S::Node> = HashMap::new();
    for (node, slot) in sources {
        surface.detach(&node)?;
        match slot {
            Some(slot) => {
                retained.insert(slot, node);
            }
            None => {
                surface.discard(node)?;
                stats.deletes += 1;
            }
        }
    }

    for op in ops {
        match op {
            DiffOp::Insert { parent, to, markup } => {
                log::trace!(target: "reconciler.patch", "insert {} at {parent}[{to}]", markup.id());
                surface.insert_markup(&parent, to, &markup)?;
                stats.inserts += 1;
            }
            DiffOp::Move { parent, from, to } => {
                let node = retained
                    .remove(&(parent.clone(), from))
                    .ok_or_else(|| PatchError::MissingRetained {
                        parent: parent.clone(),
                        from,
                    })?;
                log::trace!(target: "reconciler.patch", "move {parent}[{from}] -> [{to}]");
                surface.insert_node(&parent, to, node)?;
                stats.moves += 1;
            }
            DiffOp::Delete { .. } => {}
        }
    }
    Ok(())
}

fn apply_edit<S: MutationSurface>(surface: &mut S, edit: Edit) -> Result<(), PatchError> {
    match edit {
        Edit::SetText { target, text } => surface.set_text(&target, &text)?,
        Edit::SetAttribute {
            target,
            name,
            value,
        } => surface.set_attribute(&target, &name, &value)?,
        Edit::RemoveAttribute { target, name } => surface.remove_attribute(&target, &name)?,
        Edit::SetStyle {
            target,
            declarations,
        } => surface.set_style(&target, &declarations)?,
        Edit::SetClass { target, class } => surface.set_class(&target, &class)?,
        Edit::Replace { target, markup } => surface.replace(&target, &markup)?,
    }
    Ok(())
}
