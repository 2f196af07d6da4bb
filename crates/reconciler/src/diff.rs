//! Keyed child-list diff.
//!
//! Runs in two phases over a host unit's children. The first walks the new
//! children, reuses the old unit under the same key when the two are
//! compatible and updates it in place (nested passes are queued here, ahead
//! of this pass). The second walks the new children again and queues this
//! pass: a reused unit whose old position lies before the highest old
//! position kept so far is moved, everything else stays put; fresh units are
//! inserted, and an incompatible old unit under the same key is deleted
//! first. Old units nobody claimed are deleted last, in old order.
//!
//! Duplicate keys are tolerated: a fresh unit takes the first sibling
//! identity for its key that no kept sibling holds.

use crate::batch::DiffOp;
use crate::context::UpdateContext;
use crate::error::PatchError;
use crate::unit::{HostUnit, Unit, should_deep_compare};
use std::collections::{HashMap, HashSet};
use vdom::{Child, Key, MountId, MutationSurface};

enum Slot {
    Reused(Unit),
    Fresh(Child),
}

pub(crate) fn report_duplicate_keys(parent: &MountId, children: &[Child]) {
    let mut seen = HashSet::with_capacity(children.len());
    for (index, child) in children.iter().enumerate() {
        let key = child.resolve_key(index);
        if !seen.insert(key.clone()) {
            log::warn!(target: "reconciler.diff", "duplicate key {key:?} among children of {parent}");
        }
    }
}

/// First identity under `parent` for `key` that no sibling holds yet.
pub(crate) fn sibling_id(parent: &MountId, key: &Key, taken: &mut HashSet<MountId>) -> MountId {
    let mut occurrence = 0;
    loop {
        let id = parent.child_occurrence(key, occurrence);
        if taken.insert(id.clone()) {
            return id;
        }
        occurrence += 1;
    }
}

impl HostUnit {
    pub(crate) fn diff<S: MutationSurface>(
        &mut self,
        next: &[Child],
        cx: &mut UpdateContext<'_, S>,
    ) -> Result<(), PatchError> {
        let parent = self.header.mount_id.clone();
        if cx.config().warn_on_duplicate_keys {
            report_duplicate_keys(&parent, next);
        }

        let old_children = std::mem::take(&mut self.children);
        let mut old_slots: Vec<Option<Unit>> = Vec::with_capacity(old_children.len());
        let mut old_keys: HashMap<Key, usize> = HashMap::with_capacity(old_children.len());
        for (index, unit) in old_children.into_iter().enumerate() {
            old_keys.insert(unit.current().resolve_key(index), index);
            old_slots.push(Some(unit));
        }

        let mut slots = Vec::with_capacity(next.len());
        let mut keys = Vec::with_capacity(next.len());
        for (index, child) in next.iter().enumerate() {
            let key = child.resolve_key(index);
            let reusable = old_keys.get(&key).copied().filter(|&old| {
                old_slots[old]
                    .as_ref()
                    .is_some_and(|unit| should_deep_compare(&unit.current(), child))
            });
            let slot = match reusable.and_then(|old| old_slots[old].take()) {
                Some(mut unit) => {
                    unit.update(child.clone(), cx)?;
                    Slot::Reused(unit)
                }
                None => Slot::Fresh(child.clone()),
            };
            slots.push(slot);
            keys.push(key);
        }

        let pass = cx.begin_pass();

        // Stale units are released before any fresh mount, since a fresh
        // unit may take over the identity of one deleted in this pass.
        let mut replaced: Vec<Option<usize>> = Vec::with_capacity(slots.len());
        for (slot, key) in slots.iter().zip(&keys) {
            let stale = match slot {
                Slot::Fresh(_) => old_keys.get(key).and_then(|&old| old_slots[old].take()),
                Slot::Reused(_) => None,
            };
            replaced.push(stale.map(|mut stale| {
                stale.unmount(cx);
                stale.mounted_index()
            }));
        }
        let mut leftovers = Vec::new();
        for mut stale in old_slots.into_iter().flatten() {
            stale.unmount(cx);
            leftovers.push(stale.mounted_index());
        }
        let mut taken: HashSet<MountId> = slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Reused(unit) => Some(unit.mount_id().clone()),
                Slot::Fresh(_) => None,
            })
            .collect();

        let mut last_index = 0;
        let mut children = Vec::with_capacity(slots.len());
        for (index, ((slot, key), stale)) in slots.into_iter().zip(keys).zip(replaced).enumerate() {
            let mut unit = match slot {
                Slot::Reused(unit) => {
                    let from = unit.mounted_index();
                    if from < last_index {
                        log::trace!(target: "reconciler.diff", "{parent}: move {from} -> {index}");
                        cx.queue_diff(
                            pass,
                            DiffOp::Move {
                                parent: parent.clone(),
                                from,
                                to: index,
                            },
                        );
                    }
                    last_index = last_index.max(from);
                    unit
                }
                Slot::Fresh(child) => {
                    if let Some(from) = stale {
                        log::trace!(target: "reconciler.diff", "{parent}: delete {from} (replaced)");
                        cx.queue_diff(
                            pass,
                            DiffOp::Delete {
                                parent: parent.clone(),
                                from,
                            },
                        );
                    }
                    let id = sibling_id(&parent, &key, &mut taken);
                    let (unit, markup) = Unit::mount(child, id, cx);
                    log::trace!(target: "reconciler.diff", "{parent}: insert {} at {index}", markup.id());
                    cx.queue_diff(
                        pass,
                        DiffOp::Insert {
                            parent: parent.clone(),
                            to: index,
                            markup,
                        },
                    );
                    unit
                }
            };
            unit.set_mounted_index(index);
            children.push(unit);
        }

        for from in leftovers {
            log::trace!(target: "reconciler.diff", "{parent}: delete {from}");
            cx.queue_diff(
                pass,
                DiffOp::Delete {
                    parent: parent.clone(),
                    from,
                },
            );
        }

        self.children = children;
        Ok(())
    }
}
