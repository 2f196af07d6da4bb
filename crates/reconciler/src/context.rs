//! Per-root runtime state and the context threaded through unit operations.

use crate::batch::{DiffOp, DiffQueue, Edit, PassId, PatchStats, QueueEntry};
use crate::config::ReconcilerConfig;
use crate::error::PatchError;
use crate::patch;
use std::collections::HashMap;
use vdom::{ComponentHandle, MountId, MutationSurface, Updater};

/// One-shot "tree attached" notification. Every subscription fires at most
/// once; components mounted by a later update subscribe again and are fired
/// after the flush that attached them.
#[derive(Debug, Default)]
pub struct MountedSignal {
    subscribers: Vec<ComponentHandle>,
}

impl MountedSignal {
    pub fn subscribe(&mut self, handle: ComponentHandle) {
        self.subscribers.push(handle);
    }

    pub fn take(&mut self) -> Vec<ComponentHandle> {
        std::mem::take(&mut self.subscribers)
    }
}

#[derive(Debug)]
pub struct Runtime {
    pub(crate) config: ReconcilerConfig,
    pub(crate) queue: DiffQueue,
    pub(crate) updater: Updater,
    /// Live composites by handle. A handle missing here has been unmounted.
    pub(crate) registry: HashMap<ComponentHandle, MountId>,
    pub(crate) mounted: MountedSignal,
    pub(crate) stats: PatchStats,
    pub(crate) last_flush: Vec<DiffOp>,
    next_handle: u64,
}

impl Runtime {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self {
            config,
            queue: DiffQueue::new(),
            updater: Updater::new(),
            registry: HashMap::new(),
            mounted: MountedSignal::default(),
            stats: PatchStats::default(),
            last_flush: Vec::new(),
            next_handle: 1,
        }
    }

    pub(crate) fn register(&mut self, id: &MountId) -> ComponentHandle {
        let handle = ComponentHandle(self.next_handle);
        self.next_handle += 1;
        self.registry.insert(handle, id.clone());
        handle
    }

    pub(crate) fn unregister(&mut self, handle: ComponentHandle) {
        self.registry.remove(&handle);
    }
}

pub struct UpdateContext<'a, S: MutationSurface> {
    pub(crate) surface: &'a mut S,
    pub(crate) runtime: &'a mut Runtime,
}

impl<'a, S: MutationSurface> UpdateContext<'a, S> {
    pub fn new(surface: &'a mut S, runtime: &'a mut Runtime) -> Self {
        Self { surface, runtime }
    }

    pub(crate) fn enter(&mut self) {
        self.runtime.queue.enter();
    }

    /// Leaves one batch level and flushes once the outermost level is left.
    pub(crate) fn leave(&mut self) -> Result<(), PatchError> {
        if self.runtime.queue.leave() {
            self.flush()
        } else {
            Ok(())
        }
    }

    pub(crate) fn begin_pass(&mut self) -> PassId {
        self.runtime.queue.begin_pass()
    }

    pub(crate) fn queue_diff(&mut self, pass: PassId, op: DiffOp) {
        self.runtime.queue.push_diff(pass, op);
    }

    pub(crate) fn queue_edit(&mut self, edit: Edit) {
        self.runtime.queue.push_edit(edit);
    }

    pub(crate) fn config(&self) -> &ReconcilerConfig {
        &self.runtime.config
    }

    fn flush(&mut self) -> Result<(), PatchError> {
        let entries = self.runtime.queue.take();
        if self.runtime.config.record_patches {
            self.runtime.last_flush = entries
                .iter()
                .filter_map(|entry| match entry {
                    QueueEntry::Diff { op, .. } => Some(op.clone()),
                    QueueEntry::Edit(_) => None,
                })
                .collect();
        }
        if entries.is_empty() {
            return Ok(());
        }
        self.runtime.stats.flushes += 1;
        log::debug!(target: "reconciler.patch", "flushing {} queued operation(s)", entries.len());
        patch::apply_queue(self.surface, entries, &mut self.runtime.stats).inspect_err(|err| {
            log::error!(target: "reconciler.patch", "flush failed: {err}");
        })
    }
}
