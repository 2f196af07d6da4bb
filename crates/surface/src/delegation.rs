//! Document-level event delegation table.
//!
//! Entries are keyed by `(event name, scope identity)`. Dispatch walks from
//! the target identity up through its ancestors, so the handler on the
//! deepest scope runs first.

use std::collections::HashMap;
use vdom::{EventHandler, MountId};

#[derive(Default)]
pub struct DelegationTable {
    entries: HashMap<(String, MountId), EventHandler>,
}

impl DelegationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, event: &str, scope: &MountId, handler: EventHandler) {
        log::trace!(target: "surface.events", "bind {event} at {scope}");
        self.entries
            .insert((event.to_string(), scope.clone()), handler);
    }

    pub fn unbind(&mut self, event: &str, scope: &MountId) {
        self.entries.remove(&(event.to_string(), scope.clone()));
    }

    pub fn unbind_scope(&mut self, scope: &MountId) {
        let before = self.entries.len();
        self.entries.retain(|(_, id), _| !id.is_within(scope));
        log::trace!(
            target: "surface.events",
            "unbind {} handler(s) within {scope}",
            before - self.entries.len()
        );
    }

    pub fn contains(&self, event: &str, scope: &MountId) -> bool {
        self.entries
            .contains_key(&(event.to_string(), scope.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handlers that a bubbling `event` fired at `target` reaches, innermost first.
    pub fn bubble(&self, event: &str, target: &MountId) -> Vec<EventHandler> {
        let mut out = Vec::new();
        let mut current = Some(target.clone());
        while let Some(id) = current {
            if let Some(handler) = self.entries.get(&(event.to_string(), id.clone())) {
                out.push(handler.clone());
            }
            current = id.parent();
        }
        out
    }
}
