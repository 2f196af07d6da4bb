//! Event handlers and queued state updates.
//!
//! Handlers never touch the unit tree directly. They record state updates on
//! an [`Updater`], which the root drains inside one batched update.

use crate::state::State;
use core_types::ComponentHandle;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&mut Updater)>);

impl EventHandler {
    pub fn new(f: impl Fn(&mut Updater) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, updater: &mut Updater) {
        (self.0)(updater)
    }

    pub fn ptr_eq(&self, other: &EventHandler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StateUpdate {
    pub target: ComponentHandle,
    pub partial: State,
}

/// FIFO of pending `set_state` calls.
#[derive(Debug, Default)]
pub struct Updater {
    queue: VecDeque<StateUpdate>,
}

impl Updater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&mut self, target: ComponentHandle, partial: State) {
        self.queue.push_back(StateUpdate { target, partial });
    }

    pub fn pop(&mut self) -> Option<StateUpdate> {
        self.queue.pop_front()
    }

    pub fn extend(&mut self, other: Updater) {
        self.queue.extend(other.queue);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
