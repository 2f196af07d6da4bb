//! Component contract.
//!
//! A component is constructed from its props, owns no state storage of its
//! own (state lives with the runtime instance and is handed in through the
//! contexts), and produces a child description on demand. `set_state` is
//! infrastructure on [`LifecycleContext`] and cannot be overridden.

use crate::element::Child;
use crate::event::Updater;
use crate::props::Props;
use crate::state::State;
use core_types::ComponentHandle;
use std::any::{TypeId, type_name};
use std::fmt;

pub trait Component: 'static {
    fn create(props: &Props) -> Self
    where
        Self: Sized;

    fn initial_state(&self, _props: &Props) -> State {
        State::new()
    }

    /// Runs synchronously before the first render.
    fn will_mount(&mut self, _cx: &mut LifecycleContext<'_>) {}

    /// Runs once the tree this component was mounted into is attached.
    fn did_mount(&mut self, _cx: &mut LifecycleContext<'_>) {}

    /// Runs after an in-place update of the rendered subtree.
    fn did_update(&mut self, _cx: &mut LifecycleContext<'_>) {}

    fn should_update(&self, _next_props: &Props, _next_state: &State) -> bool {
        true
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child;
}

/// Type tag of a component element. Two tags are equal iff they name the
/// same Rust type.
#[derive(Clone, Copy)]
pub struct ComponentType {
    type_id: TypeId,
    name: &'static str,
    ctor: fn(&Props) -> Box<dyn Component>,
}

fn construct<C: Component>(props: &Props) -> Box<dyn Component> {
    Box::new(C::create(props))
}

impl ComponentType {
    pub fn of<C: Component>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: type_name::<C>(),
            ctor: construct::<C>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn instantiate(&self, props: &Props) -> Box<dyn Component> {
        (self.ctor)(props)
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentType {}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentType").field(&self.name).finish()
    }
}

pub struct RenderContext<'a> {
    handle: ComponentHandle,
    props: &'a Props,
    state: &'a State,
}

impl<'a> RenderContext<'a> {
    pub fn new(handle: ComponentHandle, props: &'a Props, state: &'a State) -> Self {
        Self {
            handle,
            props,
            state,
        }
    }

    /// Handle to capture in event handlers that update this component.
    pub fn handle(&self) -> ComponentHandle {
        self.handle
    }

    pub fn props(&self) -> &Props {
        self.props
    }

    pub fn state(&self) -> &State {
        self.state
    }
}

pub struct LifecycleContext<'a> {
    handle: ComponentHandle,
    props: &'a Props,
    state: &'a State,
    updater: &'a mut Updater,
}

impl<'a> LifecycleContext<'a> {
    pub fn new(
        handle: ComponentHandle,
        props: &'a Props,
        state: &'a State,
        updater: &'a mut Updater,
    ) -> Self {
        Self {
            handle,
            props,
            state,
            updater,
        }
    }

    pub fn handle(&self) -> ComponentHandle {
        self.handle
    }

    pub fn props(&self) -> &Props {
        self.props
    }

    pub fn state(&self) -> &State {
        self.state
    }

    /// Queues a shallow state merge for this component. It is applied within
    /// the batch that is currently running.
    pub fn set_state(&mut self, partial: State) {
        self.updater.set_state(self.handle, partial);
    }

    /// Queues a state merge for another component.
    pub fn set_state_of(&mut self, target: ComponentHandle, partial: State) {
        self.updater.set_state(target, partial);
    }
}
