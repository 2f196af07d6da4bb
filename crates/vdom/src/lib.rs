//! Declarative element descriptions and the contract of the surface they are
//! mirrored onto.

pub mod component;
pub mod element;
pub mod event;
pub mod markup;
pub mod mount_id;
pub mod props;
pub mod state;
pub mod surface;

pub use crate::component::{Component, ComponentType, LifecycleContext, RenderContext};
pub use crate::element::{Child, Element, ElementType, Key, create_element};
pub use crate::event::{EventHandler, StateUpdate, Updater};
pub use crate::markup::{MOUNT_ATTRIBUTE, Markup};
pub use crate::mount_id::MountId;
pub use crate::props::{PropValue, Props};
pub use crate::state::State;
pub use crate::surface::{MutationSurface, SurfaceError};

pub use core_types::{ComponentHandle, ContainerHandle};

/// `serde_json` re-export so callers can build state values without a direct dependency.
pub use serde_json::{Value, json};
