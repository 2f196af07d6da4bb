//! Mutation surface contract.
//!
//! The reconciler never builds or inspects live nodes itself. Everything it
//! needs from the target goes through this trait, and every node is addressed
//! by its mount identity (plus child positions under a parent identity for
//! the structural operations of a patch).
//!
//! Invariants the reconciler relies on:
//! - `child_at` reads the live order as it is at the time of the call.
//! - `detach` keeps the node (and the identities of its subtree) alive until
//!   it is either re-inserted with `insert_node` or dropped with `discard`.
//! - `insert_markup`/`insert_node` insert before the child currently at
//!   `index`, or append when there is none.

use crate::event::EventHandler;
use crate::markup::Markup;
use crate::mount_id::MountId;
use core_types::ContainerHandle;
use std::fmt;
use std::sync::Arc;

pub trait MutationSurface {
    /// Handle to a live or detached node.
    type Node;

    /// Replaces the content of `container` with `markup`.
    fn install(&mut self, container: ContainerHandle, markup: &Markup) -> Result<(), SurfaceError>;

    /// Removes everything installed in `container`, releasing the identities
    /// and bindings of the removed nodes.
    fn uninstall(&mut self, container: ContainerHandle) -> Result<(), SurfaceError>;

    fn child_at(&self, parent: &MountId, index: usize) -> Result<Self::Node, SurfaceError>;

    fn detach(&mut self, node: &Self::Node) -> Result<(), SurfaceError>;

    fn discard(&mut self, node: Self::Node) -> Result<(), SurfaceError>;

    fn insert_markup(
        &mut self,
        parent: &MountId,
        index: usize,
        markup: &Markup,
    ) -> Result<(), SurfaceError>;

    fn insert_node(
        &mut self,
        parent: &MountId,
        index: usize,
        node: Self::Node,
    ) -> Result<(), SurfaceError>;

    /// Swaps the node at `target` (and its subtree) for `markup` in place.
    fn replace(&mut self, target: &MountId, markup: &Markup) -> Result<(), SurfaceError>;

    fn set_attribute(&mut self, target: &MountId, name: &str, value: &str)
    -> Result<(), SurfaceError>;

    fn remove_attribute(&mut self, target: &MountId, name: &str) -> Result<(), SurfaceError>;

    /// Replaces the inline style declarations of `target`.
    fn set_style(
        &mut self,
        target: &MountId,
        declarations: &[(Arc<str>, Arc<str>)],
    ) -> Result<(), SurfaceError>;

    fn set_class(&mut self, target: &MountId, class: &str) -> Result<(), SurfaceError>;

    fn set_text(&mut self, target: &MountId, text: &str) -> Result<(), SurfaceError>;

    /// Registers a delegated handler for `event` on the node at `scope`,
    /// replacing any handler already registered for that pair.
    fn bind_event(&mut self, event: &str, scope: &MountId, handler: EventHandler);

    fn unbind_event(&mut self, event: &str, scope: &MountId);

    /// Drops every delegated handler registered at or below `scope`.
    fn unbind_scope(&mut self, scope: &MountId);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    UnknownContainer(ContainerHandle),
    MissingNode(MountId),
    MissingChild { parent: MountId, index: usize },
    WrongNodeKind(MountId),
    DuplicateId(MountId),
    /// A node handed to `insert_node`/`discard` is still attached.
    NotDetached(MountId),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::UnknownContainer(handle) => write!(f, "unknown container {handle:?}"),
            SurfaceError::MissingNode(id) => write!(f, "no live node with mount id {id}"),
            SurfaceError::MissingChild { parent, index } => {
                write!(f, "node {parent} has no child at index {index}")
            }
            SurfaceError::WrongNodeKind(id) => write!(f, "node {id} has the wrong kind"),
            SurfaceError::DuplicateId(id) => write!(f, "mount id {id} is already in use"),
            SurfaceError::NotDetached(id) => write!(f, "node {id} is still attached"),
        }
    }
}

impl std::error::Error for SurfaceError {}
