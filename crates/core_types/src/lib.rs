/// Identifies a mount container on a mutation surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerHandle(pub u64);

/// Non-owning handle to a mounted component instance.
///
/// Only used to route state updates back to the composite unit that owns the
/// instance; resolving it never extends the instance's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentHandle(pub u64);

impl ComponentHandle {
    /// Reserved sentinel for "unassigned".
    pub const INVALID: ComponentHandle = ComponentHandle(0);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}
