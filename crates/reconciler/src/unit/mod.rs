//! Mounted units.
//!
//! A unit pairs the element it was last rendered from with the live state
//! needed to update it in place: text content, host children, or a component
//! instance and the unit its render output mounted as.

mod composite;
mod host;
mod text;

pub(crate) use composite::CompositeUnit;
pub(crate) use host::HostUnit;
pub(crate) use text::TextUnit;

use crate::context::UpdateContext;
use crate::error::PatchError;
use vdom::{Child, ComponentHandle, ElementType, Markup, MountId, MutationSurface};

/// Position bookkeeping shared by every unit kind.
#[derive(Clone, Debug)]
pub(crate) struct UnitHeader {
    pub(crate) mount_id: MountId,
    /// Position among the parent's children as of the last completed pass.
    pub(crate) mounted_index: usize,
}

impl UnitHeader {
    pub(crate) fn new(mount_id: MountId) -> Self {
        Self {
            mount_id,
            mounted_index: 0,
        }
    }
}

pub(crate) trait Reconcile: Sized {
    type Source;

    /// Creates the unit for `source` and returns it with its markup. Mounting
    /// never touches the surface; the markup is attached by whoever asked.
    fn mount<S: MutationSurface>(
        source: Self::Source,
        id: MountId,
        cx: &mut UpdateContext<'_, S>,
    ) -> (Self, Markup);

    /// Brings the unit in line with `next`, queueing the mutations needed.
    /// `next` has already been judged compatible with the current element.
    fn update<S: MutationSurface>(
        &mut self,
        next: Child,
        cx: &mut UpdateContext<'_, S>,
    ) -> Result<(), PatchError>;

    /// Releases bindings and registrations of the whole subtree.
    fn unmount<S: MutationSurface>(&mut self, cx: &mut UpdateContext<'_, S>);

    fn to_markup(&self) -> Markup;

    fn current(&self) -> Child;

    fn header(&self) -> &UnitHeader;

    fn header_mut(&mut self) -> &mut UnitHeader;
}

pub(crate) enum Unit {
    Text(TextUnit),
    Host(HostUnit),
    Composite(CompositeUnit),
}

impl Unit {
    pub(crate) fn mount<S: MutationSurface>(
        child: Child,
        id: MountId,
        cx: &mut UpdateContext<'_, S>,
    ) -> (Unit, Markup) {
        match child {
            Child::Text(_) | Child::Number(_) => {
                let (unit, markup) = TextUnit::mount(child, id, cx);
                (Unit::Text(unit), markup)
            }
            Child::Element(element) => match element.ty().clone() {
                ElementType::Tag(tag) => {
                    let (unit, markup) = HostUnit::mount((tag, element), id, cx);
                    (Unit::Host(unit), markup)
                }
                ElementType::Component(ty) => {
                    let (unit, markup) = CompositeUnit::mount((ty, element), id, cx);
                    (Unit::Composite(unit), markup)
                }
            },
        }
    }

    pub(crate) fn update<S: MutationSurface>(
        &mut self,
        next: Child,
        cx: &mut UpdateContext<'_, S>,
    ) -> Result<(), PatchError> {
        match self {
            Unit::Text(unit) => unit.update(next, cx),
            Unit::Host(unit) => unit.update(next, cx),
            Unit::Composite(unit) => unit.update(next, cx),
        }
    }

    pub(crate) fn unmount<S: MutationSurface>(&mut self, cx: &mut UpdateContext<'_, S>) {
        match self {
            Unit::Text(unit) => unit.unmount(cx),
            Unit::Host(unit) => unit.unmount(cx),
            Unit::Composite(unit) => unit.unmount(cx),
        }
    }

    pub(crate) fn to_markup(&self) -> Markup {
        match self {
            Unit::Text(unit) => unit.to_markup(),
            Unit::Host(unit) => unit.to_markup(),
            Unit::Composite(unit) => unit.to_markup(),
        }
    }

    pub(crate) fn current(&self) -> Child {
        match self {
            Unit::Text(unit) => unit.current(),
            Unit::Host(unit) => unit.current(),
            Unit::Composite(unit) => unit.current(),
        }
    }

    fn header(&self) -> &UnitHeader {
        match self {
            Unit::Text(unit) => unit.header(),
            Unit::Host(unit) => unit.header(),
            Unit::Composite(unit) => unit.header(),
        }
    }

    fn header_mut(&mut self) -> &mut UnitHeader {
        match self {
            Unit::Text(unit) => unit.header_mut(),
            Unit::Host(unit) => unit.header_mut(),
            Unit::Composite(unit) => unit.header_mut(),
        }
    }

    pub(crate) fn mount_id(&self) -> &MountId {
        &self.header().mount_id
    }

    pub(crate) fn mounted_index(&self) -> usize {
        self.header().mounted_index
    }

    pub(crate) fn set_mounted_index(&mut self, index: usize) {
        self.header_mut().mounted_index = index;
    }

    /// Finds the composite owning `handle`, descending only into children
    /// whose mount id is a prefix of `target`.
    pub(crate) fn find_composite_mut(
        &mut self,
        handle: ComponentHandle,
        target: &MountId,
    ) -> Option<&mut CompositeUnit> {
        match self {
            Unit::Text(_) => None,
            Unit::Composite(unit) => {
                if unit.handle() == handle {
                    Some(unit)
                } else {
                    unit.render_unit_mut().find_composite_mut(handle, target)
                }
            }
            Unit::Host(unit) => unit
                .children
                .iter_mut()
                .find(|child| target.is_within(child.mount_id()))
                .and_then(|child| child.find_composite_mut(handle, target)),
        }
    }
}

/// Whether `next` can update the unit currently rendered from `prev` in
/// place. Primitives update primitives; elements need the same type. Keys
/// are matched by the caller, so a root element whose key changes updates.
pub(crate) fn should_deep_compare(prev: &Child, next: &Child) -> bool {
    match (prev, next) {
        (Child::Element(prev), Child::Element(next)) => prev.ty() == next.ty(),
        (Child::Element(_), _) | (_, Child::Element(_)) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdom::{Props, create_element};

    #[test]
    fn primitives_compare_with_primitives_only() {
        let span = Child::from(create_element("span", Props::new(), []));
        assert!(should_deep_compare(&Child::from("a"), &Child::from(2.0)));
        assert!(!should_deep_compare(&Child::from("a"), &span));
        assert!(!should_deep_compare(&span, &Child::from("a")));
    }

    #[test]
    fn elements_compare_by_type_only() {
        let li = |key: Option<&str>| {
            let props = match key {
                Some(key) => Props::new().key(key),
                None => Props::new(),
            };
            Child::from(create_element("li", props, []))
        };
        let div = Child::from(create_element("div", Props::new(), []));
        assert!(should_deep_compare(&li(None), &li(None)));
        assert!(should_deep_compare(&li(Some("a")), &li(Some("a"))));
        assert!(should_deep_compare(&li(Some("a")), &li(Some("b"))));
        assert!(should_deep_compare(&li(Some("a")), &li(None)));
        assert!(!should_deep_compare(&li(None), &div));
    }
}
