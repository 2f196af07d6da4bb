use super::{Reconcile, Unit, UnitHeader};
use crate::batch::Edit;
use crate::context::UpdateContext;
use crate::diff;
use crate::error::PatchError;
use std::collections::HashSet;
use std::sync::Arc;
use vdom::props::{attribute_name, event_name};
use vdom::{Child, Element, Markup, MountId, MutationSurface, PropValue, Props};

/// A native node. Owns one unit per rendered child, in current sibling order.
pub(crate) struct HostUnit {
    pub(crate) header: UnitHeader,
    tag: Arc<str>,
    element: Element,
    pub(crate) children: Vec<Unit>,
}

impl HostUnit {
    fn update_props<S: MutationSurface>(
        &self,
        prev: &Props,
        next: &Props,
        cx: &mut UpdateContext<'_, S>,
    ) {
        let id = &self.header.mount_id;

        for (name, _) in prev.iter() {
            if let Some(event) = event_name(name) {
                cx.surface.unbind_event(&event, id);
            } else if !next.contains(name) {
                cx.queue_edit(Edit::RemoveAttribute {
                    target: id.clone(),
                    name: Arc::from(attribute_name(name)),
                });
            }
        }

        for (name, value) in next.iter() {
            if let Some(event) = event_name(name) {
                if let Some(handler) = value.as_handler() {
                    cx.surface.bind_event(&event, id, handler.clone());
                }
                continue;
            }
            if prev.get(name) == Some(value) {
                continue;
            }
            let edit = match (name, value) {
                ("style", PropValue::Style(declarations)) => Edit::SetStyle {
                    target: id.clone(),
                    declarations: declarations.clone(),
                },
                ("className", value) => match value.attribute_value() {
                    Some(class) => Edit::SetClass {
                        target: id.clone(),
                        class,
                    },
                    None => Edit::RemoveAttribute {
                        target: id.clone(),
                        name: Arc::from("class"),
                    },
                },
                (name, value) => match value.attribute_value() {
                    Some(value) => Edit::SetAttribute {
                        target: id.clone(),
                        name: Arc::from(attribute_name(name)),
                        value,
                    },
                    None => Edit::RemoveAttribute {
                        target: id.clone(),
                        name: Arc::from(attribute_name(name)),
                    },
                },
            };
            log::trace!(target: "reconciler.update", "{id}: {name} changed");
            cx.queue_edit(edit);
        }
    }

    /// Reconciles the child list against `next` inside its own batch level.
    pub(crate) fn update_children<S: MutationSurface>(
        &mut self,
        next: &[Child],
        cx: &mut UpdateContext<'_, S>,
    ) -> Result<(), PatchError> {
        cx.enter();
        self.diff(next, cx)?;
        cx.leave()
    }
}

fn bind_events<S: MutationSurface>(id: &MountId, props: &Props, cx: &mut UpdateContext<'_, S>) {
    for (name, value) in props.iter() {
        if let (Some(event), Some(handler)) = (event_name(name), value.as_handler()) {
            cx.surface.bind_event(&event, id, handler.clone());
        }
    }
}

fn render_attributes(props: &Props) -> Vec<(Arc<str>, String)> {
    props
        .iter()
        .filter(|(name, _)| event_name(name).is_none())
        .filter_map(|(name, value)| {
            let value = value.attribute_value()?;
            Some((Arc::from(attribute_name(name)), value))
        })
        .collect()
}

impl Reconcile for HostUnit {
    type Source = (Arc<str>, Element);

    fn mount<S: MutationSurface>(
        (tag, element): (Arc<str>, Element),
        id: MountId,
        cx: &mut UpdateContext<'_, S>,
    ) -> (Self, Markup) {
        bind_events(&id, element.props(), cx);
        if cx.config().warn_on_duplicate_keys {
            diff::report_duplicate_keys(&id, element.children());
        }

        let mut children = Vec::with_capacity(element.children().len());
        let mut child_markup = Vec::with_capacity(element.children().len());
        let mut taken = HashSet::with_capacity(element.children().len());
        for (index, child) in element.children().iter().enumerate() {
            let child_id = diff::sibling_id(&id, &child.resolve_key(index), &mut taken);
            let (mut unit, markup) = Unit::mount(child.clone(), child_id, cx);
            unit.set_mounted_index(index);
            children.push(unit);
            child_markup.push(markup);
        }

        let markup = Markup::Element {
            id: id.clone(),
            tag: Arc::clone(&tag),
            attributes: render_attributes(element.props()),
            children: child_markup,
        };
        let unit = Self {
            header: UnitHeader::new(id),
            tag,
            element,
            children,
        };
        (unit, markup)
    }

    fn update<S: MutationSurface>(
        &mut self,
        next: Child,
        cx: &mut UpdateContext<'_, S>,
    ) -> Result<(), PatchError> {
        let next = match next {
            Child::Element(next) => next,
            other => {
                log::error!(
                    target: "reconciler.update",
                    "host {} cannot take primitive {other:?}",
                    self.header.mount_id
                );
                return Ok(());
            }
        };
        let prev = std::mem::replace(&mut self.element, next.clone());
        self.update_props(prev.props(), next.props(), cx);
        self.update_children(next.children(), cx)
    }

    fn unmount<S: MutationSurface>(&mut self, cx: &mut UpdateContext<'_, S>) {
        for (name, _) in self.element.props().iter() {
            if let Some(event) = event_name(name) {
                cx.surface.unbind_event(&event, &self.header.mount_id);
            }
        }
        for child in &mut self.children {
            child.unmount(cx);
        }
    }

    fn to_markup(&self) -> Markup {
        Markup::Element {
            id: self.header.mount_id.clone(),
            tag: Arc::clone(&self.tag),
            attributes: render_attributes(self.element.props()),
            children: self.children.iter().map(Unit::to_markup).collect(),
        }
    }

    fn current(&self) -> Child {
        Child::Element(self.element.clone())
    }

    fn header(&self) -> &UnitHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut UnitHeader {
        &mut self.header
    }
}
