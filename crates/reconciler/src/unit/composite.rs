use super::{Reconcile, Unit, UnitHeader, should_deep_compare};
use crate::batch::Edit;
use crate::context::UpdateContext;
use crate::error::PatchError;
use crate::instance::ComponentInstance;
use vdom::{
    Child, ComponentHandle, ComponentType, Element, Markup, MountId, MutationSurface, State,
    Updater,
};

/// A user component. Shares its mount id with the unit its render output
/// mounted as, so the composite itself never owns a surface node.
pub(crate) struct CompositeUnit {
    header: UnitHeader,
    element: Element,
    instance: ComponentInstance,
    render_unit: Box<Unit>,
}

impl CompositeUnit {
    pub(crate) fn handle(&self) -> ComponentHandle {
        self.instance.handle()
    }

    pub(crate) fn render_unit_mut(&mut self) -> &mut Unit {
        &mut self.render_unit
    }

    pub(crate) fn did_mount(&mut self, updater: &mut Updater) {
        log::trace!(
            target: "reconciler.lifecycle",
            "did_mount {} at {}",
            self.instance.name(),
            self.header.mount_id
        );
        self.instance.did_mount(updater);
    }

    /// Merges `partial` into the state and re-renders.
    pub(crate) fn set_state<S: MutationSurface>(
        &mut self,
        partial: State,
        cx: &mut UpdateContext<'_, S>,
    ) -> Result<(), PatchError> {
        self.receive(None, Some(partial), cx)
    }

    fn receive<S: MutationSurface>(
        &mut self,
        next: Option<Element>,
        partial: Option<State>,
        cx: &mut UpdateContext<'_, S>,
    ) -> Result<(), PatchError> {
        if let Some(next) = next {
            self.instance.props = next.props().clone();
            self.element = next;
        }
        if let Some(partial) = partial {
            self.instance.state.merge(partial);
        }
        if !self.instance.should_update() {
            log::trace!(
                target: "reconciler.update",
                "{} at {} declined update",
                self.instance.name(),
                self.header.mount_id
            );
            return Ok(());
        }

        let rendered = self.instance.render();
        if should_deep_compare(&self.render_unit.current(), &rendered) {
            self.render_unit.update(rendered, cx)?;
            self.instance.did_update(&mut cx.runtime.updater);
        } else {
            let id = self.header.mount_id.clone();
            log::debug!(
                target: "reconciler.update",
                "{} at {id} rendered a different root, replacing",
                self.instance.name()
            );
            self.render_unit.unmount(cx);
            let (unit, markup) = Unit::mount(rendered, id.clone(), cx);
            cx.queue_edit(Edit::Replace { target: id, markup });
            *self.render_unit = unit;
        }
        Ok(())
    }
}

impl Reconcile for CompositeUnit {
    type Source = (ComponentType, Element);

    fn mount<S: MutationSurface>(
        (ty, element): (ComponentType, Element),
        id: MountId,
        cx: &mut UpdateContext<'_, S>,
    ) -> (Self, Markup) {
        let handle = cx.runtime.register(&id);
        let mut instance = ComponentInstance::new(ty, element.props().clone(), handle);
        instance.will_mount(&mut cx.runtime.updater);

        let (render_unit, markup) = Unit::mount(instance.render(), id.clone(), cx);
        cx.runtime.mounted.subscribe(handle);
        log::trace!(target: "reconciler.lifecycle", "mounted {} at {id}", ty.name());

        let unit = Self {
            header: UnitHeader::new(id),
            element,
            instance,
            render_unit: Box::new(render_unit),
        };
        (unit, markup)
    }

    fn update<S: MutationSurface>(
        &mut self,
        next: Child,
        cx: &mut UpdateContext<'_, S>,
    ) -> Result<(), PatchError> {
        match next {
            Child::Element(next) => self.receive(Some(next), None, cx),
            other => {
                log::error!(
                    target: "reconciler.update",
                    "component {} cannot take primitive {other:?}",
                    self.header.mount_id
                );
                Ok(())
            }
        }
    }

    fn unmount<S: MutationSurface>(&mut self, cx: &mut UpdateContext<'_, S>) {
        cx.runtime.unregister(self.instance.handle());
        self.render_unit.unmount(cx);
    }

    fn to_markup(&self) -> Markup {
        self.render_unit.to_markup()
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
