use super::{Reconcile, UnitHeader};
use crate::batch::Edit;
use crate::context::UpdateContext;
use crate::error::PatchError;
use vdom::{Child, Markup, MountId, MutationSurface};

/// A string or number child, serialized inside a wrapper element that
/// carries its mount id.
pub(crate) struct TextUnit {
    header: UnitHeader,
    element: Child,
}

impl TextUnit {
    fn text(&self) -> String {
        self.element.primitive_text().unwrap_or_default()
    }
}

impl Reconcile for TextUnit {
    type Source = Child;

    fn mount<S: MutationSurface>(
        source: Child,
        id: MountId,
        _cx: &mut UpdateContext<'_, S>,
    ) -> (Self, Markup) {
        debug_assert!(source.is_primitive(), "text unit mounted from an element");
        let unit = Self {
            header: UnitHeader::new(id),
            element: source,
        };
        let markup = unit.to_markup();
        (unit, markup)
    }

    fn update<S: MutationSurface>(
        &mut self,
        next: Child,
        cx: &mut UpdateContext<'_, S>,
    ) -> Result<(), PatchError> {
        let text = next.primitive_text().unwrap_or_default();
        if text != self.text() {
            cx.queue_edit(Edit::SetText {
                target: self.header.mount_id.clone(),
                text,
            });
        }
        self.element = next;
        Ok(())
    }

    fn unmount<S: MutationSurface>(&mut self, _cx: &mut UpdateContext<'_, S>) {}

    fn to_markup(&self) -> Markup {
        Markup::Text {
            id: self.header.mount_id.clone(),
            text: self.text(),
        }
    }

    fn current(&self) -> Child {
        self.element.clone()
    }

    fn header(&self) -> &UnitHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut UnitHeader {
        &mut self.header
    }
}
