use vdom::{
    Child, Component, ComponentHandle, ComponentType, LifecycleContext, Props, RenderContext,
    State, Updater,
};

/// A live component: the user object plus the props and state the runtime
/// keeps for it.
pub(crate) struct ComponentInstance {
    handle: ComponentHandle,
    ty: ComponentType,
    component: Box<dyn Component>,
    pub(crate) props: Props,
    pub(crate) state: State,
}

impl ComponentInstance {
    pub(crate) fn new(ty: ComponentType, props: Props, handle: ComponentHandle) -> Self {
        let component = ty.instantiate(&props);
        let state = component.initial_state(&props);
        Self {
            handle,
            ty,
            component,
            props,
            state,
        }
    }

    pub(crate) fn handle(&self) -> ComponentHandle {
        self.handle
    }

    pub(crate) fn name(&self) -> &'static str {
        self.ty.name()
    }

    pub(crate) fn render(&self) -> Child {
        self.component
            .render(&RenderContext::new(self.handle, &self.props, &self.state))
    }

    pub(crate) fn should_update(&self) -> bool {
        self.component.should_update(&self.props, &self.state)
    }

    pub(crate) fn will_mount(&mut self, updater: &mut Updater) {
        let mut cx = LifecycleContext::new(self.handle, &self.props, &self.state, updater);
        self.component.will_mount(&mut cx);
    }

    pub(crate) fn did_mount(&mut self, updater: &mut Updater) {
        let mut cx = LifecycleContext::new(self.handle, &self.props, &self.state, updater);
        self.component.did_mount(&mut cx);
    }

    pub(crate) fn did_update(&mut self, updater: &mut Updater) {
        let mut cx = LifecycleContext::new(self.handle, &self.props, &self.state, updater);
        self.component.did_update(&mut cx);
    }
}
