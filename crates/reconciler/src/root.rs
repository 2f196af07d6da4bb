//! Root entry point.
//!
//! A root owns the mounted tree, the runtime state threaded through every
//! update, and the surface it mirrors onto. Every root update runs inside one
//! outer batch level, so all of its mutations land in a single flush.

use crate::batch::{DiffOp, PatchStats};
use crate::config::ReconcilerConfig;
use crate::context::{Runtime, UpdateContext};
use crate::error::ReconcileError;
use crate::unit::Unit;
use vdom::{
    Child, ComponentHandle, ContainerHandle, Markup, MountId, MutationSurface, State, StateUpdate,
    Updater,
};

pub struct Root<S: MutationSurface> {
    surface: S,
    runtime: Runtime,
    container: Option<ContainerHandle>,
    unit: Option<Unit>,
}

/// Mounts `element` into `container` on a fresh root with default settings.
pub fn render<S: MutationSurface>(
    element: impl Into<Child>,
    container: ContainerHandle,
    surface: S,
) -> Result<Root<S>, ReconcileError> {
    let mut root = Root::new(surface);
    root.render(element, container)?;
    Ok(root)
}

impl<S: MutationSurface> Root<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, ReconcilerConfig::default())
    }

    pub fn with_config(surface: S, config: ReconcilerConfig) -> Self {
        Self {
            surface,
            runtime: Runtime::new(config),
            container: None,
            unit: None,
        }
    }

    /// Mounts `element` under the root id and installs its markup into
    /// `container`, replacing whatever the root had mounted before. Fires
    /// `did_mount` for every mounted component, then drains the updates
    /// those hooks requested.
    pub fn render(
        &mut self,
        element: impl Into<Child>,
        container: ContainerHandle,
    ) -> Result<Markup, ReconcileError> {
        self.unmount();
        let id = MountId::root(&self.runtime.config.root_token);
        let mut cx = UpdateContext::new(&mut self.surface, &mut self.runtime);
        let (unit, markup) = Unit::mount(element.into(), id, &mut cx);

        if let Err(err) = self.surface.install(container, &markup) {
            let mut cx = UpdateContext::new(&mut self.surface, &mut self.runtime);
            let mut unit = unit;
            unit.unmount(&mut cx);
            self.runtime.mounted.take();
            self.runtime.updater.clear();
            return Err(err.into());
        }
        log::debug!(
            target: "reconciler.lifecycle",
            "installed {} node(s) into {container:?}",
            markup.node_count()
        );
        self.unit = Some(unit);
        self.container = Some(container);
        self.settle()?;
        Ok(markup)
    }

    /// Queues a state merge for `handle` and runs it to completion.
    pub fn set_state(
        &mut self,
        handle: ComponentHandle,
        partial: State,
    ) -> Result<(), ReconcileError> {
        self.runtime.updater.set_state(handle, partial);
        self.settle()
    }

    /// Runs every update collected in `updates`, typically by an event
    /// dispatch, as one batch.
    pub fn apply(&mut self, updates: Updater) -> Result<(), ReconcileError> {
        self.runtime.updater.extend(updates);
        self.settle()
    }

    /// Releases the mounted tree and clears its container.
    pub fn unmount(&mut self) {
        let Some(mut unit) = self.unit.take() else {
            return;
        };
        let mut cx = UpdateContext::new(&mut self.surface, &mut self.runtime);
        unit.unmount(&mut cx);
        let scope = unit.mount_id().clone();
        self.surface.unbind_scope(&scope);
        self.runtime.mounted.take();
        if let Some(container) = self.container.take()
            && let Err(err) = self.surface.uninstall(container)
        {
            log::warn!(target: "reconciler.lifecycle", "could not clear {container:?}: {err}");
        }
        log::debug!(target: "reconciler.lifecycle", "unmounted {scope}");
    }

    pub fn markup(&self) -> Option<Markup> {
        self.unit.as_ref().map(Unit::to_markup)
    }

    pub fn is_mounted(&self) -> bool {
        self.unit.is_some()
    }

    pub fn container(&self) -> Option<ContainerHandle> {
        self.container
    }

    /// Live components mounted at `id`, outermost first.
    pub fn components_at(&self, id: &MountId) -> Vec<ComponentHandle> {
        let mut handles: Vec<ComponentHandle> = self
            .runtime
            .registry
            .iter()
            .filter(|(_, mounted)| *mounted == id)
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort();
        handles
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.runtime.config
    }

    pub fn stats(&self) -> PatchStats {
        self.runtime.stats
    }

    /// Structural operations of the most recent flush. Empty unless the root
    /// was configured with `record_patches`.
    pub fn last_flush(&self) -> &[DiffOp] {
        &self.runtime.last_flush
    }

    fn settle(&mut self) -> Result<(), ReconcileError> {
        loop {
            self.fire_mounted();
            if self.runtime.updater.is_empty() {
                return Ok(());
            }
            self.run_batch()?;
        }
    }

    fn fire_mounted(&mut self) {
        let Self { runtime, unit, .. } = self;
        let subscribers = runtime.mounted.take();
        let Some(unit) = unit.as_mut() else {
            return;
        };
        for handle in subscribers {
            let Some(id) = runtime.registry.get(&handle).cloned() else {
                continue;
            };
            if let Some(composite) = unit.find_composite_mut(handle, &id) {
                composite.did_mount(&mut runtime.updater);
            }
        }
    }

    fn run_batch(&mut self) -> Result<(), ReconcileError> {
        let Self {
            surface,
            runtime,
            unit,
            ..
        } = self;
        let Some(unit) = unit.as_mut() else {
            runtime.updater.clear();
            return Err(ReconcileError::NotMounted);
        };

        let mut cx = UpdateContext::new(surface, runtime);
        cx.enter();
        let result = drain_updates(unit, &mut cx)
            .and_then(|()| cx.leave().map_err(ReconcileError::from));
        if let Err(err) = &result {
            self.abandon(err);
        }
        result
    }

    /// Drops a tree whose batch failed. Its units may no longer match the
    /// surface, so updates fail with `NotMounted` until the next render.
    fn abandon(&mut self, err: &ReconcileError) {
        log::error!(target: "reconciler.update", "batch failed, unmounting the tree: {err}");
        self.runtime.queue.reset();
        self.runtime.updater.clear();
        self.unmount();
    }
}

fn drain_updates<S: MutationSurface>(
    unit: &mut Unit,
    cx: &mut UpdateContext<'_, S>,
) -> Result<(), ReconcileError> {
    let limit = cx.runtime.config.max_updates_per_batch;
    let mut processed = 0;
    while let Some(StateUpdate { target, partial }) = cx.runtime.updater.pop() {
        processed += 1;
        if processed > limit {
            log::error!(target: "reconciler.update", "update limit of {limit} exceeded");
            return Err(ReconcileError::UpdateLimit { limit });
        }
        let Some(id) = cx.runtime.registry.get(&target).cloned() else {
            log::debug!(target: "reconciler.update", "dropping update for unmounted {target:?}");
            continue;
        };
        let Some(composite) = unit.find_composite_mut(target, &id) else {
            log::debug!(target: "reconciler.update", "no component {target:?} under {id}");
            continue;
        };
        composite.set_state(partial, cx)?;
        cx.runtime.stats.state_updates += 1;
    }
    Ok(())
}
