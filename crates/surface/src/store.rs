use crate::delegation::DelegationTable;
use core_types::ContainerHandle;
use std::collections::HashMap;
use std::sync::Arc;
use vdom::{EventHandler, Markup, MountId, MutationSurface, SurfaceError, Updater};

/// Arena index of a surface node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

/// In-memory mutation surface.
///
/// Nodes live in an arena and are addressed by mount identity. Containers are
/// parentless nodes without an identity; each holds at most one mounted root.
pub struct MemorySurface {
    arena: SurfaceArena,
    containers: HashMap<ContainerHandle, NodeKey>,
    delegation: DelegationTable,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            arena: SurfaceArena::new(),
            containers: HashMap::new(),
            delegation: DelegationTable::new(),
        }
    }

    pub fn create_container(&mut self, handle: ContainerHandle) {
        if self.containers.contains_key(&handle) {
            return;
        }
        let key = self.arena.push(NodeKind::Container, None);
        self.containers.insert(handle, key);
    }

    pub fn drop_container(&mut self, handle: ContainerHandle) {
        let Some(key) = self.containers.remove(&handle) else {
            return;
        };
        self.clear_children(key);
        self.arena.discard(key);
    }

    fn clear_children(&mut self, container: NodeKey) {
        for child in self.arena.nodes[container.0 as usize].children.clone() {
            if let Some(id) = self.arena.nodes[child.0 as usize].id.clone() {
                self.delegation.unbind_scope(&id);
            }
            self.arena.detach(child);
            self.arena.discard(child);
        }
    }

    /// Rebuilds the markup of the tree mounted in `container`.
    pub fn materialize(&self, container: ContainerHandle) -> Result<Markup, SurfaceError> {
        let key = self.container_key(container)?;
        let Some(&root) = self.arena.nodes[key.0 as usize].children.first() else {
            return Err(SurfaceError::UnknownContainer(container));
        };
        self.arena.materialize(root)
    }

    pub fn serialize(&self, container: ContainerHandle) -> Result<String, SurfaceError> {
        Ok(self.materialize(container)?.to_string())
    }

    /// Rebuilds the markup of the subtree at `id`.
    pub fn materialize_node(&self, id: &MountId) -> Result<Markup, SurfaceError> {
        let key = self.arena.lookup(id)?;
        self.arena.materialize(key)
    }

    pub fn contains(&self, id: &MountId) -> bool {
        self.arena
            .ids
            .get(id)
            .is_some_and(|key| self.arena.is_attached(*key))
    }

    pub fn children_ids(&self, parent: &MountId) -> Result<Vec<MountId>, SurfaceError> {
        let key = self.arena.lookup(parent)?;
        Ok(self.arena.nodes[key.0 as usize]
            .children
            .iter()
            .filter_map(|child| self.arena.nodes[child.0 as usize].id.clone())
            .collect())
    }

    pub fn text(&self, id: &MountId) -> Result<String, SurfaceError> {
        Ok(self.materialize_node(id)?.text_content())
    }

    pub fn attribute(&self, id: &MountId, name: &str) -> Result<Option<String>, SurfaceError> {
        let key = self.arena.lookup(id)?;
        match &self.arena.nodes[key.0 as usize].kind {
            NodeKind::Element { attributes, .. } => Ok(attributes
                .iter()
                .find(|(n, _)| &**n == name)
                .map(|(_, v)| v.clone())),
            _ => Err(SurfaceError::WrongNodeKind(id.clone())),
        }
    }

    pub fn has_binding(&self, event: &str, scope: &MountId) -> bool {
        self.delegation.contains(event, scope)
    }

    pub fn binding_count(&self) -> usize {
        self.delegation.len()
    }

    /// Runs the handlers delegated for `event` from `target` outwards, as a
    /// bubbling event would reach them. Returns how many handlers ran.
    pub fn dispatch(&self, event: &str, target: &MountId, updater: &mut Updater) -> usize {
        let handlers = self.delegation.bubble(event, target);
        log::trace!(
            target: "surface.events",
            "dispatch {event} at {target}: {} handler(s)",
            handlers.len()
        );
        for handler in &handlers {
            handler.call(updater);
        }
        handlers.len()
    }

    /// Number of nodes with a registered identity (attached or retained).
    pub fn live_node_count(&self) -> usize {
        self.arena.ids.len()
    }

    /// Number of arena records, free ones included.
    pub fn allocated_node_count(&self) -> usize {
        self.arena.nodes.len()
    }

    fn container_key(&self, container: ContainerHandle) -> Result<NodeKey, SurfaceError> {
        self.containers
            .get(&container)
            .copied()
            .ok_or(SurfaceError::UnknownContainer(container))
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationSurface for MemorySurface {
    type Node = NodeKey;

    fn install(&mut self, container: ContainerHandle, markup: &Markup) -> Result<(), SurfaceError> {
        self.create_container(container);
        let key = self.container_key(container)?;
        self.clear_children(key);
        let root = self.arena.build(markup)?;
        self.arena.attach(key, usize::MAX, root);
        Ok(())
    }

    fn uninstall(&mut self, container: ContainerHandle) -> Result<(), SurfaceError> {
        let key = self.container_key(container)?;
        self.clear_children(key);
        Ok(())
    }

    fn child_at(&self, parent: &MountId, index: usize) -> Result<NodeKey, SurfaceError> {
        let key = self.arena.lookup(parent)?;
        self.arena.nodes[key.0 as usize]
            .children
            .get(index)
            .copied()
            .ok_or_else(|| SurfaceError::MissingChild {
                parent: parent.clone(),
                index,
            })
    }

    fn detach(&mut self, node: &NodeKey) -> Result<(), SurfaceError> {
        self.arena.ensure_live(*node)?;
        self.arena.detach(*node);
        Ok(())
    }

    fn discard(&mut self, node: NodeKey) -> Result<(), SurfaceError> {
        self.arena.ensure_detached(node)?;
        self.arena.discard(node);
        Ok(())
    }

    fn insert_markup(
        &mut self,
        parent: &MountId,
        index: usize,
        markup: &Markup,
    ) -> Result<(), SurfaceError> {
        let parent_key = self.arena.lookup(parent)?;
        self.arena.ensure_element(parent_key, parent)?;
        let child = self.arena.build(markup)?;
        self.arena.attach(parent_key, index, child);
        Ok(())
    }

    fn insert_node(
        &mut self,
        parent: &MountId,
        index: usize,
        node: NodeKey,
    ) -> Result<(), SurfaceError> {
        let parent_key = self.arena.lookup(parent)?;
        self.arena.ensure_element(parent_key, parent)?;
        self.arena.ensure_detached(node)?;
        self.arena.attach(parent_key, index, node);
        Ok(())
    }

    fn replace(&mut self, target: &MountId, markup: &Markup) -> Result<(), SurfaceError> {
        let old = self.arena.lookup(target)?;
        let Some(parent) = self.arena.nodes[old.0 as usize].parent else {
            return Err(SurfaceError::MissingNode(target.clone()));
        };
        let index = self.arena.nodes[parent.0 as usize]
            .children
            .iter()
            .position(|k| *k == old)
            .ok_or_else(|| SurfaceError::MissingNode(target.clone()))?;
        self.arena.detach(old);
        self.arena.discard(old);
        let new = self.arena.build(markup)?;
        self.arena.attach(parent, index, new);
        Ok(())
    }

    fn set_attribute(
        &mut self,
        target: &MountId,
        name: &str,
        value: &str,
    ) -> Result<(), SurfaceError> {
        let attributes = self.arena.attributes_mut(target)?;
        if let Some(slot) = attributes.iter_mut().find(|(n, _)| &**n == name) {
            slot.1 = value.to_string();
        } else {
            attributes.push((Arc::from(name), value.to_string()));
        }
        Ok(())
    }

    fn remove_attribute(&mut self, target: &MountId, name: &str) -> Result<(), SurfaceError> {
        let attributes = self.arena.attributes_mut(target)?;
        attributes.retain(|(n, _)| &**n != name);
        Ok(())
    }

    fn set_style(
        &mut self,
        target: &MountId,
        declarations: &[(Arc<str>, Arc<str>)],
    ) -> Result<(), SurfaceError> {
        let style = vdom::props::style_text(declarations);
        self.set_attribute(target, "style", &style)
    }

    fn set_class(&mut self, target: &MountId, class: &str) -> Result<(), SurfaceError> {
        self.set_attribute(target, "class", class)
    }

    fn set_text(&mut self, target: &MountId, text: &str) -> Result<(), SurfaceError> {
        let key = self.arena.lookup(target)?;
        match &mut self.arena.nodes[key.0 as usize].kind {
            NodeKind::Text { text: existing } => {
                existing.clear();
                existing.push_str(text);
                Ok(())
            }
            _ => Err(SurfaceError::WrongNodeKind(target.clone())),
        }
    }

    fn bind_event(&mut self, event: &str, scope: &MountId, handler: EventHandler) {
        self.delegation.bind(event, scope, handler);
    }

    fn unbind_event(&mut self, event: &str, scope: &MountId) {
        self.delegation.unbind(event, scope);
    }

    fn unbind_scope(&mut self, scope: &MountId) {
        self.delegation.unbind_scope(scope);
    }
}

/// Discarded records go on `free` and are reused by later pushes.
struct SurfaceArena {
    nodes: Vec<NodeRecord>,
    ids: HashMap<MountId, NodeKey>,
    free: Vec<NodeKey>,
}

impl SurfaceArena {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            ids: HashMap::new(),
            free: Vec::new(),
        }
    }

    fn push(&mut self, kind: NodeKind, id: Option<MountId>) -> NodeKey {
        let record = NodeRecord {
            kind,
            id,
            parent: None,
            children: Vec::new(),
            live: true,
        };
        if let Some(key) = self.free.pop() {
            self.nodes[key.0 as usize] = record;
            return key;
        }
        let key = NodeKey(self.nodes.len() as u32);
        self.nodes.push(record);
        key
    }

    fn lookup(&self, id: &MountId) -> Result<NodeKey, SurfaceError> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| SurfaceError::MissingNode(id.clone()))
    }

    fn ensure_live(&self, key: NodeKey) -> Result<(), SurfaceError> {
        match self.nodes.get(key.0 as usize) {
            Some(record) if record.live => Ok(()),
            Some(record) => Err(SurfaceError::MissingNode(record.display_id())),
            None => Err(SurfaceError::MissingNode(MountId::from("?"))),
        }
    }

    fn ensure_detached(&self, key: NodeKey) -> Result<(), SurfaceError> {
        self.ensure_live(key)?;
        let record = &self.nodes[key.0 as usize];
        if record.parent.is_some() {
            return Err(SurfaceError::NotDetached(record.display_id()));
        }
        Ok(())
    }

    fn ensure_element(&self, key: NodeKey, id: &MountId) -> Result<(), SurfaceError> {
        if !self.nodes[key.0 as usize].allows_children() {
            return Err(SurfaceError::WrongNodeKind(id.clone()));
        }
        Ok(())
    }

    fn is_attached(&self, key: NodeKey) -> bool {
        let mut current = key;
        loop {
            let record = &self.nodes[current.0 as usize];
            if !record.live {
                return false;
            }
            match record.parent {
                Some(parent) => current = parent,
                None => return matches!(record.kind, NodeKind::Container),
            }
        }
    }

    /// Creates the nodes of `markup`, registering every identity it carries.
    fn build(&mut self, markup: &Markup) -> Result<NodeKey, SurfaceError> {
        if self.ids.contains_key(markup.id()) {
            return Err(SurfaceError::DuplicateId(markup.id().clone()));
        }
        let key = match markup {
            Markup::Text { id, text } => {
                self.push(NodeKind::Text { text: text.clone() }, Some(id.clone()))
            }
            Markup::Element {
                id,
                tag,
                attributes,
                ..
            } => self.push(
                NodeKind::Element {
                    tag: Arc::clone(tag),
                    attributes: attributes.clone(),
                },
                Some(id.clone()),
            ),
        };
        self.ids.insert(markup.id().clone(), key);
        for child in markup.children() {
            let child_key = self.build(child)?;
            self.attach(key, usize::MAX, child_key);
        }
        Ok(key)
    }

    /// Inserts before the child at `index`, or appends when there is none.
    fn attach(&mut self, parent: NodeKey, index: usize, child: NodeKey) {
        let siblings = &mut self.nodes[parent.0 as usize].children;
        if index < siblings.len() {
            siblings.insert(index, child);
        } else {
            siblings.push(child);
        }
        self.nodes[child.0 as usize].parent = Some(parent);
    }

    fn detach(&mut self, key: NodeKey) {
        if let Some(parent) = self.nodes[key.0 as usize].parent.take() {
            self.nodes[parent.0 as usize].children.retain(|k| *k != key);
        }
    }

    fn discard(&mut self, key: NodeKey) {
        let record = &mut self.nodes[key.0 as usize];
        if !record.live {
            return;
        }
        record.live = false;
        record.kind = NodeKind::Container;
        let children = std::mem::take(&mut record.children);
        if let Some(id) = record.id.take() {
            if self.ids.get(&id) == Some(&key) {
                self.ids.remove(&id);
            }
        }
        for child in children {
            self.nodes[child.0 as usize].parent = None;
            self.discard(child);
        }
        self.free.push(key);
    }

    fn attributes_mut(
        &mut self,
        target: &MountId,
    ) -> Result<&mut Vec<(Arc<str>, String)>, SurfaceError> {
        let key = self.lookup(target)?;
        match &mut self.nodes[key.0 as usize].kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            _ => Err(SurfaceError::WrongNodeKind(target.clone())),
        }
    }

    fn materialize(&self, key: NodeKey) -> Result<Markup, SurfaceError> {
        let record = &self.nodes[key.0 as usize];
        let id = record
            .id
            .clone()
            .ok_or_else(|| SurfaceError::MissingNode(MountId::from("?")))?;
        match &record.kind {
            NodeKind::Text { text } => Ok(Markup::Text {
                id,
                text: text.clone(),
            }),
            NodeKind::Element { tag, attributes } => {
                let children = record
                    .children
                    .iter()
                    .map(|child| self.materialize(*child))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Markup::Element {
                    id,
                    tag: Arc::clone(tag),
                    attributes: attributes.clone(),
                    children,
                })
            }
            NodeKind::Container => Err(SurfaceError::WrongNodeKind(id)),
        }
    }
}

struct NodeRecord {
    kind: NodeKind,
    id: Option<MountId>,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    live: bool,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Container | NodeKind::Element { .. })
    }

    fn display_id(&self) -> MountId {
        self.id.clone().unwrap_or_else(|| MountId::from("?"))
    }
}

enum NodeKind {
    Container,
    Element {
        tag: Arc<str>,
        attributes: Vec<(Arc<str>, String)>,
    },
    Text {
        text: String,
    },
}
