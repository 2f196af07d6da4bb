#![allow(dead_code)]

use reconciler::{DiffOp, ReconcilerConfig, Root};
use surface::{MemorySurface, SnapshotOptions, assert_markup_eq};
use vdom::{
    Child, Component, ComponentHandle, ComponentType, ContainerHandle, Markup, MountId, Props,
    RenderContext, State, create_element,
};

pub const CONTAINER: ContainerHandle = ContainerHandle(1);

/// `"A:li"` pairs joined by spaces; the key doubles as the item's text.
pub fn encode(items: &[&str]) -> String {
    items.join(" ")
}

fn parse(items: &str) -> Vec<(&str, &str)> {
    items
        .split_whitespace()
        .map(|item| item.split_once(':').unwrap_or((item, "li")))
        .collect()
}

/// Renders a `<ul>` whose keyed children come from the `items` state entry.
pub struct KeyedList;

impl Component for KeyedList {
    fn create(_props: &Props) -> Self {
        KeyedList
    }

    fn initial_state(&self, props: &Props) -> State {
        let items = props
            .get("items")
            .and_then(|value| value.attribute_value())
            .unwrap_or_default();
        State::new().with("items", items)
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let items = cx.state().get_str("items").unwrap_or_default();
        let children = parse(items).into_iter().map(|(key, tag)| {
            Child::from(create_element(tag, Props::new().key(key), [Child::from(key)]))
        });
        Child::from(create_element("ul", Props::new(), children))
    }
}

pub fn list_element(items: &[&str]) -> Child {
    Child::from(create_element(
        ComponentType::of::<KeyedList>(),
        Props::new().with("items", encode(items).as_str()),
        [],
    ))
}

pub fn mount_list(items: &[&str], config: ReconcilerConfig) -> (Root<MemorySurface>, ComponentHandle) {
    let mut surface = MemorySurface::new();
    surface.create_container(CONTAINER);
    let mut root = Root::with_config(surface, config);
    root.render(list_element(items), CONTAINER).expect("initial render");
    let handle = root.components_at(&MountId::root("0"))[0];
    (root, handle)
}

pub fn set_items(root: &mut Root<MemorySurface>, handle: ComponentHandle, items: &[&str]) {
    root.set_state(handle, State::new().with("items", encode(items)))
        .expect("list update");
}

/// Live children of the list as `key:tag`, in surface order.
pub fn live_items(root: &Root<MemorySurface>) -> Vec<String> {
    let surface = root.surface();
    surface
        .children_ids(&MountId::root("0"))
        .expect("list node")
        .iter()
        .map(|id| {
            let node = surface.materialize_node(id).expect("child node");
            match &node {
                Markup::Element { tag, .. } => format!("{}:{tag}", node.text_content()),
                Markup::Text { text, .. } => text.clone(),
            }
        })
        .collect()
}

/// The surface holds exactly what the mounted units would serialize to.
#[track_caller]
pub fn assert_mirrors(root: &Root<MemorySurface>) {
    let live = root.surface().materialize(CONTAINER).expect("mounted tree");
    let expected = root.markup().expect("mounted root");
    assert_markup_eq(&expected, &live, SnapshotOptions::default());
}

pub fn describe(ops: &[DiffOp]) -> Vec<String> {
    ops.iter()
        .map(|op| match op {
            DiffOp::Move { from, to, .. } => format!("move {from} {to}"),
            DiffOp::Insert { to, .. } => format!("insert {to}"),
            DiffOp::Delete { from, .. } => format!("delete {from}"),
        })
        .collect()
}

/// Renders a `<p>` with one unkeyed text child per word of the `words` state.
pub struct Words;

impl Component for Words {
    fn create(_props: &Props) -> Self {
        Words
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let words = cx.state().get_str("words").unwrap_or_default();
        Child::from(create_element(
            "p",
            Props::new(),
            words.split_whitespace().map(Child::from),
        ))
    }
}

pub fn mount_words(words: &str) -> (Root<MemorySurface>, ComponentHandle) {
    let mut root = Root::new(MemorySurface::new());
    root.render(
        create_element(ComponentType::of::<Words>(), Props::new(), []),
        CONTAINER,
    )
    .expect("initial render");
    let handle = root.components_at(&MountId::root("0"))[0];
    root.set_state(handle, State::new().with("words", words))
        .expect("initial words");
    (root, handle)
}
