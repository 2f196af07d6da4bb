#![no_main]

use libfuzzer_sys::fuzz_target;
use reconciler::Root;
use surface::MemorySurface;
use vdom::{
    Child, Component, ComponentType, ContainerHandle, MountId, Props, RenderContext, State,
    create_element,
};

const CONTAINER: ContainerHandle = ContainerHandle(1);
const MAX_LISTS: usize = 32;
const SEPARATOR: u8 = 0xff;
const KEYS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];
const TAGS: [&str; 2] = ["li", "p"];

struct List;

impl Component for List {
    fn create(_props: &Props) -> Self {
        List
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let items = cx.state().get_str("items").unwrap_or_default();
        let children = items.split_whitespace().map(|item| {
            let (key, tag) = item.split_once(':').unwrap_or((item, "li"));
            Child::from(create_element(tag, Props::new().key(key), [Child::from(key)]))
        });
        Child::from(create_element("ul", Props::new(), children))
    }
}

/// One list per separator-delimited chunk. Each byte picks a key (low bits)
/// and a tag (bit 3). Keys may repeat.
fn decode(chunk: &[u8]) -> Vec<String> {
    let mut items = Vec::new();
    for byte in chunk {
        let key = usize::from(byte & 0x07);
        let tag = TAGS[usize::from((byte >> 3) & 1)];
        items.push(format!("{}:{tag}", KEYS[key]));
    }
    items
}

fuzz_target!(|data: &[u8]| {
    let mut root = Root::new(MemorySurface::new());
    if root
        .render(
            create_element(ComponentType::of::<List>(), Props::new(), []),
            CONTAINER,
        )
        .is_err()
    {
        return;
    }
    let handle = root.components_at(&MountId::root("0"))[0];

    for chunk in data.split(|byte| *byte == SEPARATOR).take(MAX_LISTS) {
        let items = decode(chunk);
        root.set_state(handle, State::new().with("items", items.join(" ")))
            .expect("keyed update applies cleanly");

        let live: Vec<String> = root
            .surface()
            .children_ids(&MountId::root("0"))
            .expect("list node")
            .iter()
            .map(|id| {
                let node = root.surface().materialize_node(id).expect("child");
                format!("{}:{}", node.text_content(), tag_of(&node))
            })
            .collect();
        assert_eq!(live, items);
        assert_eq!(
            root.surface().materialize(CONTAINER).ok(),
            root.markup(),
            "surface diverged from mounted units"
        );
    }
});

fn tag_of(node: &vdom::Markup) -> &str {
    match node {
        vdom::Markup::Element { tag, .. } => tag,
        vdom::Markup::Text { .. } => "#text",
    }
}
