mod common;

use common::{CONTAINER, assert_mirrors, list_element, live_items, mount_list};
use reconciler::{ReconcileError, ReconcilerConfig, Root};
use std::cell::RefCell;
use surface::MemorySurface;
use vdom::{
    Child, Component, ComponentHandle, ComponentType, ContainerHandle, EventHandler,
    LifecycleContext, MountId, Props, RenderContext, State, SurfaceError, Updater, create_element,
};

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record(event: impl Into<String>) {
    EVENTS.with(|events| events.borrow_mut().push(event.into()));
}

fn take_events() -> Vec<String> {
    EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
}

fn mount(element: vdom::Element) -> Root<MemorySurface> {
    let mut root = Root::new(MemorySurface::new());
    root.render(element, CONTAINER).expect("initial render");
    root
}

fn handle_at(root: &Root<MemorySurface>, id: &str) -> ComponentHandle {
    root.components_at(&MountId::from(id))[0]
}

fn text(root: &Root<MemorySurface>, id: &str) -> String {
    root.surface().text(&MountId::from(id)).unwrap()
}

struct Inner {
    label: String,
}

impl Component for Inner {
    fn create(props: &Props) -> Self {
        let label = props
            .get("label")
            .and_then(|value| value.attribute_value())
            .unwrap_or_default();
        Inner { label }
    }

    fn will_mount(&mut self, _cx: &mut LifecycleContext<'_>) {
        record(format!("will_mount inner:{}", self.label));
    }

    fn did_mount(&mut self, _cx: &mut LifecycleContext<'_>) {
        record(format!("did_mount inner:{}", self.label));
    }

    fn did_update(&mut self, cx: &mut LifecycleContext<'_>) {
        let label = cx
            .props()
            .get("label")
            .and_then(|value| value.attribute_value())
            .unwrap_or_default();
        record(format!("did_update inner:{label}"));
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let label = cx
            .props()
            .get("label")
            .and_then(|value| value.attribute_value())
            .unwrap_or_default();
        Child::from(create_element("em", Props::new(), [Child::from(label)]))
    }
}

fn inner(key: &str, label: &str) -> Child {
    Child::from(create_element(
        ComponentType::of::<Inner>(),
        Props::new().key(key).with("label", label),
        [],
    ))
}

struct Outer;

impl Component for Outer {
    fn create(_props: &Props) -> Self {
        Outer
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("show_b", true).with("suffix", "")
    }

    fn will_mount(&mut self, _cx: &mut LifecycleContext<'_>) {
        record("will_mount outer");
    }

    fn did_mount(&mut self, _cx: &mut LifecycleContext<'_>) {
        record("did_mount outer");
    }

    fn did_update(&mut self, _cx: &mut LifecycleContext<'_>) {
        record("did_update outer");
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let suffix = cx.state().get_str("suffix").unwrap_or_default();
        let mut children = vec![inner("a", &format!("a{suffix}"))];
        if cx.state().get_bool("show_b").unwrap_or(false) {
            children.push(inner("b", &format!("b{suffix}")));
        }
        Child::from(create_element("div", Props::new(), children))
    }
}

fn outer() -> vdom::Element {
    create_element(ComponentType::of::<Outer>(), Props::new(), [])
}

#[test]
fn mount_hooks_run_parent_first_then_children_first() {
    let root = mount(outer());
    assert_eq!(
        take_events(),
        [
            "will_mount outer",
            "will_mount inner:a",
            "will_mount inner:b",
            "did_mount inner:a",
            "did_mount inner:b",
            "did_mount outer",
        ]
    );
    assert_eq!(text(&root, "0"), "ab");
    assert_mirrors(&root);
}

#[test]
fn updates_reach_children_and_never_remount() {
    let mut root = mount(outer());
    take_events();
    let handle = handle_at(&root, "0");

    root.set_state(handle, State::new().with("suffix", "!")).unwrap();
    assert_eq!(
        take_events(),
        ["did_update inner:a!", "did_update inner:b!", "did_update outer"]
    );
    assert_eq!(text(&root, "0"), "a!b!");
    assert_mirrors(&root);
}

#[test]
fn remounted_child_gets_its_own_did_mount() {
    let mut root = mount(outer());
    let handle = handle_at(&root, "0");
    let first_b = handle_at(&root, "0.$b");

    root.set_state(handle, State::new().with("show_b", false)).unwrap();
    take_events();
    root.set_state(handle, State::new().with("show_b", true)).unwrap();
    let events = take_events();
    assert!(events.contains(&"will_mount inner:b".to_string()));
    assert_eq!(
        events.iter().filter(|e| e.starts_with("did_mount")).collect::<Vec<_>>(),
        ["did_mount inner:b"]
    );

    let second_b = handle_at(&root, "0.$b");
    assert_ne!(first_b, second_b);
    assert_mirrors(&root);
}

struct Gate;

impl Component for Gate {
    fn create(_props: &Props) -> Self {
        Gate
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("label", "open").with("frozen", false)
    }

    fn should_update(&self, _next_props: &Props, next_state: &State) -> bool {
        !next_state.get_bool("frozen").unwrap_or(false)
    }

    fn did_update(&mut self, _cx: &mut LifecycleContext<'_>) {
        record("did_update gate");
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let label = cx.state().get_str("label").unwrap_or_default();
        Child::from(create_element("span", Props::new(), [Child::from(label)]))
    }
}

#[test]
fn should_update_veto_skips_render_but_keeps_state() {
    let mut root = mount(create_element(ComponentType::of::<Gate>(), Props::new(), []));
    let handle = handle_at(&root, "0");
    take_events();

    root.set_state(handle, State::new().with("frozen", true).with("label", "shut"))
        .unwrap();
    assert_eq!(text(&root, "0"), "open");
    assert!(take_events().is_empty());

    root.set_state(handle, State::new().with("frozen", false)).unwrap();
    assert_eq!(text(&root, "0"), "shut");
    assert_eq!(take_events(), ["did_update gate"]);
}

struct Cascade;

impl Component for Cascade {
    fn create(_props: &Props) -> Self {
        Cascade
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("n", 0)
    }

    fn did_update(&mut self, cx: &mut LifecycleContext<'_>) {
        if cx.state().get_i64("n") == Some(1) {
            cx.set_state(State::new().with("n", 2));
        }
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let n = cx.state().get_i64("n").unwrap_or_default();
        let items = (0..n).map(|i| {
            Child::from(create_element(
                "li",
                Props::new().key(i.to_string()),
                [Child::from(i)],
            ))
        });
        Child::from(create_element("ol", Props::new(), items))
    }
}

#[test]
fn update_requested_from_a_hook_shares_the_flush() {
    let mut root = mount(create_element(ComponentType::of::<Cascade>(), Props::new(), []));
    let handle = handle_at(&root, "0");
    let before = root.stats();

    root.set_state(handle, State::new().with("n", 1)).unwrap();
    let after = root.stats();
    assert_eq!(after.flushes, before.flushes + 1);
    assert_eq!(after.state_updates, before.state_updates + 2);
    assert_eq!(text(&root, "0"), "01");
    assert_mirrors(&root);
}

struct Eager;

impl Component for Eager {
    fn create(_props: &Props) -> Self {
        Eager
    }

    fn will_mount(&mut self, cx: &mut LifecycleContext<'_>) {
        cx.set_state(State::new().with("ready", true));
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let ready = cx.state().get_bool("ready").unwrap_or(false);
        Child::from(if ready { "ready" } else { "pending" })
    }
}

#[test]
fn state_set_before_mount_lands_after_install() {
    let root = mount(create_element(ComponentType::of::<Eager>(), Props::new(), []));
    assert_eq!(text(&root, "0"), "ready");
    assert_eq!(root.stats().flushes, 1);
}

struct Counter;

impl Component for Counter {
    fn create(_props: &Props) -> Self {
        Counter
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("count", 0)
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let count = cx.state().get_i64("count").unwrap_or_default();
        let handle = cx.handle();
        let increment = EventHandler::new(move |updater: &mut Updater| {
            updater.set_state(handle, State::new().with("count", count + 1));
        });
        Child::from(create_element(
            "div",
            Props::new(),
            [
                Child::from(create_element(
                    "button",
                    Props::new().on("onClick", increment),
                    [Child::from("+")],
                )),
                Child::from(create_element("span", Props::new(), [Child::from(count)])),
            ],
        ))
    }
}

#[test]
fn delegated_click_updates_the_counter() {
    let mut root = mount(create_element(ComponentType::of::<Counter>(), Props::new(), []));
    let button = MountId::from("0.0");
    assert!(root.surface().has_binding("click", &button));

    for expected in ["1", "2"] {
        let mut updates = Updater::new();
        // From the button's text node; the click bubbles to the button.
        let ran = root
            .surface()
            .dispatch("click", &MountId::from("0.0.0"), &mut updates);
        assert_eq!(ran, 1);
        root.apply(updates).unwrap();
        assert_eq!(text(&root, "0.1"), expected);
    }
    assert_eq!(root.surface().binding_count(), 1);
    assert_mirrors(&root);
}

struct Toggle;

impl Component for Toggle {
    fn create(_props: &Props) -> Self {
        Toggle
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("on", true)
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let on = cx.state().get_bool("on").unwrap_or(false);
        let tag = if on { "section" } else { "aside" };
        let props = if on {
            Props::new().on("onClick", EventHandler::new(|_| {}))
        } else {
            Props::new()
        };
        Child::from(create_element(tag, props, [inner("k", tag)]))
    }
}

#[test]
fn different_root_tag_replaces_the_subtree() {
    let mut root = mount(create_element(ComponentType::of::<Toggle>(), Props::new(), []));
    let toggle = handle_at(&root, "0");
    let old_inner = handle_at(&root, "0.$k");
    assert_eq!(root.surface().binding_count(), 1);

    root.set_state(toggle, State::new().with("on", false)).unwrap();
    let markup = root.surface().materialize(CONTAINER).unwrap();
    assert!(markup.to_string().starts_with("<aside"));
    assert_eq!(text(&root, "0"), "aside");
    assert_eq!(root.surface().binding_count(), 0);
    assert_ne!(handle_at(&root, "0.$k"), old_inner);

    // Updates addressed to the unmounted instance are dropped.
    root.set_state(old_inner, State::new().with("x", 1)).unwrap();
    assert_mirrors(&root);
}

struct Styled;

impl Component for Styled {
    fn create(_props: &Props) -> Self {
        Styled
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("alert", false)
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let props = if cx.state().get_bool("alert").unwrap_or(false) {
            Props::new()
                .class_name("alert")
                .style([("backgroundColor", "red")])
        } else {
            Props::new().class_name("calm").with("title", "quiet")
        };
        Child::from(create_element("div", props, [Child::from("msg")]))
    }
}

#[test]
fn attribute_class_and_style_changes_are_patched() {
    let mut root = mount(create_element(ComponentType::of::<Styled>(), Props::new(), []));
    let handle = handle_at(&root, "0");
    let id = MountId::from("0");

    root.set_state(handle, State::new().with("alert", true)).unwrap();
    let surface = root.surface();
    assert_eq!(surface.attribute(&id, "class").unwrap().as_deref(), Some("alert"));
    assert_eq!(
        surface.attribute(&id, "style").unwrap().as_deref(),
        Some("background-color:red")
    );
    assert_eq!(surface.attribute(&id, "title").unwrap(), None);
    assert_mirrors(&root);
}

struct Runaway;

impl Component for Runaway {
    fn create(_props: &Props) -> Self {
        Runaway
    }

    fn did_update(&mut self, cx: &mut LifecycleContext<'_>) {
        let n = cx.state().get_i64("n").unwrap_or_default();
        cx.set_state(State::new().with("n", n + 1));
    }

    fn render(&self, _cx: &RenderContext<'_>) -> Child {
        Child::from("loop")
    }
}

#[test]
fn endless_update_cascade_hits_the_limit() {
    let config = ReconcilerConfig {
        max_updates_per_batch: 8,
        ..ReconcilerConfig::default()
    };
    let mut root = Root::with_config(MemorySurface::new(), config);
    root.render(
        create_element(ComponentType::of::<Runaway>(), Props::new(), []),
        CONTAINER,
    )
    .unwrap();
    let handle = handle_at(&root, "0");

    let err = root.set_state(handle, State::new().with("n", 0)).unwrap_err();
    assert_eq!(err, ReconcileError::UpdateLimit { limit: 8 });
    assert!(!root.is_mounted());
    let err = root.set_state(handle, State::new().with("n", 0)).unwrap_err();
    assert_eq!(err, ReconcileError::NotMounted);
}

#[test]
fn failed_flush_unmounts_until_rendered_again() {
    let (mut root, handle) = mount_list(&["A:li"], ReconcilerConfig::default());
    // Nodes removed behind the root's back make the next flush fail.
    root.surface_mut().drop_container(CONTAINER);

    let err = root
        .set_state(handle, State::new().with("items", "A:li B:li"))
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Patch(_)));
    assert!(!root.is_mounted());
    assert_eq!(root.container(), None);
    assert!(root.components_at(&MountId::from("0")).is_empty());

    let err = root
        .set_state(handle, State::new().with("items", "B:li"))
        .unwrap_err();
    assert_eq!(err, ReconcileError::NotMounted);

    root.render(list_element(&["C:li"]), CONTAINER).unwrap();
    assert_eq!(live_items(&root), ["C:li"]);
    assert_mirrors(&root);
}

#[test]
fn render_again_replaces_the_mounted_tree() {
    let mut root = mount(outer());
    let old = handle_at(&root, "0");
    root.render(create_element(ComponentType::of::<Gate>(), Props::new(), []), CONTAINER)
        .unwrap();

    assert_eq!(text(&root, "0"), "open");
    assert_ne!(handle_at(&root, "0"), old);
    assert!(root.components_at(&MountId::from("0.$a")).is_empty());
    assert_mirrors(&root);
}

#[test]
fn updates_without_a_tree_fail() {
    let mut root = Root::new(MemorySurface::new());
    let err = root
        .set_state(ComponentHandle(1), State::new().with("n", 1))
        .unwrap_err();
    assert_eq!(err, ReconcileError::NotMounted);
}

#[test]
fn render_into_another_container_clears_the_first() {
    let mut root = mount(outer());
    let other = ContainerHandle(2);
    root.render(create_element(ComponentType::of::<Gate>(), Props::new(), []), other)
        .unwrap();

    assert_eq!(root.container(), Some(other));
    assert!(matches!(
        root.surface().materialize(CONTAINER),
        Err(SurfaceError::UnknownContainer(_))
    ));
    assert_eq!(text(&root, "0"), "open");
    assert_eq!(root.surface().materialize(other).ok(), root.markup());

    root.unmount();
    assert!(!root.is_mounted());
    assert_eq!(root.surface().live_node_count(), 0);
}

struct Rekeyed;

impl Component for Rekeyed {
    fn create(_props: &Props) -> Self {
        Rekeyed
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("key", "a").with("label", "x")
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let key = cx.state().get_str("key").unwrap_or_default();
        let label = cx.state().get_str("label").unwrap_or_default();
        Child::from(create_element("div", Props::new().key(key), [inner("k", label)]))
    }
}

#[test]
fn root_element_with_new_key_updates_in_place() {
    let mut root = mount(create_element(ComponentType::of::<Rekeyed>(), Props::new(), []));
    let handle = handle_at(&root, "0");
    let child = handle_at(&root, "0.$k");
    take_events();

    root.set_state(handle, State::new().with("key", "b").with("label", "y"))
        .unwrap();
    assert_eq!(take_events(), ["did_update inner:y"]);
    assert_eq!(handle_at(&root, "0.$k"), child);
    assert_eq!(text(&root, "0"), "y");
    assert_mirrors(&root);
}

struct Item;

impl Component for Item {
    fn create(_props: &Props) -> Self {
        Item
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("count", 0)
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let label = cx
            .props()
            .get("label")
            .and_then(|value| value.attribute_value())
            .unwrap_or_default();
        let count = cx.state().get_i64("count").unwrap_or_default();
        Child::from(create_element(
            "li",
            Props::new(),
            [Child::from(format!("{label}:{count}"))],
        ))
    }
}

struct Shelf;

impl Component for Shelf {
    fn create(_props: &Props) -> Self {
        Shelf
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("order", "a b c")
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let order = cx.state().get_str("order").unwrap_or_default();
        let items = order.split_whitespace().map(|key| {
            Child::from(create_element(
                ComponentType::of::<Item>(),
                Props::new().key(key).with("label", key),
                [],
            ))
        });
        Child::from(create_element("ul", Props::new(), items))
    }
}

#[test]
fn moved_components_keep_their_state_and_stay_addressable() {
    let mut root = mount(create_element(ComponentType::of::<Shelf>(), Props::new(), []));
    let shelf = handle_at(&root, "0");
    let [a, b, c] = ["0.$a", "0.$b", "0.$c"].map(|id| handle_at(&root, id));

    root.set_state(b, State::new().with("count", 5)).unwrap();
    assert_eq!(text(&root, "0.$b"), "b:5");

    let moves = root.stats().moves;
    root.set_state(shelf, State::new().with("order", "c b a")).unwrap();
    assert!(root.stats().moves > moves);
    assert_eq!(
        root.surface().children_ids(&MountId::from("0")).unwrap(),
        ["0.$c", "0.$b", "0.$a"].map(MountId::from)
    );
    assert_eq!([a, b, c], ["0.$a", "0.$b", "0.$c"].map(|id| handle_at(&root, id)));
    assert_eq!(text(&root, "0"), "c:0b:5a:0");

    root.set_state(b, State::new().with("count", 6)).unwrap();
    root.set_state(a, State::new().with("count", 1)).unwrap();
    assert_eq!(text(&root, "0"), "c:0b:6a:1");
    assert_mirrors(&root);
}

struct Wrapper;

impl Component for Wrapper {
    fn create(_props: &Props) -> Self {
        Wrapper
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("swapped", false)
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        if cx.state().get_bool("swapped").unwrap_or(false) {
            Child::from(create_element(
                ComponentType::of::<Inner>(),
                Props::new().with("label", "other"),
                [],
            ))
        } else {
            Child::from(create_element(ComponentType::of::<Gate>(), Props::new(), []))
        }
    }
}

#[test]
fn component_rendering_a_component_updates_and_replaces_it() {
    let mut root = mount(create_element(ComponentType::of::<Wrapper>(), Props::new(), []));
    let id = MountId::from("0");
    let handles = root.components_at(&id);
    assert_eq!(handles.len(), 2);
    let (wrapper, gate) = (handles[0], handles[1]);

    root.set_state(gate, State::new().with("label", "shut")).unwrap();
    assert_eq!(text(&root, "0"), "shut");
    assert_eq!(root.components_at(&id), [wrapper, gate]);
    take_events();

    root.set_state(wrapper, State::new().with("swapped", true)).unwrap();
    let handles = root.components_at(&id);
    assert_eq!(handles.len(), 2);
    assert_eq!(handles[0], wrapper);
    assert_ne!(handles[1], gate);
    assert_eq!(
        take_events(),
        ["will_mount inner:other", "did_mount inner:other"]
    );
    assert_eq!(text(&root, "0"), "other");

    // The replaced instance no longer receives updates.
    root.set_state(gate, State::new().with("label", "stale")).unwrap();
    assert_eq!(text(&root, "0"), "other");
    assert_mirrors(&root);
}
