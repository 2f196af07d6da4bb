use mimalloc::MiMalloc;
use reconciler::{ReconcilerConfig, Root};
use surface::MemorySurface;
use vdom::{
    Child, Component, ComponentType, ContainerHandle, EventHandler, LifecycleContext, MountId,
    Props, RenderContext, State, Updater, create_element,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const CONTAINER: ContainerHandle = ContainerHandle(1);

struct Counter;

fn item(tag: &str, key: &str) -> Child {
    Child::from(create_element(tag, Props::new().key(key), [Child::from(key)]))
}

impl Component for Counter {
    fn create(_props: &Props) -> Self {
        Counter
    }

    fn initial_state(&self, _props: &Props) -> State {
        State::new().with("number", 0)
    }

    fn will_mount(&mut self, _cx: &mut LifecycleContext<'_>) {
        log::info!("counter mounting");
    }

    fn did_update(&mut self, cx: &mut LifecycleContext<'_>) {
        log::info!("counter updated to {}", cx.state().get_i64("number").unwrap_or_default());
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let number = cx.state().get_i64("number").unwrap_or_default();
        let handle = cx.handle();
        let click = EventHandler::new(move |updater: &mut Updater| {
            updater.set_state(handle, State::new().with("number", number + 1));
        });
        let button = create_element(
            "div",
            Props::new()
                .with("id", "btn")
                .class_name("supername")
                .style([("color", "#000"), ("backgroundColor", "red")])
                .on("onClick", click),
            [
                Child::from("click me "),
                Child::from(create_element("b", Props::new(), [Child::from(number)])),
            ],
        );
        let list = if number == 0 {
            create_element(
                "ul",
                Props::new(),
                [item("li", "A"), item("li", "B"), item("li", "C"), item("li", "D")],
            )
        } else {
            create_element(
                "ul",
                Props::new(),
                [
                    item("li", "A"),
                    item("li", "C"),
                    item("span", "B"),
                    item("li", "E"),
                    item("li", "F"),
                ],
            )
        };
        Child::from(create_element(
            "div",
            Props::new(),
            [Child::from(button), Child::from(list)],
        ))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut root = Root::with_config(MemorySurface::new(), ReconcilerConfig::recording());
    root.render(
        create_element(ComponentType::of::<Counter>(), Props::new(), []),
        CONTAINER,
    )?;
    println!("{}", root.surface().serialize(CONTAINER)?);

    let mut updates = Updater::new();
    let handled = root
        .surface()
        .dispatch("click", &MountId::from("0.0.1"), &mut updates);
    log::info!("click reached {handled} handler(s)");
    root.apply(updates)?;

    for op in root.last_flush() {
        println!("{op:?}");
    }
    println!("{}", root.surface().serialize(CONTAINER)?);
    Ok(())
}
