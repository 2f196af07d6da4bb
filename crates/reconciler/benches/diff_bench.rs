use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use reconciler::Root;
use surface::MemorySurface;
use vdom::{
    Child, Component, ComponentHandle, ComponentType, ContainerHandle, MountId, Props,
    RenderContext, State, create_element,
};

const CONTAINER: ContainerHandle = ContainerHandle(1);
const SMALL_LIST: usize = 64;
const LARGE_LIST: usize = 4_096;

struct List;

impl Component for List {
    fn create(_props: &Props) -> Self {
        List
    }

    fn render(&self, cx: &RenderContext<'_>) -> Child {
        let order = cx.state().get_str("order").unwrap_or_default();
        let items = order.split(',').filter(|key| !key.is_empty()).map(|key| {
            Child::from(create_element(
                "li",
                Props::new().key(key).class_name("row"),
                [Child::from(key)],
            ))
        });
        Child::from(create_element("ul", Props::new(), items))
    }
}

fn order(keys: impl Iterator<Item = usize>) -> String {
    keys.map(|key| key.to_string()).collect::<Vec<_>>().join(",")
}

fn mounted(len: usize) -> (Root<MemorySurface>, ComponentHandle) {
    let mut root = Root::new(MemorySurface::new());
    root.render(
        create_element(ComponentType::of::<List>(), Props::new(), []),
        CONTAINER,
    )
    .expect("mount");
    let handle = root.components_at(&MountId::root("0"))[0];
    root.set_state(handle, State::new().with("order", order(0..len)))
        .expect("fill");
    (root, handle)
}

fn bench_mount_large(c: &mut Criterion) {
    let initial = order(0..LARGE_LIST);
    c.bench_function("bench_mount_large", |b| {
        b.iter_batched(
            || mounted(0),
            |(mut root, handle)| {
                root.set_state(handle, State::new().with("order", initial.as_str()))
                    .expect("fill");
                black_box(root.stats());
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_reverse_small(c: &mut Criterion) {
    let reversed = order((0..SMALL_LIST).rev());
    c.bench_function("bench_reverse_small", |b| {
        b.iter_batched(
            || mounted(SMALL_LIST),
            |(mut root, handle)| {
                root.set_state(handle, State::new().with("order", reversed.as_str()))
                    .expect("reverse");
                black_box(root.stats());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_rotate_large(c: &mut Criterion) {
    let rotated = order((1..LARGE_LIST).chain(std::iter::once(0)));
    c.bench_function("bench_rotate_large", |b| {
        b.iter_batched(
            || mounted(LARGE_LIST),
            |(mut root, handle)| {
                root.set_state(handle, State::new().with("order", rotated.as_str()))
                    .expect("rotate");
                black_box(root.stats());
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_unchanged_large(c: &mut Criterion) {
    let same = order(0..LARGE_LIST);
    let (mut root, handle) = mounted(LARGE_LIST);
    c.bench_function("bench_unchanged_large", |b| {
        b.iter(|| {
            root.set_state(handle, State::new().with("order", black_box(same.as_str())))
                .expect("noop");
        });
    });
}

criterion_group!(
    benches,
    bench_mount_large,
    bench_reverse_small,
    bench_rotate_large,
    bench_unchanged_large
);
criterion_main!(benches);
