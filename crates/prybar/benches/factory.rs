use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prybar::{Class, ClassId, ClassRegistry, InjectorFactory, Value, Visibility};

/// Five-level chain with a handful of members per level
fn setup() -> (Arc<ClassRegistry>, Value) {
    let mut registry = ClassRegistry::new();

    let mut parent: Option<ClassId> = None;
    for level in 0..5 {
        let id = registry.next_class_id();
        let name = format!("Level{level}");
        let mut class = match parent {
            Some(parent) => Class::with_parent(id, name, parent),
            None => Class::new(id, name),
        };
        class
            .declare_property(format!("secret{level}"), Visibility::Private, Value::Int(level))
            .declare_property(format!("shared{level}"), Visibility::Protected, Value::Null)
            .declare_property(format!("open{level}"), Visibility::Public, Value::Null);
        registry.register_class(class);
        parent = Some(id);
    }

    let last = parent.expect("chain is non-empty");
    let target = registry.instantiate(last).unwrap();
    (Arc::new(registry), target)
}

fn bench_factory_build(c: &mut Criterion) {
    let (registry, target) = setup();

    c.bench_function("factory_build_cold", |b| {
        b.iter(|| {
            let factory = InjectorFactory::new(registry.clone());
            factory.build(black_box(&target)).unwrap()
        });
    });

    c.bench_function("factory_build_warm", |b| {
        let factory = InjectorFactory::new(registry.clone());
        b.iter(|| factory.build(black_box(&target)).unwrap());
    });
}

fn bench_broker_ops(c: &mut Criterion) {
    let (registry, target) = setup();
    let factory = InjectorFactory::new(registry.clone());
    let broker = factory.build(&target).unwrap();

    c.bench_function("broker_read_private", |b| {
        b.iter(|| broker.read(black_box("secret0")).unwrap());
    });

    c.bench_function("broker_write_shared", |b| {
        b.iter(|| broker.write(black_box("open4"), Value::Int(1)).unwrap());
    });
}

criterion_group!(benches, bench_factory_build, bench_broker_ops);
criterion_main!(benches);
