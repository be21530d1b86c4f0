//! Tests for the declaration cache and broker factory

use std::sync::Arc;

use prybar::{
    Class, ClassId, ClassRegistry, InjectError, InjectorFactory, MethodFn, Value, Visibility,
};

/// Widget (private serial, public label; public describe) <- Gadget
fn fixture() -> (Arc<ClassRegistry>, ClassId, ClassId) {
    let mut registry = ClassRegistry::new();

    let describe: MethodFn = Arc::new(|fields, _args: &[Value]| {
        fields.get("label").unwrap_or(Value::Null)
    });

    let widget = registry.next_class_id();
    let mut widget_class = Class::new(widget, "Widget");
    widget_class
        .declare_property("serial", Visibility::Private, Value::Int(0))
        .declare_property("label", Visibility::Public, Value::str("widget"));
    widget_class.declare_method("describe", Visibility::Public, describe);
    registry.register_class(widget_class);

    let gadget = registry.next_class_id();
    registry.register_class(Class::with_parent(gadget, "Gadget", widget));

    (Arc::new(registry), widget, gadget)
}

// ============================================================================
// Cache Behavior
// ============================================================================

#[test]
fn test_cache_sharing_across_instances_of_one_class() {
    let (registry, widget, _) = fixture();
    let factory = InjectorFactory::new(registry.clone());

    let first = factory.build(&registry.instantiate(widget).unwrap()).unwrap();
    let second = factory.build(&registry.instantiate(widget).unwrap()).unwrap();

    // Same-object tables, not merely equal ones
    assert!(Arc::ptr_eq(
        first.property_scopes().unwrap(),
        second.property_scopes().unwrap()
    ));
    assert!(Arc::ptr_eq(
        first.method_scopes().unwrap(),
        second.method_scopes().unwrap()
    ));
    assert_eq!(factory.cached_classes(), 1);
}

#[test]
fn test_cache_is_keyed_by_concrete_class() {
    let (registry, widget, gadget) = fixture();
    let factory = InjectorFactory::new(registry.clone());

    let base = factory.build(&registry.instantiate(widget).unwrap()).unwrap();
    let derived = factory.build(&registry.instantiate(gadget).unwrap()).unwrap();

    assert!(!Arc::ptr_eq(
        base.property_scopes().unwrap(),
        derived.property_scopes().unwrap()
    ));
    assert_eq!(factory.cached_classes(), 2);
}

#[test]
fn test_separate_factories_scan_to_equal_tables() {
    let (registry, widget, _) = fixture();
    let target = registry.instantiate(widget).unwrap();

    let first = InjectorFactory::new(registry.clone()).build(&target).unwrap();
    let second = InjectorFactory::new(registry.clone()).build(&target).unwrap();

    // Distinct table objects with identical contents
    assert!(!Arc::ptr_eq(
        first.property_scopes().unwrap(),
        second.property_scopes().unwrap()
    ));
    assert_eq!(
        first.property_scopes().unwrap().as_ref(),
        second.property_scopes().unwrap().as_ref()
    );
}

#[test]
fn test_create_from_convenience() {
    let (registry, widget, _) = fixture();
    let target = registry.instantiate(widget).unwrap();

    let broker = InjectorFactory::create_from(registry.clone(), &target).unwrap();
    assert_eq!(broker.read("serial").unwrap(), Value::Int(0));

    // Default policy allows undeclared writes
    broker.write("ghost", Value::Int(1)).unwrap();
    assert_eq!(broker.read("ghost").unwrap(), Value::Int(1));
}

// ============================================================================
// Target Validation
// ============================================================================

#[test]
fn test_rejects_non_object_targets() {
    let (registry, ..) = fixture();
    let factory = InjectorFactory::new(registry);

    for target in [Value::Int(42), Value::Null, Value::str("text"), Value::Bool(true)] {
        let err = factory.build(&target).unwrap_err();
        assert!(matches!(err, InjectError::InvalidTarget(_)), "{target:?}");
    }
}

#[test]
fn test_rejects_callable_targets() {
    let (registry, ..) = fixture();
    let factory = InjectorFactory::new(registry);

    let bound: MethodFn = Arc::new(|_, _| Value::Null);
    let err = factory.build(&Value::Callable(bound)).unwrap_err();
    assert!(matches!(err, InjectError::InvalidTarget(_)));
}

#[test]
fn test_validation_failures_do_not_populate_the_cache() {
    let (registry, ..) = fixture();
    let factory = InjectorFactory::new(registry);

    let _ = factory.build(&Value::Int(1));
    assert_eq!(factory.cached_classes(), 0);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_builds_share_one_scan() {
    let (registry, widget, _) = fixture();
    let factory = Arc::new(InjectorFactory::new(registry.clone()));

    let tables: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let factory = factory.clone();
                let registry = registry.clone();
                scope.spawn(move || {
                    let target = registry.instantiate(widget).unwrap();
                    let broker = factory.build(&target).unwrap();
                    broker.property_scopes().unwrap().clone()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(factory.cached_classes(), 1);
    for table in &tables[1..] {
        assert!(Arc::ptr_eq(&tables[0], table));
    }
}
