//! Declaration cache and broker factory

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{InjectError, InjectResult};
use crate::injector::Injector;
use crate::object::ClassId;
use crate::reflect::Reflect;
use crate::scope::ClassScopes;
use crate::value::Value;

/// Builds [`Injector`]s, amortizing declaration scans across instances.
///
/// The cache is keyed by the concrete runtime class of each target and
/// lives as long as the factory: scanning cost is paid once per class, not
/// once per instance, and two brokers built for instances of the same
/// class share the very same frozen tables. Nothing is ever evicted; the
/// cache is bounded by the number of distinct classes wrapped, not by
/// request volume.
pub struct InjectorFactory {
    reflect: Arc<dyn Reflect>,
    cache: DashMap<ClassId, ClassScopes>,
}

impl InjectorFactory {
    /// Create a factory over the given reflection facility
    pub fn new(reflect: Arc<dyn Reflect>) -> Self {
        Self {
            reflect,
            cache: DashMap::new(),
        }
    }

    /// Build a broker for `target` with undeclared writes allowed.
    ///
    /// Fails with [`InjectError::InvalidTarget`] if `target` is not an
    /// object instance or is a callable value.
    pub fn build(&self, target: &Value) -> InjectResult<Injector> {
        self.build_with(target, true)
    }

    /// Build a broker for `target` with an explicit undeclared-write policy.
    pub fn build_with(&self, target: &Value, allow_undeclared: bool) -> InjectResult<Injector> {
        let (class_id, _) = validate_target(self.reflect.as_ref(), target)?;
        let scopes = self.scopes_for(class_id);

        Injector::new(
            self.reflect.clone(),
            target,
            Some(scopes.methods),
            Some(scopes.properties),
            allow_undeclared,
        )
    }

    /// One-shot convenience: fresh factory, default policy.
    pub fn create_from(reflect: Arc<dyn Reflect>, target: &Value) -> InjectResult<Injector> {
        Self::new(reflect).build(target)
    }

    /// Number of classes scanned so far
    pub fn cached_classes(&self) -> usize {
        self.cache.len()
    }

    /// Tables for `class_id`, scanning on first sight.
    ///
    /// The entry API makes the check-then-insert atomic, so concurrent
    /// builds of the same class cannot corrupt the map; at worst one
    /// thread waits while the other scans.
    fn scopes_for(&self, class_id: ClassId) -> ClassScopes {
        self.cache
            .entry(class_id)
            .or_insert_with(|| ClassScopes::scan(self.reflect.as_ref(), class_id))
            .clone()
    }
}

impl std::fmt::Debug for InjectorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectorFactory")
            .field("cached_classes", &self.cache.len())
            .finish()
    }
}

/// Reject non-object and callable targets; resolve the runtime class.
pub(crate) fn validate_target(
    reflect: &dyn Reflect,
    target: &Value,
) -> InjectResult<(ClassId, crate::object::ObjectRef)> {
    if target.is_callable() {
        return Err(InjectError::InvalidTarget(
            "target must not be a callable value".to_string(),
        ));
    }
    let Some(obj) = target.as_object() else {
        return Err(InjectError::InvalidTarget(format!(
            "target must be an object, got {}",
            target.type_name()
        )));
    };
    let class_id = reflect.class_of(target).ok_or_else(|| {
        InjectError::InvalidTarget(
            "target's class is unknown to the reflection facility".to_string(),
        )
    })?;
    Ok((class_id, obj.clone()))
}
