//! Class registry: the in-crate class model and reflection facility

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::object::{Class, ClassId, Instance, MethodFn};
use crate::reflect::{MemberDescriptor, MemberKind, Reflect};
use crate::value::Value;

/// Registry of class definitions.
///
/// Assigns ids, answers name lookups, instantiates objects, and implements
/// [`Reflect`] so the scanner and broker can run against it.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Class>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new class.
    ///
    /// The class's `id` must be the one obtained from
    /// [`next_class_id`](Self::next_class_id).
    pub fn register_class(&mut self, class: Class) -> ClassId {
        let id = class.id;
        let name = class.name.clone();

        self.classes.push(class);
        self.name_to_id.insert(name, id);

        id
    }

    /// Get class by ID
    pub fn get_class(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id.index())
    }

    /// Get mutable class by ID
    pub fn get_class_mut(&mut self, id: ClassId) -> Option<&mut Class> {
        self.classes.get_mut(id.index())
    }

    /// Get class by name
    pub fn get_class_by_name(&self, name: &str) -> Option<&Class> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.classes.get(id.index()))
    }

    /// Get next available class ID
    pub fn next_class_id(&self) -> ClassId {
        ClassId::new(self.classes.len())
    }

    /// Iterate over all classes
    pub fn iter(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter()
    }

    /// Allocate an instance of `class_id` with all declared slots seeded.
    ///
    /// Walks the chain most-derived first: shared slots take the closest
    /// declaration's default, and every level that declares a private
    /// property gets its own slot. Returns `None` for unknown ids.
    pub fn instantiate(&self, class_id: ClassId) -> Option<Value> {
        self.get_class(class_id)?;

        let mut instance = Instance::new(class_id);
        let mut current = Some(class_id);
        while let Some(id) = current {
            let class = self.get_class(id)?;
            for prop in class.properties() {
                if prop.visibility.is_private() {
                    instance.seed_private(id, &prop.name, prop.default.clone());
                } else {
                    instance.seed_shared(&prop.name, prop.default.clone());
                }
            }
            current = class.parent_id;
        }

        Some(Value::Object(Arc::new(Mutex::new(instance))))
    }
}

impl Reflect for ClassRegistry {
    fn class_of(&self, value: &Value) -> Option<ClassId> {
        let obj = value.as_object()?;
        let class_id = obj.lock().class_id();
        self.get_class(class_id).map(|class| class.id)
    }

    fn parent_of(&self, class: ClassId) -> Option<ClassId> {
        self.get_class(class)?.parent_id
    }

    fn declared_members(&self, class: ClassId, kind: MemberKind) -> Vec<MemberDescriptor> {
        let Some(decl) = self.get_class(class) else {
            return Vec::new();
        };

        match kind {
            MemberKind::Property => decl
                .properties()
                .iter()
                .map(|prop| MemberDescriptor {
                    name: prop.name.clone(),
                    visibility: prop.visibility,
                    declaring_class: class,
                })
                .collect(),
            MemberKind::Method => decl
                .methods()
                .map(|(name, method)| MemberDescriptor {
                    name: name.to_string(),
                    visibility: method.visibility,
                    declaring_class: class,
                })
                .collect(),
        }
    }

    fn find_callable(
        &self,
        runtime: ClassId,
        scope: ClassId,
        name: &str,
    ) -> Option<(ClassId, MethodFn)> {
        // A private method declared exactly at the resolved scope wins.
        if let Some(class) = self.get_class(scope) {
            if let Some(method) = class.method(name) {
                if method.visibility.is_private() {
                    return Some((scope, method.body.clone()));
                }
            }
        }

        // Otherwise: normal dispatch from the runtime class upward.
        // Private declarations of other classes do not participate.
        let mut current = Some(runtime);
        while let Some(id) = current {
            let class = self.get_class(id)?;
            if let Some(method) = class.method(name) {
                if !method.visibility.is_private() {
                    return Some((id, method.body.clone()));
                }
            }
            current = class.parent_id;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Visibility;

    fn noop_body() -> MethodFn {
        Arc::new(|_, _| Value::Null)
    }

    #[test]
    fn test_register_class() {
        let mut registry = ClassRegistry::new();
        let id = registry.next_class_id();
        assert_eq!(registry.register_class(Class::new(id, "Point")), id);
        assert_eq!(registry.next_class_id(), ClassId::new(1));
    }

    #[test]
    fn test_get_class_by_name() {
        let mut registry = ClassRegistry::new();
        let id = registry.next_class_id();
        registry.register_class(Class::new(id, "Point"));

        let retrieved = registry.get_class_by_name("Point").unwrap();
        assert_eq!(retrieved.id, id);
        assert!(registry.get_class_by_name("Unknown").is_none());
    }

    #[test]
    fn test_instantiate_seeds_declared_slots() {
        let mut registry = ClassRegistry::new();
        let base = registry.next_class_id();
        let mut class = Class::new(base, "Account");
        class
            .declare_property("owner", Visibility::Public, Value::str("nobody"))
            .declare_property("balance", Visibility::Private, Value::Int(0));
        registry.register_class(class);

        let value = registry.instantiate(base).unwrap();
        let obj = value.as_object().unwrap();
        let inst = obj.lock();

        assert_eq!(inst.read_scoped("owner", base), Some(Value::str("nobody")));
        assert_eq!(inst.read_scoped("balance", base), Some(Value::Int(0)));
        // Private slot is invisible from an unrelated scope
        assert_eq!(inst.read_scoped("balance", ClassId::new(99)), None);
    }

    #[test]
    fn test_instantiate_subclass_default_wins_for_shared_slots() {
        let mut registry = ClassRegistry::new();
        let base = registry.next_class_id();
        let mut base_class = Class::new(base, "Base");
        base_class.declare_property("label", Visibility::Public, Value::str("base"));
        registry.register_class(base_class);

        let derived = registry.next_class_id();
        let mut derived_class = Class::with_parent(derived, "Derived", base);
        derived_class.declare_property("label", Visibility::Public, Value::str("derived"));
        registry.register_class(derived_class);

        let value = registry.instantiate(derived).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(
            obj.lock().read_scoped("label", derived),
            Some(Value::str("derived"))
        );
    }

    #[test]
    fn test_instantiate_unknown_class() {
        let registry = ClassRegistry::new();
        assert!(registry.instantiate(ClassId::new(0)).is_none());
    }

    #[test]
    fn test_class_of_rejects_non_objects() {
        let registry = ClassRegistry::new();
        assert!(registry.class_of(&Value::Int(42)).is_none());
        assert!(registry.class_of(&Value::Null).is_none());
        assert!(registry
            .class_of(&Value::Callable(noop_body()))
            .is_none());
    }

    #[test]
    fn test_declared_members_are_local_only() {
        let mut registry = ClassRegistry::new();
        let base = registry.next_class_id();
        let mut base_class = Class::new(base, "Base");
        base_class.declare_property("y", Visibility::Protected, Value::Null);
        registry.register_class(base_class);

        let derived = registry.next_class_id();
        registry.register_class(Class::with_parent(derived, "Derived", base));

        assert_eq!(registry.declared_members(base, MemberKind::Property).len(), 1);
        assert!(registry
            .declared_members(derived, MemberKind::Property)
            .is_empty());
    }

    #[test]
    fn test_find_callable_private_requires_matching_scope() {
        let mut registry = ClassRegistry::new();
        let base = registry.next_class_id();
        let mut base_class = Class::new(base, "Base");
        base_class.declare_method("audit", Visibility::Private, noop_body());
        registry.register_class(base_class);

        let derived = registry.next_class_id();
        registry.register_class(Class::with_parent(derived, "Derived", base));

        // Reachable when the resolved scope is the declaring class
        assert!(registry.find_callable(derived, base, "audit").is_some());
        // Invisible under normal dispatch from the subclass
        assert!(registry.find_callable(derived, derived, "audit").is_none());
    }

    #[test]
    fn test_find_callable_walks_chain_for_non_private() {
        let mut registry = ClassRegistry::new();
        let base = registry.next_class_id();
        let mut base_class = Class::new(base, "Base");
        base_class.declare_method("describe", Visibility::Protected, noop_body());
        registry.register_class(base_class);

        let derived = registry.next_class_id();
        registry.register_class(Class::with_parent(derived, "Derived", base));

        let (declaring, _) = registry.find_callable(derived, derived, "describe").unwrap();
        assert_eq!(declaring, base);
        assert!(registry.find_callable(derived, derived, "missing").is_none());
    }
}
