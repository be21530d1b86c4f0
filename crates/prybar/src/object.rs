//! Object model and class system
//!
//! The class model is deliberately small: a `Class` carries its locally
//! declared properties and methods with visibility tags and an optional
//! parent, and an `Instance` carries the actual storage. Private members
//! are stored per declaring class, so two same-named private properties at
//! different levels of an inheritance chain are physically distinct slots.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::value::Value;

/// Opaque identity of a class in the model; doubles as a scope value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    /// Create a class id from a raw index
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The raw index behind this id
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

/// Visibility modifier for class members
///
/// | Modifier  | Same Class | Subclass | Other Classes |
/// |-----------|------------|----------|---------------|
/// | Private   | yes        | no       | no            |
/// | Protected | yes        | yes      | no            |
/// | Public    | yes        | yes      | yes           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Only accessible within the declaring class
    Private,
    /// Accessible within the declaring class and subclasses
    Protected,
    /// Accessible from anywhere (default)
    #[default]
    Public,
}

impl Visibility {
    /// Check for private visibility
    #[inline]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// Shared reference to a live instance
pub type ObjectRef = Arc<Mutex<Instance>>;

/// Native method body, bound to an instance at call time.
///
/// The body receives a [`ScopedFields`] view that resolves field access
/// from the method's own declaring class, so private fields of that class
/// are reachable. The view holds exclusive access to the instance for the
/// duration of the call; re-entering a broker for the same instance from
/// inside a body deadlocks.
pub type MethodFn = Arc<dyn Fn(ScopedFields<'_>, &[Value]) -> Value + Send + Sync>;

/// A locally declared property
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    /// Property name
    pub name: String,
    /// Visibility modifier
    pub visibility: Visibility,
    /// Initial value for new instances
    pub default: Value,
}

/// A locally declared method
#[derive(Clone)]
pub struct MethodDecl {
    /// Visibility modifier
    pub visibility: Visibility,
    /// Native body
    pub body: MethodFn,
}

impl fmt::Debug for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDecl")
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// Class definition metadata
///
/// Holds only *local* declarations; inherited members are reached by
/// walking `parent_id`.
#[derive(Debug, Clone)]
pub struct Class {
    /// Class ID (unique identifier)
    pub id: ClassId,
    /// Class name
    pub name: String,
    /// Parent class ID (None for root classes)
    pub parent_id: Option<ClassId>,
    /// Locally declared properties, in declaration order
    properties: Vec<PropertyDecl>,
    /// Locally declared methods by name
    methods: FxHashMap<String, MethodDecl>,
}

impl Class {
    /// Create a new root class
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            properties: Vec::new(),
            methods: FxHashMap::default(),
        }
    }

    /// Create a new class with a parent
    pub fn with_parent(id: ClassId, name: impl Into<String>, parent_id: ClassId) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: Some(parent_id),
            properties: Vec::new(),
            methods: FxHashMap::default(),
        }
    }

    /// Declare a property on this class
    pub fn declare_property(
        &mut self,
        name: impl Into<String>,
        visibility: Visibility,
        default: Value,
    ) -> &mut Self {
        self.properties.push(PropertyDecl {
            name: name.into(),
            visibility,
            default,
        });
        self
    }

    /// Declare a method on this class
    pub fn declare_method(
        &mut self,
        name: impl Into<String>,
        visibility: Visibility,
        body: MethodFn,
    ) -> &mut Self {
        self.methods.insert(name.into(), MethodDecl { visibility, body });
        self
    }

    /// Locally declared properties, in declaration order
    pub fn properties(&self) -> &[PropertyDecl] {
        &self.properties
    }

    /// Look up a locally declared method by name
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.get(name)
    }

    /// Iterate over locally declared methods
    pub fn methods(&self) -> impl Iterator<Item = (&str, &MethodDecl)> {
        self.methods.iter().map(|(name, decl)| (name.as_str(), decl))
    }
}

/// Object instance
///
/// Storage is split in two: a `shared` map for public/protected and ad-hoc
/// properties (one slot per name for the whole chain, subclass default
/// wins), and per-declaring-class `private` maps so that same-named
/// private properties at different levels never collide.
#[derive(Debug)]
pub struct Instance {
    /// Runtime class of this instance
    class_id: ClassId,
    /// Public/protected/ad-hoc slots, one per name
    shared: FxHashMap<String, Value>,
    /// Private slots, keyed by declaring class
    private: FxHashMap<ClassId, FxHashMap<String, Value>>,
}

impl Instance {
    /// Create an empty instance of the given runtime class.
    ///
    /// Declared slots are seeded by the registry during instantiation;
    /// an instance created directly starts with no slots at all.
    pub fn new(class_id: ClassId) -> Self {
        Self {
            class_id,
            shared: FxHashMap::default(),
            private: FxHashMap::default(),
        }
    }

    /// Runtime class of this instance
    #[inline]
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Seed a shared (public/protected) slot if not already present
    pub(crate) fn seed_shared(&mut self, name: &str, value: Value) {
        self.shared.entry(name.to_string()).or_insert(value);
    }

    /// Seed a private slot owned by `scope`
    pub(crate) fn seed_private(&mut self, scope: ClassId, name: &str, value: Value) {
        self.private
            .entry(scope)
            .or_default()
            .insert(name.to_string(), value);
    }

    // ========================================================================
    // Scoped access primitives
    //
    // These perform the actual privileged access: a private slot owned by
    // `scope` wins over a shared slot of the same name, which is exactly
    // what field access inside the declaring class would see.
    // ========================================================================

    /// Read a slot as seen from `scope`
    pub fn read_scoped(&self, name: &str, scope: ClassId) -> Option<Value> {
        if let Some(slots) = self.private.get(&scope) {
            if let Some(value) = slots.get(name) {
                return Some(value.clone());
            }
        }
        self.shared.get(name).cloned()
    }

    /// Write a slot as seen from `scope`.
    ///
    /// Lands in the private slot owned by `scope` when one exists, else in
    /// the shared slot, creating it for previously unknown names. Existence
    /// policy is the caller's concern; this primitive always writes.
    pub fn write_scoped(&mut self, name: &str, scope: ClassId, value: Value) {
        if let Some(slots) = self.private.get_mut(&scope) {
            if let Some(slot) = slots.get_mut(name) {
                *slot = value;
                return;
            }
        }
        self.shared.insert(name.to_string(), value);
    }

    /// Check slot existence as seen from `scope`
    pub fn has_scoped(&self, name: &str, scope: ClassId) -> bool {
        self.private
            .get(&scope)
            .is_some_and(|slots| slots.contains_key(name))
            || self.shared.contains_key(name)
    }

    /// Remove a slot as seen from `scope`; missing names are a no-op
    pub fn remove_scoped(&mut self, name: &str, scope: ClassId) {
        if let Some(slots) = self.private.get_mut(&scope) {
            if slots.remove(name).is_some() {
                return;
            }
        }
        self.shared.remove(name);
    }
}

/// Field access view handed to method bodies.
///
/// Resolves every access from the method's declaring class, so bodies see
/// their own class's private slots the way source code inside that class
/// would.
pub struct ScopedFields<'a> {
    instance: &'a mut Instance,
    scope: ClassId,
}

impl<'a> ScopedFields<'a> {
    pub(crate) fn new(instance: &'a mut Instance, scope: ClassId) -> Self {
        Self { instance, scope }
    }

    /// The declaring class this view is bound to
    #[inline]
    pub fn scope(&self) -> ClassId {
        self.scope
    }

    /// Runtime class of the underlying instance
    #[inline]
    pub fn class_id(&self) -> ClassId {
        self.instance.class_id()
    }

    /// Read a field
    pub fn get(&self, name: &str) -> Option<Value> {
        self.instance.read_scoped(name, self.scope)
    }

    /// Write a field
    pub fn set(&mut self, name: &str, value: Value) {
        self.instance.write_scoped(name, self.scope, value);
    }

    /// Check field existence
    pub fn has(&self, name: &str) -> bool {
        self.instance.has_scoped(name, self.scope)
    }
}
