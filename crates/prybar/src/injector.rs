//! The access broker
//!
//! Wraps one target instance plus its two scope tables and exposes
//! read/write/has/remove/invoke operations that first resolve the owning
//! scope for the requested name, then perform the access as if executing
//! inside that scope. With no tables attached, every access resolves to
//! the target's own runtime class — plain outside/public access.

use std::sync::Arc;

use crate::error::{InjectError, InjectResult};
use crate::factory::validate_target;
use crate::iter::PropertyIter;
use crate::object::{ClassId, ObjectRef, ScopedFields};
use crate::reflect::Reflect;
use crate::scope::ScopeTable;
use crate::value::Value;

/// Scoped access facade over one target instance.
///
/// Pure request/response: every operation resolves a scope, performs one
/// access, and returns. The broker never destroys its target and owns
/// nothing beyond its (shared, frozen) table references.
pub struct Injector {
    /// Target object to work on
    target: ObjectRef,
    /// Runtime class of the target, the fallback scope for every lookup
    class_id: ClassId,
    /// Reflection facility used for method lookup and iteration snapshots
    reflect: Arc<dyn Reflect>,
    /// Scopes to use for methods; `None` means "always the target itself"
    method_scopes: Option<Arc<ScopeTable>>,
    /// Scopes to use for properties; `None` means "always the target itself"
    property_scopes: Option<Arc<ScopeTable>>,
    /// Whether writes may create properties the target never declared
    allow_undeclared: bool,
}

impl Injector {
    /// Construct a broker directly from (possibly absent) scope tables.
    ///
    /// This is the extension point for callers that assemble their own
    /// scope maps instead of going through the factory's scan. Fails with
    /// [`InjectError::InvalidTarget`] if `target` is not an object
    /// instance or is a callable value; access operations never raise it.
    pub fn new(
        reflect: Arc<dyn Reflect>,
        target: &Value,
        method_scopes: Option<Arc<ScopeTable>>,
        property_scopes: Option<Arc<ScopeTable>>,
        allow_undeclared: bool,
    ) -> InjectResult<Self> {
        let (class_id, target) = validate_target(reflect.as_ref(), target)?;

        Ok(Self {
            target,
            class_id,
            reflect,
            method_scopes,
            property_scopes,
            allow_undeclared,
        })
    }

    // ========================================================================
    // Scope resolution
    //
    // All property operations share one rule, and invoke applies the same
    // rule to the method table: look the name up, fall back to the
    // target's own runtime class.
    // ========================================================================

    fn property_scope(&self, name: &str) -> ClassId {
        self.property_scopes
            .as_ref()
            .and_then(|table| table.get(name))
            .unwrap_or(self.class_id)
    }

    fn method_scope(&self, name: &str) -> ClassId {
        self.method_scopes
            .as_ref()
            .and_then(|table| table.get(name))
            .unwrap_or(self.class_id)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Read a property as seen from its owning scope.
    ///
    /// Fails with [`InjectError::UnknownMember`] if no slot of that name
    /// exists within the resolved scope.
    pub fn read(&self, name: &str) -> InjectResult<Value> {
        let scope = self.property_scope(name);
        self.target
            .lock()
            .read_scoped(name, scope)
            .ok_or_else(|| InjectError::unknown_property(name))
    }

    /// Write a property as seen from its owning scope.
    ///
    /// An unknown name fails with [`InjectError::UnknownMember`] when
    /// undeclared writes are disallowed — without touching the target.
    /// When they are allowed, writing an unknown name attaches a new
    /// ad-hoc property instead of failing.
    pub fn write(&self, name: &str, value: Value) -> InjectResult<()> {
        let scope = self.property_scope(name);
        let mut instance = self.target.lock();

        if !self.allow_undeclared && !instance.has_scoped(name, scope) {
            return Err(InjectError::unknown_property(name));
        }

        instance.write_scoped(name, scope, value);
        Ok(())
    }

    /// Check whether a property exists within its owning scope. Never fails.
    pub fn has(&self, name: &str) -> bool {
        let scope = self.property_scope(name);
        self.target.lock().has_scoped(name, scope)
    }

    /// Remove a property within its owning scope. Missing names are a
    /// no-op, so removal is idempotent.
    pub fn remove(&self, name: &str) {
        let scope = self.property_scope(name);
        self.target.lock().remove_scoped(name, scope);
    }

    /// Invoke a method as seen from its owning scope.
    ///
    /// Arguments are passed positionally; the body runs with field access
    /// bound to its declaring class. Fails with
    /// [`InjectError::UnknownMember`] if no callable of that name is
    /// reachable within the resolved scope.
    pub fn invoke(&self, name: &str, args: &[Value]) -> InjectResult<Value> {
        let scope = self.method_scope(name);
        let (declaring, body) = self
            .reflect
            .find_callable(self.class_id, scope, name)
            .ok_or_else(|| InjectError::unknown_method(name))?;

        let mut instance = self.target.lock();
        Ok(body(ScopedFields::new(&mut instance, declaring), args))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The wrapped instance
    pub fn target(&self) -> &ObjectRef {
        &self.target
    }

    /// Runtime class of the wrapped instance
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// The property scope table, if one is attached
    pub fn property_scopes(&self) -> Option<&Arc<ScopeTable>> {
        self.property_scopes.as_ref()
    }

    /// The method scope table, if one is attached
    pub fn method_scopes(&self) -> Option<&Arc<ScopeTable>> {
        self.method_scopes.as_ref()
    }

    pub(crate) fn reflect(&self) -> &dyn Reflect {
        self.reflect.as_ref()
    }

    /// Iterate over the target's declared properties as (name, value)
    /// pairs.
    ///
    /// The name set is a fresh snapshot taken now; each call restarts from
    /// the first name.
    pub fn properties(&self) -> PropertyIter<'_> {
        PropertyIter::new(self)
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("class_id", &self.class_id)
            .field("allow_undeclared", &self.allow_undeclared)
            .field("has_property_scopes", &self.property_scopes.is_some())
            .field("has_method_scopes", &self.method_scopes.is_some())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Injector {
    type Item = (String, Value);
    type IntoIter = PropertyIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties()
    }
}
