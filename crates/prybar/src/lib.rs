//! Prybar — scoped member-access broker
//!
//! Given an object instance, prybar discovers every property and method
//! across its inheritance chain, records which class level *declares* each
//! private member, and exposes a facade that reads, writes, and invokes
//! those members as if the calling code executed inside the declaring
//! class — including members that plain outside access could never reach.
//!
//! - **Scanner** ([`scan`]): resolves, per class and member kind, which
//!   class in the ancestry owns the scope for each name, with subclass
//!   declarations shadowing ancestors.
//! - **[`ScopeTable`]**: the frozen name → owning-class mapping the scan
//!   produces, shared read-only between brokers.
//! - **[`InjectorFactory`]**: class-keyed, process-lifetime cache of scope
//!   tables; builds ready-to-use brokers.
//! - **[`Injector`]**: the broker itself — `read`/`write`/`has`/`remove`/
//!   `invoke`, plus property enumeration.
//!
//! The core queries the class model through the [`Reflect`] trait;
//! [`ClassRegistry`] is the built-in implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prybar::{Class, ClassRegistry, InjectorFactory, Value, Visibility};
//!
//! let mut registry = ClassRegistry::new();
//! let id = registry.next_class_id();
//! let mut account = Class::new(id, "Account");
//! account.declare_property("balance", Visibility::Private, Value::Int(0));
//! registry.register_class(account);
//!
//! let target = registry.instantiate(id).unwrap();
//! let registry = Arc::new(registry);
//!
//! let factory = InjectorFactory::new(registry);
//! let broker = factory.build(&target).unwrap();
//!
//! broker.write("balance", Value::Int(100)).unwrap();
//! assert_eq!(broker.read("balance").unwrap(), Value::Int(100));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod error;
mod factory;
mod injector;
mod iter;
mod object;
mod reflect;
mod registry;
mod scan;
mod scope;
mod value;

pub use error::{InjectError, InjectResult};
pub use factory::InjectorFactory;
pub use injector::Injector;
pub use iter::PropertyIter;
pub use object::{
    Class, ClassId, Instance, MethodDecl, MethodFn, ObjectRef, PropertyDecl, ScopedFields,
    Visibility,
};
pub use reflect::{MemberDescriptor, MemberKind, Reflect};
pub use registry::ClassRegistry;
pub use scan::scan;
pub use scope::{ClassScopes, ScopeTable};
pub use value::Value;
