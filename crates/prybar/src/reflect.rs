//! Reflection seam between the broker core and the class model
//!
//! The scanner, factory, and broker never touch a concrete class model
//! directly; they query a [`Reflect`] implementation for the three facts
//! they need (member lists with visibility tags, parent of a class,
//! runtime class of a value) plus privileged method lookup.
//! [`ClassRegistry`](crate::ClassRegistry) is the in-crate implementation;
//! callers with their own object model implement the trait instead.

use std::fmt;

use crate::object::{ClassId, MethodFn, Visibility};
use crate::value::Value;

/// Which kind of member a query or scope table is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Instance property
    Property,
    /// Instance method
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property => write!(f, "property"),
            Self::Method => write!(f, "method"),
        }
    }
}

/// One member as reported by the reflection facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    /// Member name
    pub name: String,
    /// Visibility modifier
    pub visibility: Visibility,
    /// The class that declares this member
    pub declaring_class: ClassId,
}

/// Host reflection facility queried by the scanner, factory, and broker.
pub trait Reflect: Send + Sync {
    /// Runtime class of a value; `None` for anything that is not an object
    /// instance of a known class.
    fn class_of(&self, value: &Value) -> Option<ClassId>;

    /// Parent of a class; `None` for root classes (and unknown ids).
    fn parent_of(&self, class: ClassId) -> Option<ClassId>;

    /// Members *declared locally* at `class`, with visibility tags.
    /// Inherited members are not included; the scanner walks the chain
    /// itself via [`parent_of`](Reflect::parent_of).
    fn declared_members(&self, class: ClassId, kind: MemberKind) -> Vec<MemberDescriptor>;

    /// Privileged method lookup for an invocation resolved to `scope`.
    ///
    /// A private method declared exactly at `scope` wins; otherwise the
    /// first non-private declaration walking up from the instance's
    /// `runtime` class. Returns the body together with its declaring class
    /// (the scope the body's own field accesses bind to), or `None` when
    /// no callable of that name is reachable.
    fn find_callable(
        &self,
        runtime: ClassId,
        scope: ClassId,
        name: &str,
    ) -> Option<(ClassId, MethodFn)>;
}
