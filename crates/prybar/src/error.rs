//! Error types for scoped member access

use crate::reflect::MemberKind;

/// Result type for broker operations
pub type InjectResult<T> = Result<T, InjectError>;

/// Errors raised by the factory and the access broker.
///
/// `InvalidTarget` is raised at construction time only; `UnknownMember` is
/// raised by `read` and `invoke`, and by `write` when undeclared writes are
/// disallowed. Every other condition (missing parent, empty class, no
/// members) is a valid empty result, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectError {
    /// Target is not an object instance, or is a callable value
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Requested name does not exist on the target within the resolved scope
    #[error("unknown {kind}: {name}")]
    UnknownMember {
        /// Whether a property or a method was requested
        kind: MemberKind,
        /// The requested member name
        name: String,
    },
}

impl InjectError {
    /// Unknown property on the target
    pub fn unknown_property(name: &str) -> Self {
        Self::UnknownMember {
            kind: MemberKind::Property,
            name: name.to_string(),
        }
    }

    /// Unknown method on the target
    pub fn unknown_method(name: &str) -> Self {
        Self::UnknownMember {
            kind: MemberKind::Method,
            name: name.to_string(),
        }
    }
}
