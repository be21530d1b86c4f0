//! Declaration-scope resolution
//!
//! Computes, for one class and one member kind, which class in the
//! inheritance chain owns the scope for each member name: the exact
//! declaring class for private members, the closest declaring level for
//! everything else. Subclass declarations shadow ancestor declarations of
//! the same name.

use rustc_hash::FxHashMap;

use crate::object::ClassId;
use crate::reflect::{MemberKind, Reflect};
use crate::scope::ScopeTable;

/// Build the scope table for `class` and `kind`.
///
/// The local pass records every member declared at `class`; the recursive
/// parent pass then contributes entries only for names not already
/// present. Because subclass entries land first, an ancestor's
/// declaration of an already-recorded name is never visible through the
/// table — in particular an ancestor's *private* member shadowed by a
/// subclass redeclaration stays bound to the subclass, matching the
/// per-class private storage of [`Instance`](crate::Instance).
///
/// The scan is pure and idempotent: the same class always yields a
/// structurally equal table, independent of any instance.
pub fn scan(reflect: &dyn Reflect, class: ClassId, kind: MemberKind) -> ScopeTable {
    let mut entries = FxHashMap::default();
    collect(reflect, class, kind, &mut entries);
    ScopeTable::from(entries)
}

/// One level of the chain: local declarations, then the parent.
///
/// Terminates because inheritance chains are finite and acyclic.
fn collect(
    reflect: &dyn Reflect,
    class: ClassId,
    kind: MemberKind,
    entries: &mut FxHashMap<String, ClassId>,
) {
    for member in reflect.declared_members(class, kind) {
        let scope = if member.visibility.is_private() {
            member.declaring_class
        } else {
            class
        };
        entries.entry(member.name).or_insert(scope);
    }

    if let Some(parent) = reflect.parent_of(class) {
        collect(reflect, parent, kind, entries);
    }
}
