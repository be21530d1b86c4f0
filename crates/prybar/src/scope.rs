//! Frozen name → owning-class tables

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::object::ClassId;
use crate::reflect::{MemberKind, Reflect};
use crate::scan::scan;

/// Frozen mapping from member name to the class whose scope owns the
/// access.
///
/// Built once per (class, member kind) by the scanner and shared read-only
/// between every broker of that class; or assembled by hand via
/// `FromIterator` for callers that assign scopes explicitly. Construction
/// is append-only with first-insertion-wins, so feeding entries
/// subclass-first makes shadowing come out right by itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeTable {
    entries: FxHashMap<String, ClassId>,
}

impl ScopeTable {
    /// The owning scope recorded for `name`, if any
    pub fn get(&self, name: &str) -> Option<ClassId> {
        self.entries.get(name).copied()
    }

    /// Check whether `name` has an entry
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over the recorded member names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for an empty table
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<FxHashMap<String, ClassId>> for ScopeTable {
    fn from(entries: FxHashMap<String, ClassId>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, ClassId)> for ScopeTable {
    /// Collect entries, keeping the first occurrence of each name.
    fn from_iter<I: IntoIterator<Item = (String, ClassId)>>(iter: I) -> Self {
        let mut entries = FxHashMap::default();
        for (name, scope) in iter {
            entries.entry(name).or_insert(scope);
        }
        Self { entries }
    }
}

/// The pair of scope tables cached per class: one for properties, one for
/// methods. Cloning shares the underlying tables.
#[derive(Debug, Clone)]
pub struct ClassScopes {
    /// Property name → owning scope
    pub properties: Arc<ScopeTable>,
    /// Method name → owning scope
    pub methods: Arc<ScopeTable>,
}

impl ClassScopes {
    /// Scan both member kinds of `class`
    pub fn scan(reflect: &dyn Reflect, class: ClassId) -> Self {
        Self {
            properties: Arc::new(scan(reflect, class, MemberKind::Property)),
            methods: Arc::new(scan(reflect, class, MemberKind::Method)),
        }
    }
}
