//! Property enumeration over a broker
//!
//! Thin adapter over the broker's explicit `read`: the name set is
//! snapshotted once at creation from a fresh declaration scan of the
//! target's class, so attaching manual scope tables to the broker does not
//! change *which* names are enumerated, only how their values resolve.

use crate::injector::Injector;
use crate::reflect::MemberKind;
use crate::scan::scan;
use crate::value::Value;

/// Lazy, finite iterator over a broker's declared properties.
///
/// Restartable by asking the broker for a new iterator. A name whose read
/// fails mid-iteration (removed after the snapshot was taken) is skipped;
/// names already produced are never revisited.
pub struct PropertyIter<'a> {
    injector: &'a Injector,
    keys: Vec<String>,
    position: usize,
}

impl<'a> PropertyIter<'a> {
    pub(crate) fn new(injector: &'a Injector) -> Self {
        let table = scan(injector.reflect(), injector.class_id(), MemberKind::Property);
        let mut keys: Vec<String> = table.names().map(str::to_owned).collect();
        // Stable order so restarted iterations replay identically
        keys.sort_unstable();

        Self {
            injector,
            keys,
            position: 0,
        }
    }

    /// Number of names remaining in the snapshot
    pub fn remaining(&self) -> usize {
        self.keys.len().saturating_sub(self.position)
    }
}

impl Iterator for PropertyIter<'_> {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.keys.len() {
            let name = &self.keys[self.position];
            self.position += 1;

            if let Ok(value) = self.injector.read(name) {
                return Some((name.clone(), value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}
