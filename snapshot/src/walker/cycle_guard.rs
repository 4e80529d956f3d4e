//! Per-call tracking of objects on the current recursion path
//!
//! Only membership of the *current* path is a cycle. The same object reached again
//! through a sibling branch is a shared reference and is serialized again.

use std::collections::HashMap;

use tracing::warn;

use crate::object::ObjectId;

/// In-flight identity set for one traversal
#[derive(Debug, Default)]
pub struct CycleGuard {
    stack:      Vec<ObjectId>,
    entered_at: HashMap<ObjectId, String>,
}

impl CycleGuard {
    /// Create an empty guard
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Mark `id` as on the path, entered at `path`
    ///
    /// Returns `false` when `id` is already on the path; the caller must then emit a
    /// cycle marker and must not call [`CycleGuard::leave`] for this visit.
    pub fn enter(&mut self, id: ObjectId, path: &str) -> bool {
        if self.entered_at.contains_key(&id) {
            return false;
        }
        self.entered_at.insert(id, path.to_string());
        self.stack.push(id);
        true
    }

    /// Remove `id` from the path
    pub fn leave(&mut self, id: ObjectId) {
        if self.stack.last() == Some(&id) {
            self.stack.pop();
        } else if let Some(position) = self.stack.iter().rposition(|entry| *entry == id) {
            warn!(?id, "Cycle guard left out of order");
            self.stack.remove(position);
        } else {
            return;
        }
        self.entered_at.remove(&id);
    }

    /// Path at which an in-flight object was entered
    #[must_use]
    pub fn entered_at(&self, id: ObjectId) -> Option<&str> {
        self.entered_at.get(&id).map(String::as_str)
    }

    /// Number of objects on the current path
    #[must_use]
    pub fn depth(&self) -> usize { self.stack.len() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;
    use crate::object::Vec2;

    #[test]
    fn test_reentry_on_path_is_cycle() {
        let a = ObjectRef::new(Vec2::default());
        let mut guard = CycleGuard::new();

        assert!(guard.enter(a.id(), "$"));
        assert!(!guard.enter(a.id(), "$.self"));
        assert_eq!(guard.entered_at(a.id()), Some("$"));

        guard.leave(a.id());
        assert_eq!(guard.depth(), 0);
        assert!(guard.enter(a.id(), "$.sibling"));
    }

    #[test]
    fn test_siblings_are_not_cycles() {
        let parent = ObjectRef::new(Vec2::default());
        let shared = ObjectRef::new(Vec2::default());
        let mut guard = CycleGuard::new();

        assert!(guard.enter(parent.id(), "$"));
        assert!(guard.enter(shared.id(), "$.left"));
        guard.leave(shared.id());
        assert!(guard.enter(shared.id(), "$.right"));
        guard.leave(shared.id());
        guard.leave(parent.id());
        assert_eq!(guard.depth(), 0);
    }
}
