//! Identity-bearing collections
//!
//! Both collections use interior mutability so a graph can be wired after its nodes
//! exist, which is the only way to build a cycle through shared handles.

use std::sync::LazyLock;
use std::sync::RwLock;

use error_stack::Report;
use indexmap::IndexMap;

use super::GraphObject;
use super::Slot;
use super::TypeInfo;
use crate::constants::TYPE_COLLECTION;
use crate::constants::TYPE_LIST;
use crate::constants::TYPE_MAP;
use crate::error::Error;
use crate::error::Result;

static LIST_TYPE_INFO: LazyLock<TypeInfo> =
    LazyLock::new(|| TypeInfo::builder(TYPE_LIST).extends(TYPE_COLLECTION).build());

static MAP_TYPE_INFO: LazyLock<TypeInfo> =
    LazyLock::new(|| TypeInfo::builder(TYPE_MAP).extends(TYPE_COLLECTION).build());

/// Ordered sequence of slots
#[derive(Debug, Default)]
pub struct ObjectList {
    items: RwLock<Vec<Slot>>,
}

impl ObjectList {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Create a list from existing slots
    #[must_use]
    pub fn from_slots(items: Vec<Slot>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Append a value
    pub fn push(&self, value: impl Into<Slot>) -> Result<()> {
        self.items
            .write()
            .map_err(|_| Report::new(Error::PoisonedLock(LIST_TYPE_INFO.name().clone())))?
            .push(value.into());
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Slot>>> {
        self.items
            .read()
            .map_err(|_| Report::new(Error::PoisonedLock(LIST_TYPE_INFO.name().clone())))
    }
}

impl GraphObject for ObjectList {
    fn type_info(&self) -> &TypeInfo { &LIST_TYPE_INFO }

    fn elements(&self) -> Option<Result<Vec<Slot>>> {
        Some(self.read().map(|items| items.clone()))
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

/// String-keyed mapping that preserves insertion order
#[derive(Debug, Default)]
pub struct ObjectMap {
    entries: RwLock<IndexMap<String, Slot>>,
}

impl ObjectMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Create a map from entries; later duplicates replace earlier values in place
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Slot)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Insert or replace an entry
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Slot>) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| Report::new(Error::PoisonedLock(MAP_TYPE_INFO.name().clone())))?
            .insert(key.into(), value.into());
        Ok(())
    }
}

impl GraphObject for ObjectMap {
    fn type_info(&self) -> &TypeInfo { &MAP_TYPE_INFO }

    fn entries(&self) -> Option<Result<Vec<(String, Slot)>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Report::new(Error::PoisonedLock(MAP_TYPE_INFO.name().clone())))
            .map(|entries| {
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            });
        Some(entries)
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;

    #[test]
    fn test_list_can_contain_itself() {
        let list = ObjectRef::new(ObjectList::new());
        let pushed = list
            .downcast_ref::<ObjectList>()
            .map(|l| l.push(list.clone()).is_ok());
        assert_eq!(pushed, Some(true));

        let first = list
            .elements()
            .and_then(std::result::Result::ok)
            .and_then(|items| items.first().and_then(Slot::as_object).cloned());
        assert!(first.is_some_and(|f| f.same_object(&list)));
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let map = ObjectMap::new();
        for key in ["zeta", "alpha", "mid"] {
            assert!(map.insert(key, 1_i32).is_ok());
        }
        let keys: Vec<String> = map
            .entries()
            .and_then(std::result::Result::ok)
            .map(|entries| entries.into_iter().map(|(k, _)| k).collect())
            .unwrap_or_default();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
