//! Objects whose type is only known at runtime
//!
//! Embedders that mirror a foreign object model (scene nodes, components, assets)
//! describe each node with a [`TypeInfo`] and fill its slots. Slots can be rewritten
//! after construction so back-references can be wired once every node exists.

use std::sync::RwLock;

use error_stack::Report;

use super::GraphObject;
use super::Slot;
use super::TypeInfo;
use crate::error::Error;
use crate::error::Result;

/// A node with a runtime type descriptor and one slot per declared field
#[derive(Debug)]
pub struct DynamicObject {
    info:   TypeInfo,
    values: RwLock<Vec<Slot>>,
}

impl DynamicObject {
    /// Create a node with every declared field set to `Null`
    #[must_use]
    pub fn new(info: TypeInfo) -> Self {
        let values = vec![Slot::Null; info.fields().len()];
        Self {
            info,
            values: RwLock::new(values),
        }
    }

    /// Set a declared field
    pub fn set(&self, field: &str, value: impl Into<Slot>) -> Result<()> {
        let index = self
            .info
            .field_index(field)
            .ok_or_else(|| Report::new(Error::unknown_field(self.info.name(), field)))?;
        let mut values = self
            .values
            .write()
            .map_err(|_| Report::new(Error::PoisonedLock(self.info.name().clone())))?;
        if let Some(slot) = values.get_mut(index) {
            *slot = value.into();
        }
        Ok(())
    }

    /// Set a declared field, consuming and returning the node for chained construction
    pub fn with(self, field: &str, value: impl Into<Slot>) -> Result<Self> {
        self.set(field, value)?;
        Ok(self)
    }
}

impl GraphObject for DynamicObject {
    fn type_info(&self) -> &TypeInfo { &self.info }

    fn field(&self, index: usize) -> Result<Slot> {
        let values = self
            .values
            .read()
            .map_err(|_| Report::new(Error::PoisonedLock(self.info.name().clone())))?;
        values
            .get(index)
            .cloned()
            .ok_or_else(|| Report::new(Error::field_index(self.info.name(), index)))
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;

    fn node_info() -> TypeInfo {
        TypeInfo::builder("SceneNode")
            .extends("Object")
            .public("name")
            .private("next")
            .build()
    }

    #[test]
    fn test_fields_start_null_and_can_be_set() {
        let node = DynamicObject::new(node_info());
        assert!(node.field(0).is_ok_and(|slot| slot.is_null()));

        assert!(node.set("name", "root").is_ok());
        assert!(matches!(node.field(0), Ok(Slot::String(ref s)) if s == "root"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let node = DynamicObject::new(node_info());
        let error = node.set("missing", 1_i32).err().map(|r| r.current_context().to_string());
        assert_eq!(error.as_deref(), Some("Unknown field `missing` on SceneNode"));
        assert!(node.field(9).is_err());
    }

    #[test]
    fn test_self_reference_wiring() {
        let node = ObjectRef::new(DynamicObject::new(node_info()));
        let wired = node
            .downcast_ref::<DynamicObject>()
            .is_some_and(|n| n.set("next", &node).is_ok());
        assert!(wired);
        assert!(matches!(node.field(1), Ok(Slot::Object(ref o)) if o.same_object(&node)));
    }
}
