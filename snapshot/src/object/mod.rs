//! The live object model the serializer walks
//!
//! Objects are shared through [`ObjectRef`] handles. Identity is the address of the
//! shared allocation, so two instances with equal contents are still distinct nodes
//! while two handles to the same instance are the same node.

mod collections;
mod dynamic;
mod slot;
mod type_info;
mod values;

use std::any::Any;
use std::sync::Arc;

pub use collections::ObjectList;
pub use collections::ObjectMap;
pub use dynamic::DynamicObject;
pub use slot::Slot;
pub use slot::ToSlot;
pub use type_info::FieldInfo;
pub use type_info::TypeInfo;
pub use type_info::TypeInfoBuilder;
pub use type_info::Visibility;
pub use values::Color;
pub use values::Name;
pub use values::Quat;
pub use values::Rect;
pub use values::Vec2;
pub use values::Vec3;
pub use values::Vec4;

use crate::error::Error;
use crate::error::Result;
use crate::type_name::TypeName;

/// A node of the live graph
///
/// Implementors describe themselves through a [`TypeInfo`] table and hand out field
/// values by index. Collections additionally expose [`GraphObject::elements`] or
/// [`GraphObject::entries`]; handlers that match on those capabilities expand them.
///
/// Most types get this through `#[derive(GraphObject)]`.
pub trait GraphObject: Any + Send + Sync {
    /// Descriptor for the runtime type of this instance
    fn type_info(&self) -> &TypeInfo;

    /// Read the field at `index` of [`TypeInfo::fields`]
    ///
    /// A getter that fails returns an error; the walker contains it to this field.
    fn field(&self, index: usize) -> Result<Slot> {
        Err(Error::field_index(self.type_info().name(), index).into())
    }

    /// Sequence capability: the elements in iteration order
    fn elements(&self) -> Option<Result<Vec<Slot>>> { None }

    /// Mapping capability: the entries in iteration order
    fn entries(&self) -> Option<Result<Vec<(String, Slot)>>> { None }

    /// Upcast for downcasting through [`ObjectRef::downcast_ref`]
    fn as_any(&self) -> &dyn Any;
}

/// Reference identity of an object for the duration of one serialize call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

/// Shared handle to a live object
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn GraphObject>);

impl ObjectRef {
    /// Wrap an object in a new shared handle
    pub fn new<T: GraphObject>(object: T) -> Self { Self(Arc::new(object)) }

    /// Wrap an already shared object
    #[must_use]
    pub fn from_arc(object: Arc<dyn GraphObject>) -> Self { Self(object) }

    /// Reference identity of the shared allocation
    #[must_use]
    pub fn id(&self) -> ObjectId { ObjectId(Arc::as_ptr(&self.0).cast::<()>().addr()) }

    /// True if both handles point at the same instance
    #[must_use]
    pub fn same_object(&self, other: &Self) -> bool { self.id() == other.id() }

    /// Runtime type name of the instance
    #[must_use]
    pub fn type_name(&self) -> &TypeName { self.0.type_info().name() }

    /// The referenced object
    #[must_use]
    pub fn get(&self) -> &dyn GraphObject { self.0.as_ref() }

    /// Downcast to a concrete object type
    #[must_use]
    pub fn downcast_ref<T: GraphObject>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl std::ops::Deref for ObjectRef {
    type Target = dyn GraphObject;

    fn deref(&self) -> &Self::Target { self.0.as_ref() }
}

impl std::fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type_name", self.type_name())
            .field("id", &self.id())
            .finish()
    }
}
