//! Edge values of the live graph
//!
//! A `Slot` is what a field, list element or map entry holds: nothing, a scalar, or a
//! reference to another object. Scalars never consume depth budget and never reach
//! the cycle guard.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::ObjectRef;
use super::collections::ObjectList;
use super::collections::ObjectMap;

/// The value stored at one edge of the graph
#[derive(Clone, Default)]
pub enum Slot {
    /// No value
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Signed integer scalar
    Int(i64),
    /// Unsigned integer scalar
    UInt(u64),
    /// Floating point scalar, possibly non-finite
    Float(f64),
    /// String scalar
    String(String),
    /// Reference to another object
    Object(ObjectRef),
}

impl Slot {
    /// True for `Null`
    #[must_use]
    pub const fn is_null(&self) -> bool { matches!(self, Self::Null) }

    /// The referenced object, if this slot holds one
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::UInt(u) => f.debug_tuple("UInt").field(u).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Object(object) => f
                .debug_tuple("Object")
                .field(&object.type_name().as_str())
                .finish(),
        }
    }
}

/// Conversion of a Rust field value into a [`Slot`]
///
/// Implemented for scalars, strings, options, object references and the standard
/// ordered collections. Collections become fresh [`ObjectList`] / [`ObjectMap`]
/// instances, so each read yields a new identity.
pub trait ToSlot {
    /// Produce the slot for this value
    fn to_slot(&self) -> Slot;
}

impl ToSlot for Slot {
    fn to_slot(&self) -> Slot { self.clone() }
}

impl ToSlot for ObjectRef {
    fn to_slot(&self) -> Slot { Slot::Object(self.clone()) }
}

impl ToSlot for bool {
    fn to_slot(&self) -> Slot { Slot::Bool(*self) }
}

macro_rules! impl_to_slot_signed {
    ($($t:ty),*) => {
        $(impl ToSlot for $t {
            fn to_slot(&self) -> Slot { Slot::Int(i64::from(*self)) }
        })*
    };
}

macro_rules! impl_to_slot_unsigned {
    ($($t:ty),*) => {
        $(impl ToSlot for $t {
            fn to_slot(&self) -> Slot { Slot::UInt(u64::from(*self)) }
        })*
    };
}

impl_to_slot_signed!(i8, i16, i32, i64);
impl_to_slot_unsigned!(u8, u16, u32, u64);

impl ToSlot for isize {
    fn to_slot(&self) -> Slot { i64::try_from(*self).map_or(Slot::Null, Slot::Int) }
}

impl ToSlot for usize {
    fn to_slot(&self) -> Slot { u64::try_from(*self).map_or(Slot::Null, Slot::UInt) }
}

impl ToSlot for f32 {
    fn to_slot(&self) -> Slot { Slot::Float(widen_f32(*self)) }
}

/// Widen through the shortest decimal form so `0.1_f32` reads back as `0.1`
pub(crate) fn widen_f32(value: f32) -> f64 {
    value.to_string().parse().unwrap_or_else(|_| f64::from(value))
}

impl ToSlot for f64 {
    fn to_slot(&self) -> Slot { Slot::Float(*self) }
}

impl ToSlot for char {
    fn to_slot(&self) -> Slot { Slot::String(self.to_string()) }
}

impl ToSlot for String {
    fn to_slot(&self) -> Slot { Slot::String(self.clone()) }
}

impl ToSlot for &str {
    fn to_slot(&self) -> Slot { Slot::String((*self).to_string()) }
}

impl<T: ToSlot> ToSlot for Option<T> {
    fn to_slot(&self) -> Slot { self.as_ref().map_or(Slot::Null, ToSlot::to_slot) }
}

impl<T: ToSlot> ToSlot for Vec<T> {
    fn to_slot(&self) -> Slot {
        let list = ObjectList::from_slots(self.iter().map(ToSlot::to_slot).collect());
        Slot::Object(ObjectRef::new(list))
    }
}

impl<T: ToSlot> ToSlot for BTreeMap<String, T> {
    fn to_slot(&self) -> Slot {
        let map = ObjectMap::from_entries(self.iter().map(|(k, v)| (k.clone(), v.to_slot())));
        Slot::Object(ObjectRef::new(map))
    }
}

impl<T: ToSlot> ToSlot for IndexMap<String, T> {
    fn to_slot(&self) -> Slot {
        let map = ObjectMap::from_entries(self.iter().map(|(k, v)| (k.clone(), v.to_slot())));
        Slot::Object(ObjectRef::new(map))
    }
}

macro_rules! impl_slot_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Slot {
            fn from(value: $t) -> Self { value.to_slot() }
        })*
    };
}

impl_slot_from!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, char, String, &str);

impl From<ObjectRef> for Slot {
    fn from(object: ObjectRef) -> Self { Self::Object(object) }
}

impl From<&ObjectRef> for Slot {
    fn from(object: &ObjectRef) -> Self { Self::Object(object.clone()) }
}
