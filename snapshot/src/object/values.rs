//! Common value types that ship with built-in handlers
//!
//! These mirror the geometric and scalar wrapper types an editor object model is full
//! of. Built-in handlers emit them as flat numeric objects without walking their
//! fields one by one.

use std::sync::LazyLock;

use super::GraphObject;
use super::Slot;
use super::TypeInfo;
use super::slot::widen_f32;
use crate::constants::TYPE_COLOR;
use crate::constants::TYPE_NAME;
use crate::constants::TYPE_QUATERNION;
use crate::constants::TYPE_RECT;
use crate::constants::TYPE_VALUE_TYPE;
use crate::constants::TYPE_VECTOR2;
use crate::constants::TYPE_VECTOR3;
use crate::constants::TYPE_VECTOR4;
use crate::error::Error;
use crate::error::Result;

macro_rules! float_value_type {
    ($(#[$doc:meta])* $name:ident, $type_name:expr, [$($field:ident),+]) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            $(
                #[doc = concat!("`", stringify!($field), "` component")]
                pub $field: f32,
            )+
        }

        impl $name {
            /// Create from components
            #[must_use]
            pub const fn new($($field: f32),+) -> Self { Self { $($field),+ } }

            /// Component field names in declaration order
            #[must_use]
            pub const fn components(&self) -> &'static [&'static str] { &[$(stringify!($field)),+] }

            /// Component values in declaration order
            #[must_use]
            pub fn values(&self) -> Vec<f32> { vec![$(self.$field),+] }
        }

        impl GraphObject for $name {
            fn type_info(&self) -> &TypeInfo {
                static TYPE_INFO: LazyLock<TypeInfo> = LazyLock::new(|| {
                    TypeInfo::builder($type_name)
                        .extends(TYPE_VALUE_TYPE)
                        $(.public(stringify!($field)))+
                        .build()
                });
                &TYPE_INFO
            }

            fn field(&self, index: usize) -> Result<Slot> {
                self.values()
                    .get(index)
                    .map(|v| Slot::Float(widen_f32(*v)))
                    .ok_or_else(|| Error::field_index(self.type_info().name(), index).into())
            }

            fn as_any(&self) -> &dyn std::any::Any { self }
        }
    };
}

float_value_type!(
    /// Two component vector
    Vec2,
    TYPE_VECTOR2,
    [x, y]
);
float_value_type!(
    /// Three component vector
    Vec3,
    TYPE_VECTOR3,
    [x, y, z]
);
float_value_type!(
    /// Four component vector
    Vec4,
    TYPE_VECTOR4,
    [x, y, z, w]
);
float_value_type!(
    /// Rotation quaternion
    Quat,
    TYPE_QUATERNION,
    [x, y, z, w]
);
float_value_type!(
    /// Linear RGBA color
    Color,
    TYPE_COLOR,
    [r, g, b, a]
);
float_value_type!(
    /// Axis aligned rectangle
    Rect,
    TYPE_RECT,
    [x, y, width, height]
);

/// Scalar wrapper around a display name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name(String);

impl Name {
    /// Create a name
    pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }

    /// The wrapped string
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

static NAME_TYPE_INFO: LazyLock<TypeInfo> =
    LazyLock::new(|| TypeInfo::builder(TYPE_NAME).extends(TYPE_VALUE_TYPE).public("value").build());

impl GraphObject for Name {
    fn type_info(&self) -> &TypeInfo { &NAME_TYPE_INFO }

    fn field(&self, index: usize) -> Result<Slot> {
        match index {
            0 => Ok(Slot::String(self.0.clone())),
            _ => Err(Error::field_index(self.type_info().name(), index).into()),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
