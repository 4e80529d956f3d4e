//! Per-type descriptor tables
//!
//! A `TypeInfo` is the explicit replacement for runtime reflection: it lists a type's
//! ancestry (most specific first) and its fields in declaration order. Tables are
//! built once, either by hand through [`TypeInfo::builder`] or at compile time by
//! `#[derive(GraphObject)]`.

use serde::Serialize;
use strum::AsRefStr;
use strum::Display;
use tracing::warn;

use crate::type_name::TypeName;

/// Whether a field is visible at lower depth levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    /// Always visited
    Public,
    /// Visited only by levels that include private fields
    Private,
}

/// One entry of a type's field table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    name:       String,
    visibility: Visibility,
}

impl FieldInfo {
    /// Create a field descriptor
    pub fn new(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            visibility,
        }
    }

    /// Field name as emitted in the snapshot
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// Field visibility
    #[must_use]
    pub const fn visibility(&self) -> Visibility { self.visibility }

    /// True for public fields
    #[must_use]
    pub fn is_public(&self) -> bool { self.visibility == Visibility::Public }
}

/// Descriptor for a runtime type: name, ancestry chain and field table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    name:      TypeName,
    ancestors: Vec<TypeName>,
    fields:    Vec<FieldInfo>,
}

impl TypeInfo {
    /// Start building a descriptor for `name`
    pub fn builder(name: impl Into<TypeName>) -> TypeInfoBuilder {
        TypeInfoBuilder {
            info: Self {
                name:      name.into(),
                ancestors: Vec::new(),
                fields:    Vec::new(),
            },
        }
    }

    /// Descriptor with no ancestors and no fields
    pub fn opaque(name: impl Into<TypeName>) -> Self { Self::builder(name).build() }

    /// The exact runtime type name
    #[must_use]
    pub const fn name(&self) -> &TypeName { &self.name }

    /// Ancestor and capability names, most specific first
    #[must_use]
    pub fn ancestors(&self) -> &[TypeName] { &self.ancestors }

    /// Fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FieldInfo] { &self.fields }

    /// Index of the field called `name`
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// True if this type is `name` or lists it as an ancestor
    #[must_use]
    pub fn is_a(&self, name: &str) -> bool {
        self.name.as_str() == name || self.ancestors.iter().any(|a| a.as_str() == name)
    }
}

/// Builder for [`TypeInfo`]
#[derive(Debug, Clone)]
pub struct TypeInfoBuilder {
    info: TypeInfo,
}

impl TypeInfoBuilder {
    /// Append an ancestor; call from most specific to least specific
    #[must_use]
    pub fn extends(mut self, ancestor: impl Into<TypeName>) -> Self {
        self.info.ancestors.push(ancestor.into());
        self
    }

    /// Append a field; duplicate names are ignored so keys stay unique
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, visibility: Visibility) -> Self {
        let name = name.into();
        if self.info.field_index(&name).is_some() {
            warn!(type_name = %self.info.name, field = %name, "Duplicate field ignored");
            return self;
        }
        self.info.fields.push(FieldInfo::new(name, visibility));
        self
    }

    /// Append a public field
    #[must_use]
    pub fn public(self, name: impl Into<String>) -> Self { self.field(name, Visibility::Public) }

    /// Append a private field
    #[must_use]
    pub fn private(self, name: impl Into<String>) -> Self { self.field(name, Visibility::Private) }

    /// Finish the descriptor
    #[must_use]
    pub fn build(self) -> TypeInfo { self.info }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let info = TypeInfo::builder("Camera")
            .extends("Component")
            .extends("Object")
            .public("fov")
            .private("cached_matrix")
            .public("near")
            .build();

        let names: Vec<&str> = info.fields().iter().map(FieldInfo::name).collect();
        assert_eq!(names, ["fov", "cached_matrix", "near"]);
        assert_eq!(info.field_index("near"), Some(2));
        assert!(info.is_a("Component"));
        assert!(!info.is_a("Renderer"));
    }

    #[test]
    fn test_duplicate_field_ignored() {
        let info = TypeInfo::builder("Light")
            .public("range")
            .private("range")
            .build();
        assert_eq!(info.fields().len(), 1);
        assert!(info.fields()[0].is_public());
    }
}
