//! A newtype wrapper for runtime type names
//!
//! `TypeName` is the key handlers are registered under and the name that cycle and
//! truncation markers report. Names may be fully qualified
//! (e.g. "`scene::objects::Transform`") or short ("Transform").

use serde::Deserialize;
use serde::Serialize;

/// A runtime type descriptor name used as a registry key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Get the underlying string reference
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self { Self(s) }
}

impl From<&String> for TypeName {
    fn from(s: &String) -> Self { Self(s.clone()) }
}

impl From<&Self> for TypeName {
    fn from(s: &Self) -> Self { s.clone() }
}

impl From<TypeName> for String {
    fn from(type_name: TypeName) -> Self { type_name.0 }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str { &self.0 }
}
