//! The intermediate value tree
//!
//! `GraphValue` is the serializer's own structural type. It carries plain data plus
//! explicit markers for fidelity loss, and is decoupled from the JSON wire form that
//! [`crate::encoder`] produces from it.

use indexmap::IndexMap;

use crate::constants::ROOT_PATH;
use crate::type_name::TypeName;
use crate::walker::push_key;

/// Ordered mapping with unique keys
pub type Mapping = IndexMap<String, GraphValue>;

/// A node of the intermediate tree
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValue {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Float; non-finite values are encoded as markers
    Float(f64),
    /// String
    String(String),
    /// Ordered elements
    Sequence(Vec<Self>),
    /// Ordered fields or entries
    Mapping(Mapping),
    /// Fidelity loss in place of real data
    Marker(Marker),
}

/// Reserved variants that stand in for data the walker did not emit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Back-reference to an object already on the current path
    Cycle {
        /// Type of the referenced object
        type_name: TypeName,
        /// Path at which the referenced ancestor was entered
        reference: String,
    },
    /// Object cut off by the depth budget
    Truncated {
        /// Type of the object that was not expanded
        type_name: TypeName,
    },
    /// Contained fault
    Error {
        /// What went wrong
        message: String,
    },
}

impl Marker {
    /// Short discriminator name
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Cycle { .. } => crate::constants::MARKER_CYCLE,
            Self::Truncated { .. } => crate::constants::MARKER_TRUNCATED,
            Self::Error { .. } => crate::constants::MARKER_ERROR,
        }
    }
}

impl GraphValue {
    /// Build a mapping from ordered pairs
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// True for `Null`
    #[must_use]
    pub const fn is_null(&self) -> bool { matches!(self, Self::Null) }

    /// The marker, if this node is one
    #[must_use]
    pub const fn as_marker(&self) -> Option<&Marker> {
        match self {
            Self::Marker(marker) => Some(marker),
            _ => None,
        }
    }

    /// Child value by field name or entry key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Every marker in the tree with its object path, in emission order
    #[must_use]
    pub fn markers(&self) -> Vec<(String, &Marker)> {
        let mut found = Vec::new();
        self.collect_markers(ROOT_PATH.to_string(), &mut found);
        found
    }

    fn collect_markers<'a>(&'a self, path: String, found: &mut Vec<(String, &'a Marker)>) {
        match self {
            Self::Marker(marker) => found.push((path, marker)),
            Self::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    item.collect_markers(format!("{path}[{index}]"), found);
                }
            },
            Self::Mapping(map) => {
                for (key, value) in map {
                    let mut child = path.clone();
                    push_key(&mut child, key);
                    value.collect_markers(child, found);
                }
            },
            Self::Null
            | Self::Bool(_)
            | Self::Int(_)
            | Self::UInt(_)
            | Self::Float(_)
            | Self::String(_) => {},
        }
    }

    /// Depth of the deepest nested container; scalars and markers count as zero
    #[must_use]
    pub fn nesting_depth(&self) -> usize {
        match self {
            Self::Sequence(items) => 1 + items.iter().map(Self::nesting_depth).max().unwrap_or(0),
            Self::Mapping(map) => 1 + map.values().map(Self::nesting_depth).max().unwrap_or(0),
            _ => 0,
        }
    }
}

impl From<Marker> for GraphValue {
    fn from(marker: Marker) -> Self { Self::Marker(marker) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_report_paths() {
        let tree = GraphValue::mapping([
            ("name", GraphValue::String("root".into())),
            (
                "children",
                GraphValue::Sequence(vec![
                    GraphValue::Null,
                    Marker::Truncated {
                        type_name: TypeName::from("Node"),
                    }
                    .into(),
                ]),
            ),
            (
                "broken",
                Marker::Error {
                    message: "detached".into(),
                }
                .into(),
            ),
        ]);

        let markers: Vec<(String, &str)> = tree
            .markers()
            .into_iter()
            .map(|(path, marker)| (path, marker.kind()))
            .collect();
        assert_eq!(
            markers,
            [
                ("$.children[1]".to_string(), "truncated"),
                ("$.broken".to_string(), "error"),
            ]
        );
        assert_eq!(tree.nesting_depth(), 2);
    }
}
