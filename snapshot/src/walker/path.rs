//! Object path segments
//!
//! Paths address a position in the snapshot: `$` for the root, `.name` for fields and
//! identifier-like keys, `[3]` for sequence elements and `["two words"]` for keys
//! that are not identifiers.

use crate::constants::ROOT_PATH;

/// One step from a parent to a child
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named field of an object
    Field(String),
    /// Element of a sequence
    Index(usize),
    /// Entry of a mapping
    Key(String),
}

impl PathSegment {
    /// Append this segment's textual form to `path`
    pub fn write_to(&self, path: &mut String) {
        match self {
            Self::Field(name) | Self::Key(name) => push_key(path, name),
            Self::Index(index) => {
                path.push('[');
                path.push_str(&index.to_string());
                path.push(']');
            },
        }
    }
}

/// Render a full path from the root
#[must_use]
pub fn render(segments: &[PathSegment]) -> String {
    let mut path = ROOT_PATH.to_string();
    for segment in segments {
        segment.write_to(&mut path);
    }
    path
}

pub(crate) fn push_key(path: &mut String, key: &str) {
    if is_identifier(key) {
        path.push('.');
        path.push_str(key);
    } else {
        path.push_str("[\"");
        path.push_str(&key.replace('\\', "\\\\").replace('"', "\\\""));
        path.push_str("\"]");
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let segments = [
            PathSegment::Field("children".into()),
            PathSegment::Index(2),
            PathSegment::Key("main camera".into()),
            PathSegment::Key("fov".into()),
        ];
        assert_eq!(render(&segments), r#"$.children[2]["main camera"].fov"#);
        assert_eq!(render(&[]), "$");
    }
}
