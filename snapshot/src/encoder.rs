//! Intermediate tree to JSON
//!
//! The structural mapping is total: every [`GraphValue`] has a JSON form. Markers and
//! floats JSON cannot represent become objects carrying the reserved `"__marker"`
//! discriminator, so the output is always a valid document.

use error_stack::ResultExt;
use json_pretty_compact::PrettyCompactFormatter;
use serde_json::Map;
use serde_json::Number;
use serde_json::Serializer;
use serde_json::Value;
use strum::Display;
use strum::EnumString;

use crate::constants::MARKER_FIELD_MESSAGE;
use crate::constants::MARKER_FIELD_REF;
use crate::constants::MARKER_FIELD_TYPE;
use crate::constants::MARKER_FIELD_VALUE;
use crate::constants::MARKER_KEY;
use crate::constants::MARKER_NON_FINITE;
use crate::error::Error;
use crate::error::Result;
use crate::value::GraphValue;
use crate::value::Marker;

/// Text layout of encoded JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum JsonLayout {
    /// No whitespace
    #[default]
    Compact,
    /// Two-space indentation, one value per line
    Pretty,
    /// Indented objects with arrays of scalars kept on one line
    PrettyCompact,
}

impl From<bool> for JsonLayout {
    fn from(pretty: bool) -> Self { if pretty { Self::Pretty } else { Self::Compact } }
}

/// Structural mapping of the intermediate tree onto `serde_json`
#[must_use]
pub fn to_json_value(value: &GraphValue) -> Value {
    match value {
        GraphValue::Null => Value::Null,
        GraphValue::Bool(b) => Value::Bool(*b),
        GraphValue::Int(i) => Value::from(*i),
        GraphValue::UInt(u) => Value::from(*u),
        GraphValue::Float(f) => float_to_json(*f),
        GraphValue::String(s) => Value::String(s.clone()),
        GraphValue::Sequence(items) => Value::Array(items.iter().map(to_json_value).collect()),
        GraphValue::Mapping(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), to_json_value(value)))
                .collect(),
        ),
        GraphValue::Marker(marker) => marker_to_json(marker),
    }
}

fn float_to_json(value: f64) -> Value {
    Number::from_f64(value).map_or_else(
        || {
            let text = if value.is_nan() {
                "NaN"
            } else if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            let mut marker = Map::new();
            marker.insert(MARKER_KEY.to_string(), Value::from(MARKER_NON_FINITE));
            marker.insert(MARKER_FIELD_VALUE.to_string(), Value::from(text));
            Value::Object(marker)
        },
        Value::Number,
    )
}

fn marker_to_json(marker: &Marker) -> Value {
    let mut object = Map::new();
    object.insert(MARKER_KEY.to_string(), Value::from(marker.kind()));
    match marker {
        Marker::Cycle {
            type_name,
            reference,
        } => {
            object.insert(MARKER_FIELD_TYPE.to_string(), Value::from(type_name.as_str()));
            object.insert(MARKER_FIELD_REF.to_string(), Value::from(reference.as_str()));
        },
        Marker::Truncated { type_name } => {
            object.insert(MARKER_FIELD_TYPE.to_string(), Value::from(type_name.as_str()));
        },
        Marker::Error { message } => {
            object.insert(MARKER_FIELD_MESSAGE.to_string(), Value::from(message.as_str()));
        },
    }
    Value::Object(object)
}

/// Encode the intermediate tree as JSON text
///
/// Failure here is the only fault a snapshot call propagates.
pub fn encode(value: &GraphValue, layout: impl Into<JsonLayout>) -> Result<String> {
    let json = to_json_value(value);
    match layout.into() {
        JsonLayout::Compact => serde_json::to_string(&json)
            .map_err(|e| Error::Encoding(format!("Failed to encode snapshot: {e}")).into()),
        JsonLayout::Pretty => serde_json::to_string_pretty(&json)
            .map_err(|e| Error::Encoding(format!("Failed to encode snapshot: {e}")).into()),
        JsonLayout::PrettyCompact => {
            use serde::Serialize;

            let mut buf = Vec::new();
            let mut ser = Serializer::with_formatter(&mut buf, PrettyCompactFormatter::new());
            json.serialize(&mut ser)
                .map_err(|e| Error::Encoding(format!("Failed to encode snapshot: {e}")))?;

            String::from_utf8(buf).change_context(Error::Encoding(
                "Encoded snapshot is not valid UTF-8".to_string(),
            ))
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::type_name::TypeName;

    #[test]
    fn test_non_finite_floats_become_markers() {
        let tree = GraphValue::Sequence(vec![
            GraphValue::Float(f64::NAN),
            GraphValue::Float(f64::NEG_INFINITY),
            GraphValue::Float(1.5),
        ]);
        assert_eq!(
            to_json_value(&tree),
            json!([
                {"__marker": "non_finite", "value": "NaN"},
                {"__marker": "non_finite", "value": "-Infinity"},
                1.5
            ])
        );
    }

    #[test]
    fn test_marker_wire_format() {
        let tree = GraphValue::mapping([
            (
                "parent",
                GraphValue::from(Marker::Cycle {
                    type_name: TypeName::from("Transform"),
                    reference: "$".to_string(),
                }),
            ),
            (
                "mesh",
                GraphValue::from(Marker::Truncated {
                    type_name: TypeName::from("Mesh"),
                }),
            ),
            (
                "material",
                GraphValue::from(Marker::Error {
                    message: "destroyed".to_string(),
                }),
            ),
        ]);
        assert_eq!(
            to_json_value(&tree),
            json!({
                "parent": {"__marker": "cycle", "type": "Transform", "ref": "$"},
                "mesh": {"__marker": "truncated", "type": "Mesh"},
                "material": {"__marker": "error", "message": "destroyed"}
            })
        );
    }

    #[test]
    fn test_layouts() {
        let tree = GraphValue::mapping([("a", GraphValue::Sequence(vec![GraphValue::Int(1)]))]);

        assert_eq!(encode(&tree, false).ok().as_deref(), Some(r#"{"a":[1]}"#));
        assert_eq!(
            encode(&tree, true).ok().as_deref(),
            Some("{\n  \"a\": [\n    1\n  ]\n}")
        );
        assert_eq!(encode(&GraphValue::Null, true).ok().as_deref(), Some("null"));

        let pretty_compact = encode(&tree, JsonLayout::PrettyCompact).unwrap_or_default();
        assert_eq!(
            serde_json::from_str::<Value>(&pretty_compact).ok(),
            Some(to_json_value(&tree))
        );
    }

    #[test]
    fn test_field_order_is_stable() {
        let tree = GraphValue::mapping([
            ("z", GraphValue::Int(1)),
            ("a", GraphValue::Int(2)),
            ("m", GraphValue::Int(3)),
        ]);
        assert_eq!(
            encode(&tree, JsonLayout::Compact).ok().as_deref(),
            Some(r#"{"z":1,"a":2,"m":3}"#)
        );
    }
}
