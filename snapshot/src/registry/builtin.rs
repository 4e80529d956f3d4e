//! Built-in handlers
//!
//! Installed once by [`super::HandlerRegistry::initialize`]. Value types and the
//! collection types are registered by exact name; user collections that only expose
//! the sequence or mapping capability are picked up by the two matchers.

use std::sync::Arc;

use error_stack::Report;

use super::Handler;
use super::HandlerTable;
use super::Matcher;
use crate::constants::SUMMARY_FIELD_COUNT;
use crate::constants::SUMMARY_FIELD_TYPE;
use crate::constants::TYPE_COLOR;
use crate::constants::TYPE_LIST;
use crate::constants::TYPE_MAP;
use crate::constants::TYPE_NAME;
use crate::constants::TYPE_QUATERNION;
use crate::constants::TYPE_RECT;
use crate::constants::TYPE_VECTOR2;
use crate::constants::TYPE_VECTOR3;
use crate::constants::TYPE_VECTOR4;
use crate::error::Error;
use crate::error::Result;
use crate::object::Name;
use crate::object::ObjectRef;
use crate::object::Slot;
use crate::value::GraphValue;
use crate::value::Mapping;
use crate::walker::Walker;

pub(super) fn install(table: &mut HandlerTable) {
    let value_type: Arc<dyn Handler> = Arc::new(ValueTypeHandler);
    for type_name in [
        TYPE_VECTOR2,
        TYPE_VECTOR3,
        TYPE_VECTOR4,
        TYPE_QUATERNION,
        TYPE_COLOR,
        TYPE_RECT,
    ] {
        table.insert(type_name.into(), Arc::clone(&value_type));
    }
    table.insert(TYPE_NAME.into(), Arc::new(NameHandler));

    let sequence: Arc<dyn Handler> = Arc::new(SequenceHandler);
    let mapping: Arc<dyn Handler> = Arc::new(MappingHandler);
    table.insert(TYPE_LIST.into(), Arc::clone(&sequence));
    table.insert(TYPE_MAP.into(), Arc::clone(&mapping));

    table.push_matcher(Matcher {
        name:      "sequence".to_string(),
        predicate: Arc::new(|object: &ObjectRef| object.elements().is_some()),
        handler:   sequence,
    });
    table.push_matcher(Matcher {
        name:      "mapping".to_string(),
        predicate: Arc::new(|object: &ObjectRef| object.entries().is_some()),
        handler:   mapping,
    });
}

/// `{"type": T}` for objects that expose nothing else
fn type_only(object: &ObjectRef) -> Mapping {
    let mut fields = Mapping::new();
    fields.insert(
        SUMMARY_FIELD_TYPE.to_string(),
        GraphValue::String(object.type_name().to_string()),
    );
    fields
}

/// `{"type": T, "count": n}` for collections the level does not expand
fn summary(object: &ObjectRef, count: usize) -> GraphValue {
    let mut fields = type_only(object);
    fields.insert(
        SUMMARY_FIELD_COUNT.to_string(),
        u64::try_from(count).map_or(GraphValue::Null, GraphValue::UInt),
    );
    GraphValue::Mapping(fields)
}

/// Number of elements to keep, warning when the level's cap cuts the collection
fn capped_len(walker: &mut Walker, total: usize) -> usize {
    match walker.policy().element_cap {
        Some(cap) if cap < total => {
            walker.warn(format!("collection truncated to {cap} of {total} elements"));
            cap
        },
        _ => total,
    }
}

/// Generic fallback: the declared fields in declaration order
///
/// Private fields are skipped unless the active level includes them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectHandler;

impl Handler for ReflectHandler {
    fn convert(&self, object: &ObjectRef, walker: &mut Walker) -> Result<GraphValue> {
        let include_private = walker.policy().include_private;
        let mut fields = Mapping::new();
        for (index, field) in object.type_info().fields().iter().enumerate() {
            if !include_private && !field.is_public() {
                continue;
            }
            let slot = Walker::read_field(object, index);
            let value = walker.visit_field(field.name(), slot);
            fields.insert(field.name().to_string(), value);
        }
        Ok(GraphValue::Mapping(fields))
    }

    fn name(&self) -> &str { "reflect" }
}

/// Terminal fallback: the type name only
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueHandler;

impl Handler for OpaqueHandler {
    fn convert(&self, object: &ObjectRef, _walker: &mut Walker) -> Result<GraphValue> {
        Ok(GraphValue::Mapping(type_only(object)))
    }

    fn name(&self) -> &str { "opaque" }
}

/// Sequence capability: expanded elements, or a count summary at shallow levels
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceHandler;

impl Handler for SequenceHandler {
    fn convert(&self, object: &ObjectRef, walker: &mut Walker) -> Result<GraphValue> {
        let elements = object.elements().ok_or_else(|| {
            Report::new(Error::handler_failed(
                self.name(),
                format!("{} has no elements", object.type_name()),
            ))
        })??;

        if !walker.policy().expand_collections {
            return Ok(summary(object, elements.len()));
        }

        let kept = capped_len(walker, elements.len());
        let values = elements
            .iter()
            .take(kept)
            .enumerate()
            .map(|(index, slot)| walker.visit_element(index, slot))
            .collect();
        Ok(GraphValue::Sequence(values))
    }

    fn name(&self) -> &str { "sequence" }
}

/// Mapping capability: expanded entries in source order, or a count summary
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingHandler;

impl Handler for MappingHandler {
    fn convert(&self, object: &ObjectRef, walker: &mut Walker) -> Result<GraphValue> {
        let entries = object.entries().ok_or_else(|| {
            Report::new(Error::handler_failed(
                self.name(),
                format!("{} has no entries", object.type_name()),
            ))
        })??;

        if !walker.policy().expand_collections {
            return Ok(summary(object, entries.len()));
        }

        let kept = capped_len(walker, entries.len());
        let mut values = Mapping::with_capacity(kept);
        for (key, slot) in entries.iter().take(kept) {
            let value = walker.visit_entry(key, slot);
            values.insert(key.clone(), value);
        }
        Ok(GraphValue::Mapping(values))
    }

    fn name(&self) -> &str { "mapping" }
}

/// Geometric value types as flat numeric objects
///
/// Component reads are not walked as fields: a value type is emitted whole or not at
/// all.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueTypeHandler;

impl Handler for ValueTypeHandler {
    fn convert(&self, object: &ObjectRef, walker: &mut Walker) -> Result<GraphValue> {
        let mut components = Mapping::new();
        for (index, field) in object.type_info().fields().iter().enumerate() {
            let value = match object.field(index)? {
                Slot::Object(_) => {
                    return Err(Report::new(Error::handler_failed(
                        self.name(),
                        format!("component `{}` is not a scalar", field.name()),
                    )));
                },
                scalar => walker.visit(&scalar),
            };
            components.insert(field.name().to_string(), value);
        }
        Ok(GraphValue::Mapping(components))
    }

    fn name(&self) -> &str { "value_type" }
}

/// Scalar wrapper: a `Name` is emitted as its string
#[derive(Debug, Clone, Copy, Default)]
pub struct NameHandler;

impl Handler for NameHandler {
    fn convert(&self, object: &ObjectRef, walker: &mut Walker) -> Result<GraphValue> {
        if let Some(name) = object.downcast_ref::<Name>() {
            return Ok(GraphValue::String(name.as_str().to_string()));
        }
        match object.field(0)? {
            Slot::Object(_) => Err(Report::new(Error::handler_failed(
                self.name(),
                format!("{} does not wrap a scalar", object.type_name()),
            ))),
            scalar => Ok(walker.visit(&scalar)),
        }
    }

    fn name(&self) -> &str { "name" }
}
