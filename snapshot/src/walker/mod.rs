//! The graph walker
//!
//! One [`Walker`] exists per top-level serialize call. It owns the visitation context
//! (the cycle guard, the remaining depth budget and the current object path) and the
//! diagnostics collected so far. Handlers receive `&mut Walker` and call back into it
//! to serialize their children, so every recursion step goes through the same cycle,
//! budget and fault-containment bookkeeping.

mod cycle_guard;
mod path;

use std::any::Any;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

pub use cycle_guard::CycleGuard;
use error_stack::Report;
pub use path::PathSegment;
pub(crate) use path::push_key;
pub use path::render;
use tracing::trace;
use tracing::warn;

use crate::depth::DepthLevel;
use crate::depth::LevelPolicy;
use crate::diagnostics::Diagnostic;
use crate::error::Error;
use crate::error::Result;
use crate::object::ObjectRef;
use crate::object::Slot;
use crate::registry::HandlerRegistry;
use crate::registry::HandlerTable;
use crate::value::GraphValue;
use crate::value::Marker;

/// Per-call serialization options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerializeOptions {
    /// Fidelity tier
    pub level:     DepthLevel,
    /// Recursion budget override; the level's own budget when `None`
    pub max_depth: Option<usize>,
}

impl SerializeOptions {
    /// Options for `level` with its own budget
    #[must_use]
    pub const fn new(level: DepthLevel) -> Self {
        Self {
            level,
            max_depth: None,
        }
    }

    /// Override the recursion budget
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// The effective traversal rules
    #[must_use]
    pub const fn policy(&self) -> LevelPolicy {
        let policy = self.level.policy();
        match self.max_depth {
            Some(max_depth) => policy.with_max_depth(max_depth),
            None => policy,
        }
    }
}

impl From<DepthLevel> for SerializeOptions {
    fn from(level: DepthLevel) -> Self { Self::new(level) }
}

/// Result of one serialize call: the intermediate tree and its diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The intermediate value tree
    pub value:       GraphValue,
    /// Diagnostics in the order they were raised
    pub diagnostics: Vec<Diagnostic>,
}

/// Serialize `root` with the handlers of `registry`
///
/// Never fails: faults inside the graph become error markers plus diagnostics.
pub fn serialize(
    root: &Slot,
    options: impl Into<SerializeOptions>,
    registry: &HandlerRegistry,
) -> Snapshot {
    let mut walker = Walker::new(registry.snapshot(), options.into().policy());
    let value = walker.visit(root);
    walker.finish(value)
}

/// Visitation context of a single serialize call
pub struct Walker {
    table:       Arc<HandlerTable>,
    policy:      LevelPolicy,
    remaining:   usize,
    guard:       CycleGuard,
    path:        Vec<PathSegment>,
    diagnostics: Vec<Diagnostic>,
}

impl Walker {
    /// Start a traversal with a handler table snapshot and a policy
    #[must_use]
    pub fn new(table: Arc<HandlerTable>, policy: LevelPolicy) -> Self {
        Self {
            table,
            policy,
            remaining: policy.max_depth,
            guard: CycleGuard::new(),
            path: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Traversal rules of the active depth level
    #[must_use]
    pub const fn policy(&self) -> &LevelPolicy { &self.policy }

    /// Object levels that may still be expanded below the current node
    #[must_use]
    pub const fn remaining_depth(&self) -> usize { self.remaining }

    /// Path of the node being visited
    #[must_use]
    pub fn current_path(&self) -> String { render(&self.path) }

    /// Diagnostics raised so far
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] { &self.diagnostics }

    /// Record a warning at the current path
    pub fn warn(&mut self, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(message, self.current_path());
        warn!(path = %diagnostic.object_path, message = %diagnostic.message, "Serialization degraded");
        self.diagnostics.push(diagnostic);
    }

    /// Serialize an edge value
    ///
    /// Null and scalars are produced directly and never touch the budget or the cycle
    /// guard.
    pub fn visit(&mut self, slot: &Slot) -> GraphValue {
        match slot {
            Slot::Null => GraphValue::Null,
            Slot::Bool(value) => GraphValue::Bool(*value),
            Slot::Int(value) => GraphValue::Int(*value),
            Slot::UInt(value) => GraphValue::UInt(*value),
            Slot::Float(value) => GraphValue::Float(*value),
            Slot::String(value) => GraphValue::String(value.clone()),
            Slot::Object(object) => self.visit_object(object),
        }
    }

    /// Serialize an object node through its resolved handler
    pub fn visit_object(&mut self, object: &ObjectRef) -> GraphValue {
        let id = object.id();
        let here = self.current_path();

        if !self.guard.enter(id, &here) {
            let reference = self
                .guard
                .entered_at(id)
                .map_or_else(|| here.clone(), str::to_string);
            trace!(path = %here, reference = %reference, type_name = %object.type_name(), "Cycle detected");
            return Marker::Cycle {
                type_name: object.type_name().clone(),
                reference,
            }
            .into();
        }

        let value = if self.remaining == 0 {
            trace!(path = %here, type_name = %object.type_name(), "Depth budget exhausted");
            Marker::Truncated {
                type_name: object.type_name().clone(),
            }
            .into()
        } else {
            self.remaining -= 1;
            let depth = self.path.len();
            let table = Arc::clone(&self.table);
            let handler = table.lookup(object);
            let result = panic::catch_unwind(AssertUnwindSafe(|| handler.convert(object, self)))
                .unwrap_or_else(|payload| {
                    Err(Report::new(Error::handler_failed(
                        handler.name(),
                        format!("panicked: {}", panic_message(payload.as_ref())),
                    )))
                });
            self.path.truncate(depth);
            self.remaining += 1;
            result.unwrap_or_else(|report| self.contain(&report))
        };

        self.guard.leave(id);
        value
    }

    /// Serialize a field read from the current object
    ///
    /// A failed read becomes an error marker at the field's path; siblings are not
    /// affected.
    pub fn visit_field(&mut self, name: &str, slot: Result<Slot>) -> GraphValue {
        self.path.push(PathSegment::Field(name.to_string()));
        let value = match slot {
            Ok(slot) => self.visit(&slot),
            Err(report) => self.contain(&report),
        };
        self.path.pop();
        value
    }

    /// Read the field at `index` of `object`, turning a panicking getter into an error
    pub fn read_field(object: &ObjectRef, index: usize) -> Result<Slot> {
        panic::catch_unwind(AssertUnwindSafe(|| object.field(index))).unwrap_or_else(|payload| {
            Err(Report::new(Error::failed_to(
                &format!("read field {index} of {}", object.type_name()),
                format!("getter panicked: {}", panic_message(payload.as_ref())),
            )))
        })
    }

    /// Serialize the element at `index` of the current sequence
    pub fn visit_element(&mut self, index: usize, slot: &Slot) -> GraphValue {
        self.path.push(PathSegment::Index(index));
        let value = self.visit(slot);
        self.path.pop();
        value
    }

    /// Serialize the entry `key` of the current mapping
    pub fn visit_entry(&mut self, key: &str, slot: &Slot) -> GraphValue {
        self.path.push(PathSegment::Key(key.to_string()));
        let value = self.visit(slot);
        self.path.pop();
        value
    }

    fn contain(&mut self, report: &Report<Error>) -> GraphValue {
        let message = report.current_context().to_string();
        let path = self.current_path();
        warn!(path = %path, error = ?report, "Contained serialization fault");
        self.diagnostics.push(Diagnostic::error(message.clone(), path));
        Marker::Error { message }.into()
    }

    fn finish(self, value: GraphValue) -> Snapshot {
        Snapshot {
            value,
            diagnostics: self.diagnostics,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("policy", &self.policy)
            .field("remaining", &self.remaining)
            .field("path", &self.current_path())
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}
