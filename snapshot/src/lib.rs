//! Bounded, cycle-safe JSON snapshots of live object graphs
//!
//! `graph_snapshot` turns a graph of shared, possibly cyclic objects into JSON for an
//! editor automation bridge. How much of the graph is emitted depends on the
//! [`DepthLevel`] configured for the operation being served. Cycles, depth cut-offs
//! and faulty fields never fail a call: they show up as explicit markers in the
//! output plus entries in the diagnostics list.
//!
//! ```ignore
//! use graph_snapshot::{GraphObject, ObjectRef, Slot, Snapshotter};
//!
//! #[derive(GraphObject)]
//! struct Light {
//!     pub intensity: f32,
//!     range:         f32,
//! }
//!
//! let light = ObjectRef::new(Light { intensity: 2.0, range: 10.0 });
//! let encoded = Snapshotter::default()
//!     .serialize_for_operation(&Slot::Object(light), "manage_scene", true)?;
//! println!("{}", encoded.json);
//! ```

// Generated code refers to `::graph_snapshot`, which also has to resolve inside this
// crate's own tests
extern crate self as graph_snapshot;

mod constants;
mod depth;
mod diagnostics;
mod encoder;
mod error;
mod object;
mod registry;
mod snapshotter;
mod tracing_setup;
mod type_name;
mod value;
mod walker;

pub use depth::ConfigHandle;
pub use depth::DepthConfig;
pub use depth::DepthConfigDocument;
pub use depth::DepthLevel;
pub use depth::LevelPolicy;
pub use depth::Resolution;
pub use diagnostics::Diagnostic;
pub use diagnostics::Severity;
pub use encoder::JsonLayout;
pub use encoder::encode;
pub use encoder::to_json_value;
pub use error::Error;
pub use error::Result;
pub use graph_snapshot_macros::GraphObject;
pub use object::Color;
pub use object::DynamicObject;
pub use object::FieldInfo;
pub use object::GraphObject;
pub use object::Name;
pub use object::ObjectId;
pub use object::ObjectList;
pub use object::ObjectMap;
pub use object::ObjectRef;
pub use object::Quat;
pub use object::Rect;
pub use object::Slot;
pub use object::ToSlot;
pub use object::TypeInfo;
pub use object::TypeInfoBuilder;
pub use object::Vec2;
pub use object::Vec3;
pub use object::Vec4;
pub use object::Visibility;
pub use registry::Handler;
pub use registry::HandlerEntry;
pub use registry::HandlerFn;
pub use registry::HandlerKey;
pub use registry::HandlerRegistry;
pub use registry::HandlerTable;
pub use registry::MappingHandler;
pub use registry::NameHandler;
pub use registry::OpaqueHandler;
pub use registry::ReflectHandler;
pub use registry::SequenceHandler;
pub use registry::ValueTypeHandler;
pub use snapshotter::EncodedSnapshot;
pub use snapshotter::Snapshotter;
pub use tracing_setup::LazyFileWriter;
pub use tracing_setup::LazyWriter;
pub use tracing_setup::TracingLevel;
pub use tracing_setup::default_log_path;
pub use tracing_setup::init_file_tracing;
pub use type_name::TypeName;
pub use value::GraphValue;
pub use value::Mapping;
pub use value::Marker;
pub use walker::CycleGuard;
pub use walker::PathSegment;
pub use walker::SerializeOptions;
pub use walker::Snapshot;
pub use walker::Walker;
pub use walker::render as render_path;
pub use walker::serialize;
