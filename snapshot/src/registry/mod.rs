//! Type handler registry
//!
//! Handlers convert one object into an intermediate value. Resolution for an instance
//! is, in order:
//!
//! 1. the handler registered for its exact type name
//! 2. the handler registered for its nearest ancestor (most specific first)
//! 3. the first capability matcher, in registration order, whose predicate accepts it
//! 4. the reflective fallback, for types that declare fields
//! 5. the opaque fallback, which always matches
//!
//! The registry is copy-on-write: every serialize call takes an `Arc` snapshot of the
//! handler table once and resolves every node of its traversal against that snapshot
//! without further locking. Registration swaps in a new table, so calls already in
//! flight keep the handlers they started with.

mod builtin;

use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::Once;
use std::sync::PoisonError;
use std::sync::RwLock;

pub use builtin::MappingHandler;
pub use builtin::NameHandler;
pub use builtin::OpaqueHandler;
pub use builtin::ReflectHandler;
pub use builtin::SequenceHandler;
pub use builtin::ValueTypeHandler;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::object::ObjectRef;
use crate::type_name::TypeName;
use crate::value::GraphValue;
use crate::walker::Walker;

/// Process-wide registry for embedders that do not inject their own
static GLOBAL_REGISTRY: LazyLock<Arc<HandlerRegistry>> =
    LazyLock::new(|| Arc::new(HandlerRegistry::new()));

/// Converts an object into an intermediate value
///
/// Handlers recurse through the walker (`visit_field`, `visit_element`, `visit_entry`)
/// so cycle detection, the depth budget and fault containment apply to children. An
/// `Err` is contained by the walker and replaces this object with an error marker.
pub trait Handler: Send + Sync {
    /// Convert `object`
    fn convert(&self, object: &ObjectRef, walker: &mut Walker) -> Result<GraphValue>;

    /// Name shown in listings and handler error messages
    fn name(&self) -> &str { "custom" }
}

impl<F> Handler for F
where
    F: Fn(&ObjectRef, &mut Walker) -> Result<GraphValue> + Send + Sync,
{
    fn convert(&self, object: &ObjectRef, walker: &mut Walker) -> Result<GraphValue> {
        self(object, walker)
    }
}

/// A closure handler with a name for listings
pub struct HandlerFn<F> {
    name:    String,
    convert: F,
}

impl<F> HandlerFn<F>
where
    F: Fn(&ObjectRef, &mut Walker) -> Result<GraphValue> + Send + Sync,
{
    /// Wrap `convert` under `name`
    pub fn new(name: impl Into<String>, convert: F) -> Self {
        Self {
            name: name.into(),
            convert,
        }
    }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&ObjectRef, &mut Walker) -> Result<GraphValue> + Send + Sync,
{
    fn convert(&self, object: &ObjectRef, walker: &mut Walker) -> Result<GraphValue> {
        (self.convert)(object, walker)
    }

    fn name(&self) -> &str { &self.name }
}

type Predicate = Arc<dyn Fn(&ObjectRef) -> bool + Send + Sync>;

#[derive(Clone)]
struct Matcher {
    name:      String,
    predicate: Predicate,
    handler:   Arc<dyn Handler>,
}

/// How a listed handler is selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum HandlerKey {
    /// Registered for an exact type name (also consulted for descendants)
    Type(TypeName),
    /// Capability matcher, by matcher name
    Matcher(String),
    /// Terminal fallback
    Fallback(String),
}

/// One row of [`HandlerRegistry::all_handlers`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerEntry {
    /// How the handler is selected
    pub key:          HandlerKey,
    /// The handler's own name
    pub handler_name: String,
}

/// Immutable handler table a traversal resolves against
#[derive(Clone)]
pub struct HandlerTable {
    exact:    IndexMap<TypeName, Arc<dyn Handler>>,
    matchers: Vec<Matcher>,
    reflect:  Arc<dyn Handler>,
    opaque:   Arc<dyn Handler>,
}

impl Default for HandlerTable {
    fn default() -> Self {
        Self {
            exact:    IndexMap::new(),
            matchers: Vec::new(),
            reflect:  Arc::new(ReflectHandler),
            opaque:   Arc::new(OpaqueHandler),
        }
    }
}

impl HandlerTable {
    /// Resolve the handler for an instance; never fails
    #[must_use]
    pub fn lookup(&self, object: &ObjectRef) -> &dyn Handler {
        let info = object.type_info();

        std::iter::once(info.name())
            .chain(info.ancestors())
            .find_map(|type_name| self.exact.get(type_name))
            .or_else(|| {
                self.matchers
                    .iter()
                    .find(|matcher| (matcher.predicate)(object))
                    .map(|matcher| &matcher.handler)
            })
            .unwrap_or_else(|| {
                if info.fields().is_empty() {
                    &self.opaque
                } else {
                    &self.reflect
                }
            })
            .as_ref()
    }

    fn insert(&mut self, type_name: TypeName, handler: Arc<dyn Handler>) {
        self.exact.insert(type_name, handler);
    }

    fn push_matcher(&mut self, matcher: Matcher) { self.matchers.push(matcher); }

    fn entries(&self) -> Vec<HandlerEntry> {
        let exact = self.exact.iter().map(|(type_name, handler)| HandlerEntry {
            key:          HandlerKey::Type(type_name.clone()),
            handler_name: handler.name().to_string(),
        });
        let matchers = self.matchers.iter().map(|matcher| HandlerEntry {
            key:          HandlerKey::Matcher(matcher.name.clone()),
            handler_name: matcher.handler.name().to_string(),
        });
        let fallbacks = [&self.reflect, &self.opaque]
            .into_iter()
            .map(|handler| HandlerEntry {
                key:          HandlerKey::Fallback(handler.name().to_string()),
                handler_name: handler.name().to_string(),
            });
        exact.chain(matchers).chain(fallbacks).collect()
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTable")
            .field("exact", &self.exact.keys().collect::<Vec<_>>())
            .field(
                "matchers",
                &self.matchers.iter().map(|m| &m.name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Shared, thread-safe set of handlers
///
/// Built-in handlers are installed by [`HandlerRegistry::initialize`], which runs at
/// most once per registry. Registration and lookup both initialize first, so a
/// handler registered before the first serialize call is never overwritten by a
/// built-in.
#[derive(Debug)]
pub struct HandlerRegistry {
    table:       RwLock<Arc<HandlerTable>>,
    initialized: Once,
}

impl Default for HandlerRegistry {
    fn default() -> Self { Self::new() }
}

impl HandlerRegistry {
    /// Create an uninitialized registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            table:       RwLock::new(Arc::new(HandlerTable::default())),
            initialized: Once::new(),
        }
    }

    /// Create a registry with the built-in handlers installed
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.initialize();
        registry
    }

    /// The process-wide registry
    #[must_use]
    pub fn global() -> Arc<Self> { Arc::clone(&GLOBAL_REGISTRY) }

    /// Install the built-in handlers; later calls do nothing
    pub fn initialize(&self) {
        self.initialized.call_once(|| {
            let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
            let table = Arc::make_mut(&mut table);
            builtin::install(table);
            debug!(
                handlers = table.exact.len(),
                matchers = table.matchers.len(),
                "Handler registry initialized"
            );
        });
    }

    /// Register a handler for an exact type name; the last registration wins
    ///
    /// Takes effect for serialize calls that start after this returns.
    pub fn register(&self, type_name: impl Into<TypeName>, handler: impl Handler + 'static) {
        let type_name = type_name.into();
        debug!(type_name = %type_name, handler = handler.name(), "Registering handler");
        self.update(|table| table.insert(type_name, Arc::new(handler)));
    }

    /// Register a capability handler, consulted after exact and ancestor matches
    pub fn register_matcher(
        &self,
        name: impl Into<String>,
        predicate: impl Fn(&ObjectRef) -> bool + Send + Sync + 'static,
        handler: impl Handler + 'static,
    ) {
        let name = name.into();
        debug!(matcher = %name, handler = handler.name(), "Registering matcher");
        self.update(|table| {
            table.push_matcher(Matcher {
                name,
                predicate: Arc::new(predicate),
                handler: Arc::new(handler),
            });
        });
    }

    /// Resolve the handler for an instance
    #[must_use]
    pub fn lookup(&self, object: &ObjectRef) -> HandlerEntry {
        let table = self.snapshot();
        let handler = table.lookup(object);
        HandlerEntry {
            key:          resolved_key(&table, object, handler),
            handler_name: handler.name().to_string(),
        }
    }

    /// Every handler, in resolution order, as of this call
    #[must_use]
    pub fn all_handlers(&self) -> Vec<HandlerEntry> { self.snapshot().entries() }

    /// The current handler table
    #[must_use]
    pub fn snapshot(&self) -> Arc<HandlerTable> {
        self.initialize();
        Arc::clone(&self.table.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn update(&self, change: impl FnOnce(&mut HandlerTable)) {
        self.initialize();
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        change(Arc::make_mut(&mut table));
    }
}

fn resolved_key(table: &HandlerTable, object: &ObjectRef, handler: &dyn Handler) -> HandlerKey {
    let info = object.type_info();
    let same = |candidate: &Arc<dyn Handler>| std::ptr::addr_eq(Arc::as_ptr(candidate), handler);

    if let Some(type_name) = std::iter::once(info.name())
        .chain(info.ancestors())
        .find(|type_name| table.exact.get(*type_name).is_some_and(same))
    {
        return HandlerKey::Type(type_name.clone());
    }
    if let Some(matcher) = table.matchers.iter().find(|m| same(&m.handler)) {
        return HandlerKey::Matcher(matcher.name.clone());
    }
    HandlerKey::Fallback(handler.name().to_string())
}
