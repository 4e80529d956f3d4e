//! Serialization facade for the bridge layer
//!
//! A [`Snapshotter`] pairs a handler registry with the current depth configuration.
//! Callers name the operation they are serving; the configured depth level for that
//! operation decides how much of the graph ends up in the JSON.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::constants::ROOT_PATH;
use crate::depth::ConfigHandle;
use crate::depth::DepthConfig;
use crate::depth::DepthLevel;
use crate::diagnostics::Diagnostic;
use crate::encoder::JsonLayout;
use crate::encoder::encode;
use crate::error::Result;
use crate::object::Slot;
use crate::registry::HandlerRegistry;
use crate::walker::SerializeOptions;
use crate::walker::Snapshot;
use crate::walker::serialize;

/// Wire JSON for one root plus the diagnostics raised producing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedSnapshot {
    /// Encoded JSON text
    pub json:        String,
    /// Diagnostics in the order they were raised
    pub diagnostics: Vec<Diagnostic>,
}

/// Registry plus depth configuration
#[derive(Debug)]
pub struct Snapshotter {
    registry: Arc<HandlerRegistry>,
    config:   ConfigHandle,
}

impl Default for Snapshotter {
    fn default() -> Self { Self::new(HandlerRegistry::global(), DepthConfig::default()) }
}

impl Snapshotter {
    /// Create a snapshotter over an injected registry
    #[must_use]
    pub fn new(registry: Arc<HandlerRegistry>, config: DepthConfig) -> Self {
        Self {
            registry,
            config: ConfigHandle::new(config),
        }
    }

    /// The handler registry
    #[must_use]
    pub const fn registry(&self) -> &Arc<HandlerRegistry> { &self.registry }

    /// The configuration handle; [`ConfigHandle::replace`] hot-reloads it
    #[must_use]
    pub const fn config(&self) -> &ConfigHandle { &self.config }

    /// Depth level configured for `operation`
    #[must_use]
    pub fn level_for(&self, operation: &str) -> DepthLevel {
        self.config.current().resolve(operation)
    }

    /// Serialize to the intermediate tree
    pub fn serialize(&self, root: &Slot, options: impl Into<SerializeOptions>) -> Snapshot {
        serialize(root, options, &self.registry)
    }

    /// Serialize for a named operation and encode as JSON
    ///
    /// A null root yields `null` with no diagnostics, even when the operation's depth
    /// override is malformed. Only an encoding failure is returned as an error.
    pub fn serialize_for_operation(
        &self,
        root: &Slot,
        operation: &str,
        layout: impl Into<JsonLayout>,
    ) -> Result<EncodedSnapshot> {
        let resolution = self.config.current().resolve_detailed(operation);
        debug!(operation, level = %resolution.level, "Serializing snapshot");

        let Snapshot {
            value,
            mut diagnostics,
        } = self.serialize(root, resolution.level);
        if let Some(warning) = resolution.warning
            && !matches!(root, Slot::Null)
        {
            diagnostics.insert(0, Diagnostic::warning(warning, ROOT_PATH));
        }

        Ok(EncodedSnapshot {
            json: encode(&value, layout)?,
            diagnostics,
        })
    }

    /// Serialize several roots in parallel on the rayon pool, one visitation context
    /// per root
    ///
    /// Results are returned in the order of `roots`.
    pub fn serialize_batch(
        &self,
        roots: &[Slot],
        operation: &str,
        layout: impl Into<JsonLayout>,
    ) -> Vec<Result<EncodedSnapshot>> {
        let layout = layout.into();
        roots
            .par_iter()
            .map(|root| self.serialize_for_operation(root, operation, layout))
            .collect()
    }
}
