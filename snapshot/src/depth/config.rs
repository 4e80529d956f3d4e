//! Per-operation depth configuration
//!
//! The configuration document is loaded by the embedder (from a settings file, an
//! editor preference pane, etc.) and handed over as a [`DepthConfigDocument`] or JSON
//! text. Once converted into a [`DepthConfig`] it is immutable; reloading swaps a new
//! instance into the [`ConfigHandle`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use error_stack::Report;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use super::DepthLevel;
use crate::constants::OP_MANAGE_ASSET;
use crate::constants::OP_MANAGE_COMPONENT;
use crate::constants::OP_MANAGE_GAMEOBJECT;
use crate::constants::OP_MANAGE_SCENE;
use crate::error::Error;
use crate::error::Result;

/// The configuration document as the embedder supplies it
///
/// Level values are kept as raw strings; unrecognized ones degrade to
/// [`DepthLevel::Standard`] at resolution time instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfigDocument {
    /// Level used when an operation has no override
    pub default_level: String,
    /// Operation name to level name
    pub overrides:     HashMap<String, String>,
    /// Alternate operation name to canonical operation name
    pub aliases:       HashMap<String, String>,
}

impl Default for DepthConfigDocument {
    fn default() -> Self {
        Self {
            default_level: DepthLevel::Standard.to_string(),
            overrides:     HashMap::new(),
            aliases:       HashMap::new(),
        }
    }
}

/// Outcome of resolving an operation name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The level that applies
    pub level:   DepthLevel,
    /// Set when the configured value was malformed and the global default was used
    pub warning: Option<String>,
}

/// Immutable, normalized depth configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthConfig {
    default_level: DepthLevel,
    overrides:     HashMap<String, String>,
    aliases:       HashMap<String, String>,
}

impl Default for DepthConfig {
    fn default() -> Self { Self::with_defaults() }
}

impl DepthConfig {
    /// A configuration with no overrides
    #[must_use]
    pub fn new(default_level: DepthLevel) -> Self {
        Self {
            default_level,
            overrides: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Editor bridge defaults: deep scene and object mutation, shallow asset listing
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DepthLevel::Standard)
            .with_override(OP_MANAGE_SCENE, DepthLevel::Deep)
            .with_override(OP_MANAGE_GAMEOBJECT, DepthLevel::Deep)
            .with_override(OP_MANAGE_COMPONENT, DepthLevel::Deep)
            .with_override(OP_MANAGE_ASSET, DepthLevel::Basic)
            .with_alias("scene", OP_MANAGE_SCENE)
            .with_alias("gameobject", OP_MANAGE_GAMEOBJECT)
            .with_alias("game_object", OP_MANAGE_GAMEOBJECT)
            .with_alias("component", OP_MANAGE_COMPONENT)
            .with_alias("asset", OP_MANAGE_ASSET)
            .with_alias("assets", OP_MANAGE_ASSET)
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: DepthConfigDocument = serde_json::from_str(json)
            .map_err(|e| Report::new(Error::invalid("depth configuration", e)))?;
        Ok(Self::from(document))
    }

    /// Add an override
    #[must_use]
    pub fn with_override(mut self, operation: &str, level: DepthLevel) -> Self {
        self.overrides
            .insert(normalize_operation(operation), level.to_string());
        self
    }

    /// Add an alias for an operation name
    #[must_use]
    pub fn with_alias(mut self, alias: &str, operation: &str) -> Self {
        self.aliases
            .insert(normalize_operation(alias), normalize_operation(operation));
        self
    }

    /// Level used when an operation has no override
    #[must_use]
    pub const fn default_level(&self) -> DepthLevel { self.default_level }

    /// Resolve the level for an operation name
    #[must_use]
    pub fn resolve(&self, operation: &str) -> DepthLevel { self.resolve_detailed(operation).level }

    /// Resolve the level for an operation name, reporting malformed overrides
    ///
    /// Matching is case-insensitive and follows aliases. An unknown operation gets the
    /// configured default; an override naming no level gets [`DepthLevel::Standard`].
    #[must_use]
    pub fn resolve_detailed(&self, operation: &str) -> Resolution {
        let key = normalize_operation(operation);
        let canonical = self.aliases.get(&key).unwrap_or(&key);

        let Some(raw) = self.overrides.get(canonical) else {
            return Resolution {
                level:   self.default_level,
                warning: None,
            };
        };

        DepthLevel::parse(raw).map_or_else(
            || {
                let message = format!(
                    "Unknown depth level '{raw}' configured for '{canonical}', using {}",
                    DepthLevel::Standard
                );
                warn!(operation = %canonical, level = %raw, "Malformed depth override");
                Resolution {
                    level:   DepthLevel::Standard,
                    warning: Some(message),
                }
            },
            |level| Resolution {
                level,
                warning: None,
            },
        )
    }
}

impl From<DepthConfigDocument> for DepthConfig {
    fn from(document: DepthConfigDocument) -> Self {
        let default_level = DepthLevel::parse(&document.default_level).unwrap_or_else(|| {
            warn!(
                level = %document.default_level,
                "Malformed default depth level, using standard"
            );
            DepthLevel::Standard
        });

        Self {
            default_level,
            overrides: document
                .overrides
                .into_iter()
                .map(|(operation, level)| (normalize_operation(&operation), level))
                .collect(),
            aliases: document
                .aliases
                .into_iter()
                .map(|(alias, operation)| {
                    (normalize_operation(&alias), normalize_operation(&operation))
                })
                .collect(),
        }
    }
}

fn normalize_operation(operation: &str) -> String { operation.trim().to_lowercase() }

/// Shared holder for the current configuration
///
/// Readers take an `Arc` snapshot; a reload replaces the whole instance so a call in
/// progress keeps the configuration it started with.
#[derive(Debug, Default)]
pub struct ConfigHandle {
    current: RwLock<Arc<DepthConfig>>,
}

impl ConfigHandle {
    /// Wrap an initial configuration
    #[must_use]
    pub fn new(config: DepthConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Snapshot of the configuration in effect
    #[must_use]
    pub fn current(&self) -> Arc<DepthConfig> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swap in a new configuration, returning the previous one
    pub fn replace(&self, config: DepthConfig) -> Arc<DepthConfig> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(config))
    }
}
