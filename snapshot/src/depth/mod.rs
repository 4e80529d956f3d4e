//! Depth levels and the per-operation depth policy
//!
//! A [`DepthLevel`] is a closed, totally ordered set of fidelity tiers. Each tier maps
//! to a [`LevelPolicy`] that the walker and the built-in handlers consult: how deep
//! to recurse, whether private fields are visited, and whether collections are
//! expanded or summarized.

mod config;

pub use config::ConfigHandle;
pub use config::DepthConfig;
pub use config::DepthConfigDocument;
pub use config::Resolution;
use serde::Deserialize;
use serde::Serialize;
use strum::AsRefStr;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

use crate::constants::BASIC_MAX_DEPTH;
use crate::constants::DEEP_ELEMENT_CAP;
use crate::constants::DEEP_MAX_DEPTH;
use crate::constants::FULL_MAX_DEPTH;
use crate::constants::STANDARD_ELEMENT_CAP;
use crate::constants::STANDARD_MAX_DEPTH;

/// Fidelity tier; a higher level never carries less information than a lower one
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DepthLevel {
    /// Shallow listing: public fields, collections summarized
    Basic,
    /// The global default
    #[default]
    Standard,
    /// Public and private fields
    Deep,
    /// Everything the budget allows
    Full,
}

impl DepthLevel {
    /// Parse a configured level name, `None` when it names no level
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> { raw.trim().parse().ok() }

    /// The traversal rules for this level
    #[must_use]
    pub const fn policy(self) -> LevelPolicy {
        match self {
            Self::Basic => LevelPolicy {
                max_depth:          BASIC_MAX_DEPTH,
                include_private:    false,
                expand_collections: false,
                element_cap:        None,
            },
            Self::Standard => LevelPolicy {
                max_depth:          STANDARD_MAX_DEPTH,
                include_private:    false,
                expand_collections: true,
                element_cap:        Some(STANDARD_ELEMENT_CAP),
            },
            Self::Deep => LevelPolicy {
                max_depth:          DEEP_MAX_DEPTH,
                include_private:    true,
                expand_collections: true,
                element_cap:        Some(DEEP_ELEMENT_CAP),
            },
            Self::Full => LevelPolicy {
                max_depth:          FULL_MAX_DEPTH,
                include_private:    true,
                expand_collections: true,
                element_cap:        None,
            },
        }
    }
}

/// Traversal rules derived from a [`DepthLevel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPolicy {
    /// Number of object levels expanded below and including the root
    pub max_depth:          usize,
    /// Visit fields declared private
    pub include_private:    bool,
    /// Expand collection elements; otherwise emit a count summary
    pub expand_collections: bool,
    /// Keep at most this many elements of an expanded collection
    pub element_cap:        Option<usize>,
}

impl LevelPolicy {
    /// Same policy with a different recursion budget
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_levels_totally_ordered() {
        let levels: Vec<DepthLevel> = DepthLevel::iter().collect();
        assert_eq!(
            levels,
            [
                DepthLevel::Basic,
                DepthLevel::Standard,
                DepthLevel::Deep,
                DepthLevel::Full
            ]
        );
        assert!(DepthLevel::Basic < DepthLevel::Full);
    }

    #[test]
    fn test_higher_level_is_superset() {
        for pair in DepthLevel::iter().collect::<Vec<_>>().windows(2) {
            let (lower, higher) = (pair[0].policy(), pair[1].policy());
            assert!(higher.max_depth >= lower.max_depth);
            assert!(higher.include_private || !lower.include_private);
            assert!(higher.expand_collections || !lower.expand_collections);
            if lower.expand_collections {
                let lower_cap = lower.element_cap.unwrap_or(usize::MAX);
                let higher_cap = higher.element_cap.unwrap_or(usize::MAX);
                assert!(higher_cap >= lower_cap);
            }
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(DepthLevel::parse("DEEP"), Some(DepthLevel::Deep));
        assert_eq!(DepthLevel::parse(" basic "), Some(DepthLevel::Basic));
        assert_eq!(DepthLevel::parse("enormous"), None);
        assert_eq!(DepthLevel::Full.to_string(), "full");
    }
}
