//! Search configuration.

use crate::coord::Tile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_MAX_EXPANSIONS: u64 = 250_000_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 1_000_000_000;
pub const DEFAULT_MAX_CHAIN_DEPTH: u32 = 8;

/// Arbitrary caller context carried alongside the kind toggles and limits:
/// the start tile (needed by the lodestone shortcut) and the requirement
/// context map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchExtras {
    pub start_tile: Option<Tile>,
    pub requirements_map: HashMap<String, i64>,
}

/// Immutable-per-search configuration record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    pub use_doors: bool,
    pub use_lodestones: bool,
    pub use_objects: bool,
    pub use_ifslots: bool,
    pub use_npcs: bool,
    pub use_items: bool,

    pub max_expansions: u64,
    pub timeout_ms: u64,
    pub max_chain_depth: u32,

    pub door_cost_override: Option<i64>,
    pub lodestone_cost_override: Option<i64>,
    pub object_cost_override: Option<i64>,
    pub ifslot_cost_override: Option<i64>,
    pub npc_cost_override: Option<i64>,
    pub item_cost_override: Option<i64>,

    pub extras: SearchExtras,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            use_doors: true,
            use_lodestones: true,
            use_objects: true,
            use_ifslots: true,
            use_npcs: true,
            use_items: true,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            door_cost_override: None,
            lodestone_cost_override: None,
            object_cost_override: None,
            ifslot_cost_override: None,
            npc_cost_override: None,
            item_cost_override: None,
            extras: SearchExtras::default(),
        }
    }
}

impl SearchOptions {
    /// Normalize a caller-provided requirements context, coercing booleans
    /// to `0`/`1` at the API boundary.
    pub fn with_requirements<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, RequirementValue)>,
    {
        for (key, value) in pairs {
            self.extras.requirements_map.insert(key, value.into_int());
        }
        self
    }
}

/// A requirement-context value as accepted at the process boundary: plain
/// integers, or booleans that get coerced to `0`/`1`.
#[derive(Debug, Clone, Copy)]
pub enum RequirementValue {
    Int(i64),
    Bool(bool),
}

impl RequirementValue {
    fn into_int(self) -> i64 {
        match self {
            RequirementValue::Int(v) => v,
            RequirementValue::Bool(b) => {
                if b {
                    1
                } else {
                    0
                }
            }
        }
    }
}

impl From<i64> for RequirementValue {
    fn from(v: i64) -> Self {
        RequirementValue::Int(v)
    }
}

impl From<bool> for RequirementValue {
    fn from(v: bool) -> Self {
        RequirementValue::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_are_coerced_to_zero_one() {
        let options = SearchOptions::default()
            .with_requirements([("has_key".to_string(), RequirementValue::Bool(true))]);
        assert_eq!(options.extras.requirements_map["has_key"], 1);
    }

    #[test]
    fn defaults_match_spec() {
        let options = SearchOptions::default();
        assert_eq!(options.max_expansions, DEFAULT_MAX_EXPANSIONS);
        assert_eq!(options.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(options.max_chain_depth, DEFAULT_MAX_CHAIN_DEPTH);
        assert!(options.use_doors && options.use_lodestones && options.use_objects);
    }
}
