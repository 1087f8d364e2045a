//! Cost model: per-edge-kind millisecond costs and the A* heuristic.

use crate::coord::Tile;
use crate::options::SearchOptions;

/// Base cost (ms) of a single movement step, and the fallback cost for any
/// node-row whose `cost` column is absent and whose option override is unset.
pub const DEFAULT_STEP_COST_MS: i64 = 600;
pub const DEFAULT_NODE_COST_MS: i64 = 600;

/// Centralizes every cost decision so overrides from [`SearchOptions`] are
/// applied consistently, and provides the admissible Chebyshev heuristic.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    step_cost_ms: i64,
}

impl CostModel {
    pub fn new() -> Self {
        Self { step_cost_ms: DEFAULT_STEP_COST_MS }
    }

    pub fn step_cost_ms(&self) -> i64 {
        self.step_cost_ms
    }

    /// Constant base cost for any movement edge; cardinal and diagonal moves
    /// share the same cost so the Chebyshev heuristic stays admissible.
    pub fn movement_cost(&self, _from: Tile, _to: Tile) -> i64 {
        self.step_cost_ms
    }

    pub fn door_cost(&self, options: &SearchOptions, db_cost: Option<i64>) -> i64 {
        Self::with_override(options.door_cost_override, db_cost)
    }

    pub fn lodestone_cost(&self, options: &SearchOptions, db_cost: Option<i64>) -> i64 {
        Self::with_override(options.lodestone_cost_override, db_cost)
    }

    pub fn object_cost(&self, options: &SearchOptions, db_cost: Option<i64>) -> i64 {
        Self::with_override(options.object_cost_override, db_cost)
    }

    pub fn ifslot_cost(&self, options: &SearchOptions, db_cost: Option<i64>) -> i64 {
        Self::with_override(options.ifslot_cost_override, db_cost)
    }

    pub fn npc_cost(&self, options: &SearchOptions, db_cost: Option<i64>) -> i64 {
        Self::with_override(options.npc_cost_override, db_cost)
    }

    pub fn item_cost(&self, options: &SearchOptions, db_cost: Option<i64>) -> i64 {
        Self::with_override(options.item_cost_override, db_cost)
    }

    /// `chebyshev(current, goal) * step_cost_ms` — admissible and, on a
    /// movement-only subgraph, exact.
    pub fn heuristic(&self, current: Tile, goal: Tile) -> i64 {
        current.chebyshev_distance(goal) * self.step_cost_ms
    }

    fn with_override(override_value: Option<i64>, db_value: Option<i64>) -> i64 {
        override_value
            .or(db_value)
            .unwrap_or(DEFAULT_NODE_COST_MS)
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new()
    }
}
