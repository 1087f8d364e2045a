//! Driver: validates inputs, builds the graph provider, runs the search,
//! and logs summary metrics.

use crate::astar;
use crate::coord::Tile;
use crate::errors::Result;
use crate::graph::GraphProvider;
use crate::options::SearchOptions;
use crate::path::PathResult;
use crate::store::WorldStore;
use std::time::Instant;

/// Run a single search against `store`, validating `start`/`goal` first.
///
/// Both tiles must exist in the store before a search is attempted at all.
/// `reason = "invalid-input"` is reserved for malformed input shapes that
/// Rust's typed `Tile` already rules out at the call site; it is kept in
/// the reason vocabulary for parity with callers that match on it
/// exhaustively.
pub fn find_path(store: &dyn WorldStore, start: Tile, goal: Tile, options: &SearchOptions) -> Result<PathResult> {
    let start_time = Instant::now();

    if store.fetch_tile(start.x, start.y, start.plane)?.is_none()
        || store.fetch_tile(goal.x, goal.y, goal.plane)?.is_none()
    {
        tracing::info!(
            ?start, ?goal, reason = "tile-not-found", expanded = 0, path_len = 0, total_cost_ms = 0,
            "find_path metrics"
        );
        return Ok(PathResult::failure("tile-not-found", 0));
    }

    let mut search_options = options.clone();
    search_options.extras.start_tile = Some(start);

    let mut graph = GraphProvider::new(store);
    let result = astar::search(&mut graph, start, goal, &search_options)?;

    let wall_ms = start_time.elapsed().as_millis();
    let path_len = result.path.as_ref().map(Vec::len).unwrap_or(0);
    let req_filtered = graph.req_filtered();
    tracing::info!(
        ?start, ?goal, reason = ?result.reason, expanded = result.expanded, path_len,
        total_cost_ms = result.cost_ms, wall_ms, req_filtered, "find_path metrics"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::rows::TileRow;

    struct SingleTileStore;

    impl WorldStore for SingleTileStore {
        fn fetch_tile(&self, x: i32, y: i32, plane: i32) -> Result<Option<TileRow>> {
            if (x, y, plane) == (0, 0, 0) {
                Ok(Some(TileRow { x, y, plane, tiledata: Some(0), allowed_directions: None, blocked_directions: None }))
            } else {
                Ok(None)
            }
        }
        fn doors_touching(&self, _tile: Tile) -> Result<Vec<crate::store::rows::DoorNodeRow>> {
            Ok(vec![])
        }
        fn all_doors(&self) -> Result<Vec<crate::store::rows::DoorNodeRow>> {
            Ok(vec![])
        }
        fn all_lodestones(&self) -> Result<Vec<crate::store::rows::LodestoneNodeRow>> {
            Ok(vec![])
        }
        fn objects_touching(&self, _tile: Tile) -> Result<Vec<crate::store::rows::ObjectNodeRow>> {
            Ok(vec![])
        }
        fn all_objects(&self) -> Result<Vec<crate::store::rows::ObjectNodeRow>> {
            Ok(vec![])
        }
        fn npcs_touching(&self, _tile: Tile) -> Result<Vec<crate::store::rows::NpcNodeRow>> {
            Ok(vec![])
        }
        fn all_npcs(&self) -> Result<Vec<crate::store::rows::NpcNodeRow>> {
            Ok(vec![])
        }
        fn all_ifslots(&self) -> Result<Vec<crate::store::rows::IfslotNodeRow>> {
            Ok(vec![])
        }
        fn all_items(&self) -> Result<Vec<crate::store::rows::ItemNodeRow>> {
            Ok(vec![])
        }
        fn fetch_requirement(&self, _id: i64) -> Result<Option<crate::requirements::RequirementRow>> {
            Ok(None)
        }
        fn fetch_node(&self, _kind: crate::coord::NodeKind, _id: i64) -> Result<Option<crate::store::rows::NodeRow>> {
            Ok(None)
        }
    }

    #[test]
    fn missing_goal_tile_short_circuits_before_search() {
        let store = SingleTileStore;
        let options = SearchOptions::default();
        let result = find_path(&store, Tile::new(0, 0, 0), Tile::new(1, 1, 0), &options).unwrap();
        assert_eq!(result.reason, Some("tile-not-found"));
        assert_eq!(result.expanded, 0);
    }
}
