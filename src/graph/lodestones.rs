//! Lodestone-edge generation.
//!
//! Lodestones have no origin constraint, so the provider only considers
//! them from the search's `start_tile` — any optimal path using a
//! lodestone can begin with one. This bounds branching to a single tile
//! per search instead of every tile in the lodestone table.

use crate::coord::{NodeKind, NodeRef, Tile};
use crate::cost::CostModel;
use crate::errors::Result;
use crate::graph::edge::{row_metadata, Edge, StepKind};
use crate::graph::nonhead::NonHeadIndex;
use crate::options::SearchOptions;
use crate::store::rows::{LodestoneNodeRow, NodeRow};

pub fn lodestone_edges(
    tile: Tile,
    start_tile: Option<Tile>,
    rows: &[LodestoneNodeRow],
    non_heads: &NonHeadIndex,
    cost_model: &CostModel,
    options: &SearchOptions,
    mut requirement_gate: impl FnMut(Option<i64>) -> Result<bool>,
    mut tile_exists: impl FnMut(Tile) -> Result<bool>,
) -> Result<Vec<Edge>> {
    if start_tile != Some(tile) {
        return Ok(Vec::new());
    }

    let mut sorted: Vec<&LodestoneNodeRow> = rows.iter().collect();
    sorted.sort_by_key(|r| r.header.id);

    let mut edges = Vec::new();
    for row in sorted {
        let id = row.header.id;
        if non_heads.is_non_head(NodeKind::Lodestone, id) {
            continue;
        }
        if !requirement_gate(row.header.requirement_id)? {
            continue;
        }
        if !tile_exists(row.dest)? {
            continue;
        }
        if row.dest == tile {
            continue;
        }

        let cost_ms = cost_model.lodestone_cost(options, row.header.cost);
        let metadata = row_metadata(&NodeRow::Lodestone(row.clone()));

        edges.push(Edge {
            kind: StepKind::Lodestone,
            from: tile,
            to: row.dest,
            cost_ms,
            node: Some(NodeRef::new(NodeKind::Lodestone, id)),
            metadata,
        });
    }

    edges.sort_by_key(|e| (e.node.map(|n| n.id).unwrap_or_default(), e.to));
    Ok(edges)
}
