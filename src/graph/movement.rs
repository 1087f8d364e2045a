//! Movement-edge generation: decode the per-tile direction mask and emit
//! one edge per set bit, in the fixed `[N, S, E, W, NE, NW, SE, SW]`
//! emission order.

use crate::coord::{decode_allowed_directions_text, Tile, TiledataTable, MOVEMENTS};
use crate::cost::CostModel;
use crate::errors::Result;
use crate::graph::edge::{Edge, EdgeMetadata, StepKind};
use crate::store::rows::TileRow;

/// `tile_exists` is a caller-supplied, cache-backed lookup so this function
/// stays a pure transform of its inputs and is unit-testable in isolation.
pub fn movement_edges(
    tile: Tile,
    row: &TileRow,
    tiledata: &TiledataTable,
    cost_model: &CostModel,
    mut tile_exists: impl FnMut(Tile) -> Result<bool>,
) -> Result<Vec<Edge>> {
    let mask = match row.tiledata {
        Some(bits) => tiledata.translate(bits),
        None => row
            .allowed_directions
            .as_deref()
            .map(decode_allowed_directions_text)
            .unwrap_or(0),
    };

    let mut edges = Vec::new();
    for movement in MOVEMENTS.iter() {
        if mask & (1 << movement.internal_bit) == 0 {
            continue;
        }
        let (dx, dy) = movement.delta;
        let to = Tile::new(tile.x + dx, tile.y + dy, tile.plane);
        if !tile_exists(to)? {
            continue;
        }
        edges.push(Edge {
            kind: StepKind::Move,
            from: tile,
            to,
            cost_ms: cost_model.movement_cost(tile, to),
            node: None,
            metadata: EdgeMetadata { action: Some(movement.name.to_string()), ..Default::default() },
        });
    }
    Ok(edges)
}
