//! Door-edge generation.

use crate::coord::{NodeKind, NodeRef, Tile};
use crate::cost::CostModel;
use crate::errors::Result;
use crate::graph::edge::{row_metadata, DoorDirection, Edge, StepKind};
use crate::graph::nonhead::NonHeadIndex;
use crate::options::SearchOptions;
use crate::store::rows::{DoorNodeRow, NodeRow};

pub fn door_edges(
    tile: Tile,
    rows: Vec<DoorNodeRow>,
    non_heads: &NonHeadIndex,
    cost_model: &CostModel,
    options: &SearchOptions,
    mut requirement_gate: impl FnMut(Option<i64>) -> Result<bool>,
    mut tile_exists: impl FnMut(Tile) -> Result<bool>,
) -> Result<Vec<Edge>> {
    let mut edges = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for row in rows {
        let door_id = row.header.id;
        if non_heads.is_non_head(NodeKind::Door, door_id) {
            continue;
        }
        if !requirement_gate(row.header.requirement_id)? {
            continue;
        }

        let (to, direction) = if tile == row.tile_inside {
            (row.tile_outside, DoorDirection::Out)
        } else if tile == row.tile_outside {
            (row.tile_inside, DoorDirection::In)
        } else {
            continue;
        };

        if !tile_exists(to)? {
            tracing::debug!(door_id, %to, "door destination tile missing, skipping");
            continue;
        }

        if !seen.insert((to, door_id)) {
            continue;
        }

        let cost_ms = cost_model.door_cost(options, row.header.cost);
        let mut metadata = row_metadata(&NodeRow::Door(row.clone()));
        metadata.door_direction = Some(direction);

        edges.push(Edge {
            kind: StepKind::Door,
            from: tile,
            to,
            cost_ms,
            node: Some(NodeRef::new(NodeKind::Door, door_id)),
            metadata,
        });
    }

    edges.sort_by_key(|e| (e.to, e.node.map(|n| n.id).unwrap_or_default()));
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::rows::NodeHeader;

    fn door(id: i64, inside: Tile, outside: Tile) -> DoorNodeRow {
        DoorNodeRow {
            header: NodeHeader { id, cost: Some(500), next: None, requirement_id: None },
            direction: Some("north".to_string()),
            tile_inside: inside,
            tile_outside: outside,
            location_open: outside,
            location_closed: outside,
            real_id_open: 10,
            real_id_closed: 11,
            open_action: Some("Open".to_string()),
        }
    }

    #[test]
    fn crossing_from_inside_is_tagged_out() {
        let inside = Tile::new(0, 0, 0);
        let outside = Tile::new(1, 0, 0);
        let rows = vec![door(1, inside, outside)];
        let non_heads = NonHeadIndex::new();
        let cost_model = CostModel::new();
        let options = SearchOptions::default();
        let edges = door_edges(inside, rows, &non_heads, &cost_model, &options, |_| Ok(true), |_| Ok(true)).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, outside);
        assert!(matches!(edges[0].metadata.door_direction, Some(DoorDirection::Out)));
    }

    #[test]
    fn missing_destination_tile_is_skipped() {
        let inside = Tile::new(0, 0, 0);
        let outside = Tile::new(1, 0, 0);
        let rows = vec![door(1, inside, outside)];
        let non_heads = NonHeadIndex::new();
        let cost_model = CostModel::new();
        let options = SearchOptions::default();
        let edges =
            door_edges(inside, rows, &non_heads, &cost_model, &options, |_| Ok(true), |_| Ok(false)).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn failed_requirement_gate_is_skipped() {
        let inside = Tile::new(0, 0, 0);
        let outside = Tile::new(1, 0, 0);
        let rows = vec![door(1, inside, outside)];
        let non_heads = NonHeadIndex::new();
        let cost_model = CostModel::new();
        let options = SearchOptions::default();
        let edges =
            door_edges(inside, rows, &non_heads, &cost_model, &options, |_| Ok(false), |_| Ok(true)).unwrap();
        assert!(edges.is_empty());
    }
}
