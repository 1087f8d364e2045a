//! Chain-resolved edge generation shared by object, NPC, ifslot, and item
//! nodes. All four kinds collect candidate rows, gate them,
//! resolve their chain, pick a concrete destination tile inside the
//! resulting rectangle, and emit one edge per surviving candidate —
//! differing only in which table they read and which per-kind metadata
//! fields a row carries (handled generically by `row_metadata`).

use crate::chain::ChainResolution;
use crate::coord::{NodeKind, NodeRef, Plane, Rect, Tile};
use crate::errors::Result;
use crate::graph::edge::{row_metadata, ChainStepMeta, Edge};
use crate::graph::nonhead::NonHeadIndex;
use crate::store::rows::{IfslotNodeRow, ItemNodeRow, NodeRow, NpcNodeRow, ObjectNodeRow};
use std::collections::HashSet;

trait ActionRow {
    fn id(&self) -> i64;
    fn requirement_id(&self) -> Option<i64>;
    fn into_node_row(self) -> NodeRow;
}

impl ActionRow for ObjectNodeRow {
    fn id(&self) -> i64 {
        self.header.id
    }
    fn requirement_id(&self) -> Option<i64> {
        self.header.requirement_id
    }
    fn into_node_row(self) -> NodeRow {
        NodeRow::Object(self)
    }
}

impl ActionRow for NpcNodeRow {
    fn id(&self) -> i64 {
        self.header.id
    }
    fn requirement_id(&self) -> Option<i64> {
        self.header.requirement_id
    }
    fn into_node_row(self) -> NodeRow {
        NodeRow::Npc(self)
    }
}

impl ActionRow for IfslotNodeRow {
    fn id(&self) -> i64 {
        self.header.id
    }
    fn requirement_id(&self) -> Option<i64> {
        self.header.requirement_id
    }
    fn into_node_row(self) -> NodeRow {
        NodeRow::Ifslot(self)
    }
}

impl ActionRow for ItemNodeRow {
    fn id(&self) -> i64 {
        self.header.id
    }
    fn requirement_id(&self) -> Option<i64> {
        self.header.requirement_id
    }
    fn into_node_row(self) -> NodeRow {
        NodeRow::Item(self)
    }
}

pub fn object_edges(
    tile: Tile,
    rows: Vec<ObjectNodeRow>,
    non_heads: &NonHeadIndex,
    requirement_gate: impl FnMut(Option<i64>) -> Result<bool>,
    resolve_chain: impl FnMut(NodeRef) -> Result<ChainResolution>,
    tile_exists: impl FnMut(Tile) -> Result<bool>,
) -> Result<Vec<Edge>> {
    chain_resolved_edges(NodeKind::Object, tile, rows, non_heads, requirement_gate, resolve_chain, tile_exists)
}

pub fn npc_edges(
    tile: Tile,
    rows: Vec<NpcNodeRow>,
    non_heads: &NonHeadIndex,
    requirement_gate: impl FnMut(Option<i64>) -> Result<bool>,
    resolve_chain: impl FnMut(NodeRef) -> Result<ChainResolution>,
    tile_exists: impl FnMut(Tile) -> Result<bool>,
) -> Result<Vec<Edge>> {
    chain_resolved_edges(NodeKind::Npc, tile, rows, non_heads, requirement_gate, resolve_chain, tile_exists)
}

pub fn ifslot_edges(
    tile: Tile,
    rows: Vec<IfslotNodeRow>,
    non_heads: &NonHeadIndex,
    requirement_gate: impl FnMut(Option<i64>) -> Result<bool>,
    resolve_chain: impl FnMut(NodeRef) -> Result<ChainResolution>,
    tile_exists: impl FnMut(Tile) -> Result<bool>,
) -> Result<Vec<Edge>> {
    chain_resolved_edges(NodeKind::Ifslot, tile, rows, non_heads, requirement_gate, resolve_chain, tile_exists)
}

pub fn item_edges(
    tile: Tile,
    rows: Vec<ItemNodeRow>,
    non_heads: &NonHeadIndex,
    requirement_gate: impl FnMut(Option<i64>) -> Result<bool>,
    resolve_chain: impl FnMut(NodeRef) -> Result<ChainResolution>,
    tile_exists: impl FnMut(Tile) -> Result<bool>,
) -> Result<Vec<Edge>> {
    chain_resolved_edges(NodeKind::Item, tile, rows, non_heads, requirement_gate, resolve_chain, tile_exists)
}

fn chain_resolved_edges<R: ActionRow>(
    kind: NodeKind,
    tile: Tile,
    rows: Vec<R>,
    non_heads: &NonHeadIndex,
    mut requirement_gate: impl FnMut(Option<i64>) -> Result<bool>,
    mut resolve_chain: impl FnMut(NodeRef) -> Result<ChainResolution>,
    mut tile_exists: impl FnMut(Tile) -> Result<bool>,
) -> Result<Vec<Edge>> {
    let mut edges = Vec::new();
    let mut seen: HashSet<(i64, Tile)> = HashSet::new();

    for row in rows {
        let id = row.id();
        if non_heads.is_non_head(kind, id) {
            continue;
        }
        if !requirement_gate(row.requirement_id())? {
            continue;
        }

        let node_row = row.into_node_row();
        let head_metadata = row_metadata(&node_row);

        let resolution = resolve_chain(NodeRef::new(kind, id))?;
        if !resolution.is_success() {
            continue;
        }
        let rect = resolution.destination.expect("checked by is_success");

        let Some(dest) = select_destination_tile(rect, tile.plane, &mut tile_exists)? else {
            continue;
        };

        if !seen.insert((id, dest)) {
            continue;
        }

        let mut metadata = head_metadata;
        metadata.chain = build_chain_metadata(&resolution);

        edges.push(Edge {
            kind: kind.into(),
            from: tile,
            to: dest,
            cost_ms: resolution.total_cost_ms,
            node: Some(NodeRef::new(kind, id)),
            metadata,
        });
    }

    edges.sort_by_key(|e| (e.node.map(|n| n.id).unwrap_or_default(), e.to));
    Ok(edges)
}

/// Scan the destination rectangle for the first existing tile, `x` outer
/// then `y` inner.
fn select_destination_tile(
    rect: Rect,
    fallback_plane: Plane,
    tile_exists: &mut impl FnMut(Tile) -> Result<bool>,
) -> Result<Option<Tile>> {
    let plane = rect.plane.unwrap_or(fallback_plane);
    for x in rect.min_x..=rect.max_x {
        for y in rect.min_y..=rect.max_y {
            let candidate = Tile::new(x, y, plane);
            if tile_exists(candidate)? {
                return Ok(Some(candidate));
            }
        }
    }
    Ok(None)
}

/// Only populated for genuine multi-link chains — a plain, unchained head
/// produces an empty list so its edge reconstructs as a single `ActionStep`.
fn build_chain_metadata(resolution: &ChainResolution) -> Vec<ChainStepMeta> {
    if resolution.links.len() <= 1 {
        return Vec::new();
    }
    resolution
        .links
        .iter()
        .map(|link| ChainStepMeta {
            kind: link.node_ref.kind,
            id: link.node_ref.id,
            cost_ms: link.cost_ms,
            metadata: row_metadata(&link.row),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::rows::NodeHeader;

    fn object(id: i64, dest: Rect) -> ObjectNodeRow {
        ObjectNodeRow {
            header: NodeHeader { id, cost: Some(700), next: None, requirement_id: None },
            match_type: "id".to_string(),
            object_id: Some(42),
            object_name: Some("Furnace".to_string()),
            action: Some("Smelt".to_string()),
            dest_min_x: Some(dest.min_x),
            dest_max_x: Some(dest.max_x),
            dest_min_y: Some(dest.min_y),
            dest_max_y: Some(dest.max_y),
            dest_plane: dest.plane,
            orig_min_x: None,
            orig_max_x: None,
            orig_min_y: None,
            orig_max_y: None,
            orig_plane: None,
            search_radius: 0,
        }
    }

    fn single_link_resolution(node: NodeRef, row: NodeRow, dest: Rect) -> ChainResolution {
        ChainResolution {
            start: node,
            links: vec![crate::chain::ChainLink { node_ref: node, cost_ms: 700, destination: Some(dest), row }],
            total_cost_ms: 700,
            destination: Some(dest),
            failure_reason: None,
        }
    }

    #[test]
    fn picks_first_existing_tile_x_outer_y_inner() {
        let tile = Tile::new(0, 0, 0);
        let dest_rect = Rect { min_x: 5, max_x: 6, min_y: 5, max_y: 6, plane: Some(0) };
        let row = object(1, dest_rect);
        let non_heads = NonHeadIndex::new();

        let edges = object_edges(
            tile,
            vec![row.clone()],
            &non_heads,
            |_| Ok(true),
            |node_ref| Ok(single_link_resolution(node_ref, NodeRow::Object(row.clone()), dest_rect)),
            |t| Ok(t == Tile::new(6, 5, 0)), // only the second x, first y exists
        )
        .unwrap();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, Tile::new(6, 5, 0));
        assert!(edges[0].metadata.chain.is_empty());
    }

    #[test]
    fn skips_when_no_tile_in_rectangle_exists() {
        let tile = Tile::new(0, 0, 0);
        let dest_rect = Rect { min_x: 5, max_x: 6, min_y: 5, max_y: 6, plane: Some(0) };
        let row = object(1, dest_rect);
        let non_heads = NonHeadIndex::new();

        let edges = object_edges(
            tile,
            vec![row.clone()],
            &non_heads,
            |_| Ok(true),
            |node_ref| Ok(single_link_resolution(node_ref, NodeRow::Object(row.clone()), dest_rect)),
            |_| Ok(false),
        )
        .unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn non_head_objects_are_never_emitted() {
        let tile = Tile::new(0, 0, 0);
        let dest_rect = Rect { min_x: 5, max_x: 5, min_y: 5, max_y: 5, plane: Some(0) };
        let row = object(7, dest_rect);
        let mut non_heads = NonHeadIndex::new();
        non_heads.record_for_test(NodeKind::Object, 7);

        let resolve_called = std::cell::Cell::new(false);
        let edges = object_edges(
            tile,
            vec![row.clone()],
            &non_heads,
            |_| Ok(true),
            |node_ref| {
                resolve_called.set(true);
                Ok(single_link_resolution(node_ref, NodeRow::Object(row.clone()), dest_rect))
            },
            |_| Ok(true),
        )
        .unwrap();
        assert!(edges.is_empty());
        assert!(!resolve_called.get());
    }
}
