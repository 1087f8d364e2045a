//! Typed row structs over the seven world-database tables.

use crate::coord::{NodeKind, Plane, Tile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRow {
    pub x: i32,
    pub y: i32,
    pub plane: Plane,
    /// 8-bit external movement mask; preferred over `allowed_directions` when present.
    pub tiledata: Option<u8>,
    pub allowed_directions: Option<String>,
    pub blocked_directions: Option<String>,
}

impl TileRow {
    pub fn tile(&self) -> Tile {
        Tile::new(self.x, self.y, self.plane)
    }
}

/// Shared header carried by every node-row family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHeader {
    pub id: i64,
    pub cost: Option<i64>,
    pub next: Option<(NodeKind, i64)>,
    pub requirement_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct DoorNodeRow {
    pub header: NodeHeader,
    pub direction: Option<String>,
    pub tile_inside: Tile,
    pub tile_outside: Tile,
    pub location_open: Tile,
    pub location_closed: Tile,
    pub real_id_open: i64,
    pub real_id_closed: i64,
    pub open_action: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LodestoneNodeRow {
    pub header: NodeHeader,
    pub lodestone: String,
    pub dest: Tile,
}

#[derive(Debug, Clone)]
pub struct ObjectNodeRow {
    pub header: NodeHeader,
    pub match_type: String,
    pub object_id: Option<i64>,
    pub object_name: Option<String>,
    pub action: Option<String>,
    pub dest_min_x: Option<i32>,
    pub dest_max_x: Option<i32>,
    pub dest_min_y: Option<i32>,
    pub dest_max_y: Option<i32>,
    pub dest_plane: Option<Plane>,
    pub orig_min_x: Option<i32>,
    pub orig_max_x: Option<i32>,
    pub orig_min_y: Option<i32>,
    pub orig_max_y: Option<i32>,
    pub orig_plane: Option<Plane>,
    pub search_radius: i64,
}

#[derive(Debug, Clone)]
pub struct NpcNodeRow {
    pub header: NodeHeader,
    pub match_type: String,
    pub npc_id: Option<i64>,
    pub npc_name: Option<String>,
    pub action: Option<String>,
    pub dest_min_x: Option<i32>,
    pub dest_max_x: Option<i32>,
    pub dest_min_y: Option<i32>,
    pub dest_max_y: Option<i32>,
    pub dest_plane: Option<Plane>,
    pub orig_min_x: Option<i32>,
    pub orig_max_x: Option<i32>,
    pub orig_min_y: Option<i32>,
    pub orig_max_y: Option<i32>,
    pub orig_plane: Option<Plane>,
    pub search_radius: i64,
}

#[derive(Debug, Clone)]
pub struct IfslotNodeRow {
    pub header: NodeHeader,
    pub interface_id: Option<i64>,
    pub component_id: Option<i64>,
    pub slot_id: Option<i64>,
    pub click_id: Option<i64>,
    pub dest_min_x: Option<i32>,
    pub dest_max_x: Option<i32>,
    pub dest_min_y: Option<i32>,
    pub dest_max_y: Option<i32>,
    pub dest_plane: Option<Plane>,
}

#[derive(Debug, Clone)]
pub struct ItemNodeRow {
    pub header: NodeHeader,
    pub item_id: Option<i64>,
    pub action: Option<String>,
    pub dest_min_x: Option<i32>,
    pub dest_max_x: Option<i32>,
    pub dest_min_y: Option<i32>,
    pub dest_max_y: Option<i32>,
    pub dest_plane: Option<Plane>,
}

/// Sum type over a single row from any of the six node tables, used by the
/// chain resolver once it no longer cares which table the row came from.
/// Dispatch per-kind behavior via match, not dynamic method lookup.
#[derive(Debug, Clone)]
pub enum NodeRow {
    Door(DoorNodeRow),
    Lodestone(LodestoneNodeRow),
    Object(ObjectNodeRow),
    Ifslot(IfslotNodeRow),
    Npc(NpcNodeRow),
    Item(ItemNodeRow),
}

impl NodeRow {
    pub fn header(&self) -> &NodeHeader {
        match self {
            NodeRow::Door(r) => &r.header,
            NodeRow::Lodestone(r) => &r.header,
            NodeRow::Object(r) => &r.header,
            NodeRow::Ifslot(r) => &r.header,
            NodeRow::Npc(r) => &r.header,
            NodeRow::Item(r) => &r.header,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRow::Door(_) => NodeKind::Door,
            NodeRow::Lodestone(_) => NodeKind::Lodestone,
            NodeRow::Object(_) => NodeKind::Object,
            NodeRow::Ifslot(_) => NodeKind::Ifslot,
            NodeRow::Npc(_) => NodeKind::Npc,
            NodeRow::Item(_) => NodeKind::Item,
        }
    }
}
