//! Candidate traversal edges emitted by the graph provider, and the
//! metadata attached to each for downstream action-step reconstruction.

use crate::coord::{NodeKind, NodeRef, Tile};
use crate::store::rows::NodeRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Move,
    Door,
    Lodestone,
    Object,
    Ifslot,
    Npc,
    Item,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Door => "door",
            Self::Lodestone => "lodestone",
            Self::Object => "object",
            Self::Ifslot => "ifslot",
            Self::Npc => "npc",
            Self::Item => "item",
        }
    }
}

impl From<NodeKind> for StepKind {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Door => Self::Door,
            NodeKind::Lodestone => Self::Lodestone,
            NodeKind::Object => Self::Object,
            NodeKind::Ifslot => Self::Ifslot,
            NodeKind::Npc => Self::Npc,
            NodeKind::Item => Self::Item,
        }
    }
}

/// The traversal-computed door direction tag: `Out` when crossing from the
/// inside tile to the outside tile, `In` for the reverse. Distinct from the
/// raw DB `direction` column, which is kept verbatim in
/// `EdgeMetadata::direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorDirection {
    In,
    Out,
}

impl DoorDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }
}

/// Per-kind fields plus the full DB row, carried for bit-exact
/// interoperability with existing consumers.
#[derive(Debug, Clone, Default)]
pub struct EdgeMetadata {
    pub action: Option<String>,
    pub object_id: Option<i64>,
    pub npc_id: Option<i64>,
    pub item_id: Option<i64>,
    pub object_name: Option<String>,
    pub npc_name: Option<String>,
    pub match_type: Option<String>,
    pub interface_id: Option<i64>,
    pub component_id: Option<i64>,
    pub slot_id: Option<i64>,
    pub click_id: Option<i64>,
    pub door_direction: Option<DoorDirection>,
    /// Raw DB-stored `direction` column for door rows.
    pub direction: Option<String>,
    pub real_id_open: Option<i64>,
    pub real_id_closed: Option<i64>,
    pub lodestone: Option<String>,
    pub target_lodestone: Option<String>,
    pub db_row: Option<NodeRow>,
    /// Non-empty only for chain-resolved edges (object/ifslot/npc/item);
    /// one entry per link visited by the chain resolver, in order.
    pub chain: Vec<ChainStepMeta>,
}

#[derive(Debug, Clone)]
pub struct ChainStepMeta {
    pub kind: NodeKind,
    pub id: i64,
    pub cost_ms: i64,
    pub metadata: EdgeMetadata,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub kind: StepKind,
    pub from: Tile,
    pub to: Tile,
    pub cost_ms: i64,
    pub node: Option<NodeRef>,
    pub metadata: EdgeMetadata,
}

/// Base per-kind metadata for a single node row, shared by door edges and
/// chain-resolved action edges. `chain` is always left empty here; callers
/// populate it once the full resolution is known.
pub fn row_metadata(row: &NodeRow) -> EdgeMetadata {
    let mut meta = EdgeMetadata { db_row: Some(row.clone()), ..Default::default() };
    match row {
        NodeRow::Door(r) => {
            meta.direction = r.direction.clone();
            meta.action = r.open_action.clone();
            meta.real_id_open = Some(r.real_id_open);
            meta.real_id_closed = Some(r.real_id_closed);
        }
        NodeRow::Lodestone(r) => {
            meta.lodestone = Some(r.lodestone.clone());
            meta.target_lodestone = Some(r.lodestone.clone());
        }
        NodeRow::Object(r) => {
            meta.object_id = r.object_id;
            meta.object_name = r.object_name.clone();
            meta.match_type = Some(r.match_type.clone());
            meta.action = r.action.clone();
        }
        NodeRow::Npc(r) => {
            meta.npc_id = r.npc_id;
            meta.npc_name = r.npc_name.clone();
            meta.match_type = Some(r.match_type.clone());
            meta.action = r.action.clone();
        }
        NodeRow::Ifslot(r) => {
            meta.interface_id = r.interface_id;
            meta.component_id = r.component_id;
            meta.slot_id = r.slot_id;
            meta.click_id = r.click_id;
        }
        NodeRow::Item(r) => {
            meta.item_id = r.item_id;
            meta.action = r.action.clone();
        }
    }
    meta
}
