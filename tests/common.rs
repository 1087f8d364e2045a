//! Shared `WorldStore` fixture for integration tests: an in-memory store
//! built from plain Rust literals instead of a SQLite file, so scenarios
//! read like the table rows they represent.

#![allow(dead_code)]

use navpath::{NodeKind, Tile};
use navpath::store::rows::*;
use navpath::store::WorldStore;
use navpath::requirements::RequirementRow;
use navpath::errors::Result;
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeWorldStore {
    pub tiles: HashMap<(i32, i32, i32), TileRow>,
    pub doors: Vec<DoorNodeRow>,
    pub lodestones: Vec<LodestoneNodeRow>,
    pub objects: Vec<ObjectNodeRow>,
    pub npcs: Vec<NpcNodeRow>,
    pub ifslots: Vec<IfslotNodeRow>,
    pub items: Vec<ItemNodeRow>,
    pub requirements: HashMap<i64, RequirementRow>,
}

impl FakeWorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an open, all-directions tile at `(x, y, plane)`.
    pub fn with_open_tile(mut self, x: i32, y: i32, plane: i32) -> Self {
        self.tiles.insert(
            (x, y, plane),
            TileRow { x, y, plane, tiledata: Some(0xFF), allowed_directions: None, blocked_directions: None },
        );
        self
    }

    /// Fill a rectangular region (inclusive) with open, all-directions tiles.
    pub fn with_open_rect(mut self, min_x: i32, max_x: i32, min_y: i32, max_y: i32, plane: i32) -> Self {
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                self.tiles.insert(
                    (x, y, plane),
                    TileRow { x, y, plane, tiledata: Some(0xFF), allowed_directions: None, blocked_directions: None },
                );
            }
        }
        self
    }

    pub fn with_door(mut self, row: DoorNodeRow) -> Self {
        self.doors.push(row);
        self
    }

    pub fn with_lodestone(mut self, row: LodestoneNodeRow) -> Self {
        self.lodestones.push(row);
        self
    }

    pub fn with_object(mut self, row: ObjectNodeRow) -> Self {
        self.objects.push(row);
        self
    }

    pub fn with_ifslot(mut self, row: IfslotNodeRow) -> Self {
        self.ifslots.push(row);
        self
    }

    pub fn with_requirement(mut self, row: RequirementRow) -> Self {
        self.requirements.insert(row.id, row);
        self
    }
}

fn touches(node_tile_a: Tile, node_tile_b: Option<Tile>, tile: Tile) -> bool {
    node_tile_a == tile || node_tile_b == Some(tile)
}

impl WorldStore for FakeWorldStore {
    fn fetch_tile(&self, x: i32, y: i32, plane: i32) -> Result<Option<TileRow>> {
        Ok(self.tiles.get(&(x, y, plane)).cloned())
    }

    fn doors_touching(&self, tile: Tile) -> Result<Vec<DoorNodeRow>> {
        Ok(self
            .doors
            .iter()
            .filter(|d| touches(d.tile_inside, Some(d.tile_outside), tile))
            .cloned()
            .collect())
    }

    fn all_doors(&self) -> Result<Vec<DoorNodeRow>> {
        Ok(self.doors.clone())
    }

    fn all_lodestones(&self) -> Result<Vec<LodestoneNodeRow>> {
        Ok(self.lodestones.clone())
    }

    fn objects_touching(&self, tile: Tile) -> Result<Vec<ObjectNodeRow>> {
        Ok(self
            .objects
            .iter()
            .filter(|o| match (o.orig_min_x, o.orig_max_x, o.orig_min_y, o.orig_max_y) {
                (Some(min_x), Some(max_x), Some(min_y), Some(max_y)) => {
                    let plane = o.orig_plane.unwrap_or(tile.plane);
                    (min_x..=max_x).contains(&tile.x) && (min_y..=max_y).contains(&tile.y) && plane == tile.plane
                }
                _ => true,
            })
            .cloned()
            .collect())
    }

    fn all_objects(&self) -> Result<Vec<ObjectNodeRow>> {
        Ok(self.objects.clone())
    }

    fn npcs_touching(&self, tile: Tile) -> Result<Vec<NpcNodeRow>> {
        Ok(self
            .npcs
            .iter()
            .filter(|n| match (n.orig_min_x, n.orig_max_x, n.orig_min_y, n.orig_max_y) {
                (Some(min_x), Some(max_x), Some(min_y), Some(max_y)) => {
                    let plane = n.orig_plane.unwrap_or(tile.plane);
                    (min_x..=max_x).contains(&tile.x) && (min_y..=max_y).contains(&tile.y) && plane == tile.plane
                }
                _ => true,
            })
            .cloned()
            .collect())
    }

    fn all_npcs(&self) -> Result<Vec<NpcNodeRow>> {
        Ok(self.npcs.clone())
    }

    fn all_ifslots(&self) -> Result<Vec<IfslotNodeRow>> {
        Ok(self.ifslots.clone())
    }

    fn all_items(&self) -> Result<Vec<ItemNodeRow>> {
        Ok(self.items.clone())
    }

    fn fetch_requirement(&self, id: i64) -> Result<Option<RequirementRow>> {
        Ok(self.requirements.get(&id).cloned())
    }

    fn fetch_node(&self, kind: NodeKind, id: i64) -> Result<Option<NodeRow>> {
        let row = match kind {
            NodeKind::Door => self.doors.iter().find(|r| r.header.id == id).cloned().map(NodeRow::Door),
            NodeKind::Lodestone => {
                self.lodestones.iter().find(|r| r.header.id == id).cloned().map(NodeRow::Lodestone)
            }
            NodeKind::Object => self.objects.iter().find(|r| r.header.id == id).cloned().map(NodeRow::Object),
            NodeKind::Npc => self.npcs.iter().find(|r| r.header.id == id).cloned().map(NodeRow::Npc),
            NodeKind::Ifslot => self.ifslots.iter().find(|r| r.header.id == id).cloned().map(NodeRow::Ifslot),
            NodeKind::Item => self.items.iter().find(|r| r.header.id == id).cloned().map(NodeRow::Item),
        };
        Ok(row)
    }
}
