//! SQLite-backed [`super::WorldStore`].
//!
//! Treats the database schema itself as an external, read-only
//! collaborator: this module is a typed query surface over it, not a
//! schema owner.

use super::rows::*;
use super::WorldStore;
use crate::coord::{NodeKind, Tile};
use crate::errors::{NavPathError, Result};
use crate::requirements::RequirementRow;
use rusqlite::{Connection, OpenFlags, Row};
use std::path::Path;

/// A read-only connection to a world database, opened for the duration of
/// one search and closed on drop.
pub struct SqliteWorldStore {
    conn: Connection,
}

impl SqliteWorldStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| NavPathError::Store(e.to_string()))?;
        Ok(Self { conn })
    }

    fn node_header(id: i64, cost: Option<i64>, next_type: Option<String>, next_id: Option<i64>, requirement_id: Option<i64>) -> NodeHeader {
        let next = match (next_type, next_id) {
            (Some(t), Some(i)) => NodeKind::parse(&t).map(|k| (k, i)),
            _ => None,
        };
        NodeHeader { id, cost, next, requirement_id }
    }
}

fn tile_row_from_row(row: &Row) -> rusqlite::Result<TileRow> {
    Ok(TileRow {
        x: row.get("x")?,
        y: row.get("y")?,
        plane: row.get("plane")?,
        tiledata: row.get("tiledata")?,
        allowed_directions: row.get("allowed_directions")?,
        blocked_directions: row.get("blocked_directions")?,
    })
}

fn tile_from(x: i32, y: i32, plane: i32) -> Tile {
    Tile::new(x, y, plane)
}

impl WorldStore for SqliteWorldStore {
    fn fetch_tile(&self, x: i32, y: i32, plane: i32) -> Result<Option<TileRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT x, y, plane, tiledata, allowed_directions, blocked_directions \
             FROM tiles WHERE x = ?1 AND y = ?2 AND plane = ?3",
        )?;
        let mut rows = stmt.query(rusqlite::params![x, y, plane])?;
        match rows.next()? {
            Some(row) => Ok(Some(tile_row_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn doors_touching(&self, tile: Tile) -> Result<Vec<DoorNodeRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, direction, \
                    tile_inside_x, tile_inside_y, tile_inside_plane, \
                    tile_outside_x, tile_outside_y, tile_outside_plane, \
                    location_open_x, location_open_y, location_open_plane, \
                    location_closed_x, location_closed_y, location_closed_plane, \
                    real_id_open, real_id_closed, open_action, cost, \
                    next_node_type, next_node_id, requirement_id \
             FROM door_nodes \
             WHERE (tile_inside_x = ?1 AND tile_inside_y = ?2 AND tile_inside_plane = ?3) \
                OR (tile_outside_x = ?1 AND tile_outside_y = ?2 AND tile_outside_plane = ?3)",
        )?;
        let rows = stmt.query_map(rusqlite::params![tile.x, tile.y, tile.plane], door_row_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn all_doors(&self) -> Result<Vec<DoorNodeRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, direction, \
                    tile_inside_x, tile_inside_y, tile_inside_plane, \
                    tile_outside_x, tile_outside_y, tile_outside_plane, \
                    location_open_x, location_open_y, location_open_plane, \
                    location_closed_x, location_closed_y, location_closed_plane, \
                    real_id_open, real_id_closed, open_action, cost, \
                    next_node_type, next_node_id, requirement_id \
             FROM door_nodes",
        )?;
        let rows = stmt.query_map([], door_row_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn all_lodestones(&self) -> Result<Vec<LodestoneNodeRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, lodestone, dest_x, dest_y, dest_plane, cost, \
                    next_node_type, next_node_id, requirement_id \
             FROM lodestone_nodes",
        )?;
        let rows = stmt.query_map([], lodestone_row_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn objects_touching(&self, tile: Tile) -> Result<Vec<ObjectNodeRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, match_type, object_id, object_name, action, \
                    dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                    orig_min_x, orig_max_x, orig_min_y, orig_max_y, orig_plane, \
                    search_radius, cost, next_node_type, next_node_id, requirement_id \
             FROM object_nodes \
             WHERE orig_min_x IS NULL \
                OR (orig_min_x <= ?1 AND orig_max_x >= ?1 \
                    AND orig_min_y <= ?2 AND orig_max_y >= ?2 \
                    AND (orig_plane IS NULL OR orig_plane = ?3))",
        )?;
        let rows = stmt.query_map(rusqlite::params![tile.x, tile.y, tile.plane], object_row_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn all_objects(&self) -> Result<Vec<ObjectNodeRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, match_type, object_id, object_name, action, \
                    dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                    orig_min_x, orig_max_x, orig_min_y, orig_max_y, orig_plane, \
                    search_radius, cost, next_node_type, next_node_id, requirement_id \
             FROM object_nodes",
        )?;
        let rows = stmt.query_map([], object_row_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn npcs_touching(&self, tile: Tile) -> Result<Vec<NpcNodeRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, match_type, npc_id, npc_name, action, \
                    dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                    orig_min_x, orig_max_x, orig_min_y, orig_max_y, orig_plane, \
                    search_radius, cost, next_node_type, next_node_id, requirement_id \
             FROM npc_nodes \
             WHERE orig_min_x IS NULL \
                OR (orig_min_x <= ?1 AND orig_max_x >= ?1 \
                    AND orig_min_y <= ?2 AND orig_max_y >= ?2 \
                    AND (orig_plane IS NULL OR orig_plane = ?3))",
        )?;
        let rows = stmt.query_map(rusqlite::params![tile.x, tile.y, tile.plane], npc_row_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn all_npcs(&self) -> Result<Vec<NpcNodeRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, match_type, npc_id, npc_name, action, \
                    dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                    orig_min_x, orig_max_x, orig_min_y, orig_max_y, orig_plane, \
                    search_radius, cost, next_node_type, next_node_id, requirement_id \
             FROM npc_nodes",
        )?;
        let rows = stmt.query_map([], npc_row_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn all_ifslots(&self) -> Result<Vec<IfslotNodeRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, interface_id, component_id, slot_id, click_id, \
                    dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                    cost, next_node_type, next_node_id, requirement_id \
             FROM ifslot_nodes",
        )?;
        let rows = stmt.query_map([], ifslot_row_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn all_items(&self) -> Result<Vec<ItemNodeRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, item_id, action, \
                    dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                    cost, next_node_type, next_node_id, requirement_id \
             FROM item_nodes",
        )?;
        let rows = stmt.query_map([], item_row_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn fetch_requirement(&self, id: i64) -> Result<Option<RequirementRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, metaInfo, key, value, comparison FROM requirements WHERE id = ?1",
        )?;
        let mut rows = stmt.query(rusqlite::params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(RequirementRow {
                id: row.get(0)?,
                meta: row.get(1)?,
                key: row.get(2)?,
                value: row.get(3)?,
                comparison: row.get(4)?,
            })),
            None => Ok(None),
        }
    }

    fn fetch_node(&self, kind: NodeKind, id: i64) -> Result<Option<NodeRow>> {
        Ok(match kind {
            NodeKind::Door => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, direction, \
                            tile_inside_x, tile_inside_y, tile_inside_plane, \
                            tile_outside_x, tile_outside_y, tile_outside_plane, \
                            location_open_x, location_open_y, location_open_plane, \
                            location_closed_x, location_closed_y, location_closed_plane, \
                            real_id_open, real_id_closed, open_action, cost, \
                            next_node_type, next_node_id, requirement_id \
                     FROM door_nodes WHERE id = ?1",
                )?;
                let mut rows = stmt.query(rusqlite::params![id])?;
                rows.next()?.map(|r| door_row_from_row(r)).transpose()?.map(NodeRow::Door)
            }
            NodeKind::Lodestone => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, lodestone, dest_x, dest_y, dest_plane, cost, \
                            next_node_type, next_node_id, requirement_id \
                     FROM lodestone_nodes WHERE id = ?1",
                )?;
                let mut rows = stmt.query(rusqlite::params![id])?;
                rows.next()?.map(|r| lodestone_row_from_row(r)).transpose()?.map(NodeRow::Lodestone)
            }
            NodeKind::Object => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, match_type, object_id, object_name, action, \
                            dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                            orig_min_x, orig_max_x, orig_min_y, orig_max_y, orig_plane, \
                            search_radius, cost, next_node_type, next_node_id, requirement_id \
                     FROM object_nodes WHERE id = ?1",
                )?;
                let mut rows = stmt.query(rusqlite::params![id])?;
                rows.next()?.map(|r| object_row_from_row(r)).transpose()?.map(NodeRow::Object)
            }
            NodeKind::Npc => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, match_type, npc_id, npc_name, action, \
                            dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                            orig_min_x, orig_max_x, orig_min_y, orig_max_y, orig_plane, \
                            search_radius, cost, next_node_type, next_node_id, requirement_id \
                     FROM npc_nodes WHERE id = ?1",
                )?;
                let mut rows = stmt.query(rusqlite::params![id])?;
                rows.next()?.map(|r| npc_row_from_row(r)).transpose()?.map(NodeRow::Npc)
            }
            NodeKind::Ifslot => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, interface_id, component_id, slot_id, click_id, \
                            dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                            cost, next_node_type, next_node_id, requirement_id \
                     FROM ifslot_nodes WHERE id = ?1",
                )?;
                let mut rows = stmt.query(rusqlite::params![id])?;
                rows.next()?.map(|r| ifslot_row_from_row(r)).transpose()?.map(NodeRow::Ifslot)
            }
            NodeKind::Item => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, item_id, action, \
                            dest_min_x, dest_max_x, dest_min_y, dest_max_y, dest_plane, \
                            cost, next_node_type, next_node_id, requirement_id \
                     FROM item_nodes WHERE id = ?1",
                )?;
                let mut rows = stmt.query(rusqlite::params![id])?;
                rows.next()?.map(|r| item_row_from_row(r)).transpose()?.map(NodeRow::Item)
            }
        })
    }
}

fn door_row_from_row(row: &Row) -> rusqlite::Result<DoorNodeRow> {
    let id: i64 = row.get("id")?;
    let cost: Option<i64> = row.get("cost")?;
    let next_type: Option<String> = row.get("next_node_type")?;
    let next_id: Option<i64> = row.get("next_node_id")?;
    let requirement_id: Option<i64> = row.get("requirement_id")?;
    Ok(DoorNodeRow {
        header: SqliteWorldStore::node_header(id, cost, next_type, next_id, requirement_id),
        direction: row.get("direction")?,
        tile_inside: tile_from(row.get("tile_inside_x")?, row.get("tile_inside_y")?, row.get("tile_inside_plane")?),
        tile_outside: tile_from(row.get("tile_outside_x")?, row.get("tile_outside_y")?, row.get("tile_outside_plane")?),
        location_open: tile_from(row.get("location_open_x")?, row.get("location_open_y")?, row.get("location_open_plane")?),
        location_closed: tile_from(row.get("location_closed_x")?, row.get("location_closed_y")?, row.get("location_closed_plane")?),
        real_id_open: row.get("real_id_open")?,
        real_id_closed: row.get("real_id_closed")?,
        open_action: row.get("open_action")?,
    })
}

fn lodestone_row_from_row(row: &Row) -> rusqlite::Result<LodestoneNodeRow> {
    let id: i64 = row.get("id")?;
    let cost: Option<i64> = row.get("cost")?;
    let next_type: Option<String> = row.get("next_node_type")?;
    let next_id: Option<i64> = row.get("next_node_id")?;
    let requirement_id: Option<i64> = row.get("requirement_id")?;
    Ok(LodestoneNodeRow {
        header: SqliteWorldStore::node_header(id, cost, next_type, next_id, requirement_id),
        lodestone: row.get("lodestone")?,
        dest: tile_from(row.get("dest_x")?, row.get("dest_y")?, row.get("dest_plane")?),
    })
}

fn object_row_from_row(row: &Row) -> rusqlite::Result<ObjectNodeRow> {
    let id: i64 = row.get("id")?;
    let cost: Option<i64> = row.get("cost")?;
    let next_type: Option<String> = row.get("next_node_type")?;
    let next_id: Option<i64> = row.get("next_node_id")?;
    let requirement_id: Option<i64> = row.get("requirement_id")?;
    Ok(ObjectNodeRow {
        header: SqliteWorldStore::node_header(id, cost, next_type, next_id, requirement_id),
        match_type: row.get("match_type")?,
        object_id: row.get("object_id")?,
        object_name: row.get("object_name")?,
        action: row.get("action")?,
        dest_min_x: row.get("dest_min_x")?,
        dest_max_x: row.get("dest_max_x")?,
        dest_min_y: row.get("dest_min_y")?,
        dest_max_y: row.get("dest_max_y")?,
        dest_plane: row.get("dest_plane")?,
        orig_min_x: row.get("orig_min_x")?,
        orig_max_x: row.get("orig_max_x")?,
        orig_min_y: row.get("orig_min_y")?,
        orig_max_y: row.get("orig_max_y")?,
        orig_plane: row.get("orig_plane")?,
        search_radius: row.get("search_radius")?,
    })
}

fn npc_row_from_row(row: &Row) -> rusqlite::Result<NpcNodeRow> {
    let id: i64 = row.get("id")?;
    let cost: Option<i64> = row.get("cost")?;
    let next_type: Option<String> = row.get("next_node_type")?;
    let next_id: Option<i64> = row.get("next_node_id")?;
    let requirement_id: Option<i64> = row.get("requirement_id")?;
    Ok(NpcNodeRow {
        header: SqliteWorldStore::node_header(id, cost, next_type, next_id, requirement_id),
        match_type: row.get("match_type")?,
        npc_id: row.get("npc_id")?,
        npc_name: row.get("npc_name")?,
        action: row.get("action")?,
        dest_min_x: row.get("dest_min_x")?,
        dest_max_x: row.get("dest_max_x")?,
        dest_min_y: row.get("dest_min_y")?,
        dest_max_y: row.get("dest_max_y")?,
        dest_plane: row.get("dest_plane")?,
        orig_min_x: row.get("orig_min_x")?,
        orig_max_x: row.get("orig_max_x")?,
        orig_min_y: row.get("orig_min_y")?,
        orig_max_y: row.get("orig_max_y")?,
        orig_plane: row.get("orig_plane")?,
        search_radius: row.get("search_radius")?,
    })
}

fn ifslot_row_from_row(row: &Row) -> rusqlite::Result<IfslotNodeRow> {
    let id: i64 = row.get("id")?;
    let cost: Option<i64> = row.get("cost")?;
    let next_type: Option<String> = row.get("next_node_type")?;
    let next_id: Option<i64> = row.get("next_node_id")?;
    let requirement_id: Option<i64> = row.get("requirement_id")?;
    Ok(IfslotNodeRow {
        header: SqliteWorldStore::node_header(id, cost, next_type, next_id, requirement_id),
        interface_id: row.get("interface_id")?,
        component_id: row.get("component_id")?,
        slot_id: row.get("slot_id")?,
        click_id: row.get("click_id")?,
        dest_min_x: row.get("dest_min_x")?,
        dest_max_x: row.get("dest_max_x")?,
        dest_min_y: row.get("dest_min_y")?,
        dest_max_y: row.get("dest_max_y")?,
        dest_plane: row.get("dest_plane")?,
    })
}

fn item_row_from_row(row: &Row) -> rusqlite::Result<ItemNodeRow> {
    let id: i64 = row.get("id")?;
    let cost: Option<i64> = row.get("cost")?;
    let next_type: Option<String> = row.get("next_node_type")?;
    let next_id: Option<i64> = row.get("next_node_id")?;
    let requirement_id: Option<i64> = row.get("requirement_id")?;
    Ok(ItemNodeRow {
        header: SqliteWorldStore::node_header(id, cost, next_type, next_id, requirement_id),
        item_id: row.get("item_id")?,
        action: row.get("action")?,
        dest_min_x: row.get("dest_min_x")?,
        dest_max_x: row.get("dest_max_x")?,
        dest_min_y: row.get("dest_min_y")?,
        dest_max_y: row.get("dest_max_y")?,
        dest_plane: row.get("dest_plane")?,
    })
}
