//! Chain-head index: any node referenced by some other node's
//! `next_node_type`/`next_node_id` is a non-head and must never be emitted
//! as a direct, standalone edge.

use crate::coord::NodeKind;
use crate::errors::Result;
use crate::store::WorldStore;
use std::collections::HashSet;

#[derive(Default)]
pub struct NonHeadIndex {
    built: bool,
    non_heads: HashSet<(NodeKind, i64)>,
}

impl NonHeadIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every node table once and record every referenced
    /// `(next_kind, next_id)`. Lazily built and memoized for the provider's
    /// lifetime, and insert-only thereafter.
    pub fn ensure_built(&mut self, store: &dyn WorldStore) -> Result<()> {
        if self.built {
            return Ok(());
        }
        for row in store.all_doors()? {
            self.record(row.header.next);
        }
        for row in store.all_lodestones()? {
            self.record(row.header.next);
        }
        for row in store.all_objects()? {
            self.record(row.header.next);
        }
        for row in store.all_npcs()? {
            self.record(row.header.next);
        }
        for row in store.all_ifslots()? {
            self.record(row.header.next);
        }
        for row in store.all_items()? {
            self.record(row.header.next);
        }
        self.built = true;
        Ok(())
    }

    fn record(&mut self, next: Option<(NodeKind, i64)>) {
        if let Some(key) = next {
            self.non_heads.insert(key);
        }
    }

    pub fn is_non_head(&self, kind: NodeKind, id: i64) -> bool {
        self.non_heads.contains(&(kind, id))
    }

    #[cfg(test)]
    pub fn record_for_test(&mut self, kind: NodeKind, id: i64) {
        self.built = true;
        self.non_heads.insert((kind, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Tile;
    use crate::store::rows::*;

    struct FakeStore {
        doors: Vec<DoorNodeRow>,
    }

    impl WorldStore for FakeStore {
        fn fetch_tile(&self, _x: i32, _y: i32, _plane: i32) -> Result<Option<TileRow>> {
            Ok(None)
        }
        fn doors_touching(&self, _tile: Tile) -> Result<Vec<DoorNodeRow>> {
            Ok(vec![])
        }
        fn all_doors(&self) -> Result<Vec<DoorNodeRow>> {
            Ok(self.doors.clone())
        }
        fn all_lodestones(&self) -> Result<Vec<LodestoneNodeRow>> {
            Ok(vec![])
        }
        fn objects_touching(&self, _tile: Tile) -> Result<Vec<ObjectNodeRow>> {
            Ok(vec![])
        }
        fn all_objects(&self) -> Result<Vec<ObjectNodeRow>> {
            Ok(vec![])
        }
        fn npcs_touching(&self, _tile: Tile) -> Result<Vec<NpcNodeRow>> {
            Ok(vec![])
        }
        fn all_npcs(&self) -> Result<Vec<NpcNodeRow>> {
            Ok(vec![])
        }
        fn all_ifslots(&self) -> Result<Vec<IfslotNodeRow>> {
            Ok(vec![])
        }
        fn all_items(&self) -> Result<Vec<ItemNodeRow>> {
            Ok(vec![])
        }
        fn fetch_requirement(&self, _id: i64) -> Result<Option<crate::requirements::RequirementRow>> {
            Ok(None)
        }
        fn fetch_node(&self, _kind: NodeKind, _id: i64) -> Result<Option<NodeRow>> {
            Ok(None)
        }
    }

    #[test]
    fn referenced_node_is_marked_non_head() {
        let door_a = DoorNodeRow {
            header: NodeHeader { id: 1, cost: None, next: Some((NodeKind::Door, 2)), requirement_id: None },
            direction: None,
            tile_inside: Tile::new(0, 0, 0),
            tile_outside: Tile::new(1, 0, 0),
            location_open: Tile::new(1, 0, 0),
            location_closed: Tile::new(1, 0, 0),
            real_id_open: 1,
            real_id_closed: 2,
            open_action: None,
        };
        let store = FakeStore { doors: vec![door_a] };
        let mut index = NonHeadIndex::new();
        index.ensure_built(&store).unwrap();
        assert!(index.is_non_head(NodeKind::Door, 2));
        assert!(!index.is_non_head(NodeKind::Door, 1));
    }
}
