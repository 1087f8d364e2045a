//! Typed, parameterized, read-only world store interface.
//!
//! `WorldStore` is a plain trait so the search core never depends on a
//! concrete database driver; `sqlite` provides the production
//! implementation, and tests use an in-memory fake (see `tests/common.rs`).

pub mod rows;
pub mod sqlite;

pub use sqlite::SqliteWorldStore;

use crate::coord::Tile;
use crate::errors::Result;
use crate::requirements::RequirementRow;
use rows::*;

/// Read-only, parameterized query surface over the seven world tables.
///
/// Implementations stream rows; they hold no aggregate state of their own —
/// aggregation and caching are the graph provider's job.
pub trait WorldStore {
    fn fetch_tile(&self, x: i32, y: i32, plane: i32) -> Result<Option<TileRow>>;

    /// Doors whose inside or outside tile equals `tile` (a "tile-touching" query).
    fn doors_touching(&self, tile: Tile) -> Result<Vec<DoorNodeRow>>;
    fn all_doors(&self) -> Result<Vec<DoorNodeRow>>;

    fn all_lodestones(&self) -> Result<Vec<LodestoneNodeRow>>;

    /// Objects whose origin rectangle covers `tile`, or whose origin is NULL
    /// (any-origin rows match every tile).
    fn objects_touching(&self, tile: Tile) -> Result<Vec<ObjectNodeRow>>;
    fn all_objects(&self) -> Result<Vec<ObjectNodeRow>>;

    fn npcs_touching(&self, tile: Tile) -> Result<Vec<NpcNodeRow>>;
    fn all_npcs(&self) -> Result<Vec<NpcNodeRow>>;

    fn all_ifslots(&self) -> Result<Vec<IfslotNodeRow>>;
    fn all_items(&self) -> Result<Vec<ItemNodeRow>>;

    fn fetch_requirement(&self, id: i64) -> Result<Option<RequirementRow>>;

    /// Fetch a single node row of the given kind by id, used by the chain
    /// resolver.
    fn fetch_node(&self, kind: crate::coord::NodeKind, id: i64) -> Result<Option<NodeRow>>;
}
