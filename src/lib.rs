//! Deterministic A* traversal planner over a tiled world augmented with
//! off-mesh door, lodestone, object, NPC, ifslot, and item action edges.
//!
//! Entry point: [`driver::find_path`].

pub mod astar;
pub mod chain;
pub mod coord;
pub mod cost;
pub mod driver;
pub mod errors;
pub mod graph;
pub mod options;
pub mod path;
pub mod requirements;
pub mod store;

pub use coord::{NodeKind, NodeRef, Tile};
pub use driver::find_path;
pub use errors::{NavPathError, Result};
pub use options::{RequirementValue, SearchExtras, SearchOptions};
pub use path::{ActionStep, PathResult};
pub use store::{SqliteWorldStore, WorldStore};
