//! Lazy, caching neighbor provider. Owns every per-search cache; nothing
//! here is global or shared across searches.

pub mod actions;
pub mod cache;
pub mod doors;
pub mod edge;
pub mod lodestones;
pub mod movement;
pub mod nonhead;

pub use edge::{ChainStepMeta, DoorDirection, Edge, EdgeMetadata, StepKind};

use crate::chain::ChainResolver;
use crate::coord::{NodeRef, Tile, TiledataTable};
use crate::cost::CostModel;
use crate::errors::Result;
use crate::options::SearchOptions;
use crate::requirements;
use crate::store::rows::{IfslotNodeRow, ItemNodeRow, LodestoneNodeRow, NpcNodeRow, ObjectNodeRow, TileRow};
use crate::store::WorldStore;
use cache::BoundedCache;
use nonhead::NonHeadIndex;

const TILE_CACHE_CAPACITY: usize = 4096;
const TOUCH_CACHE_CAPACITY: usize = 512;
const REQUIREMENT_CACHE_CAPACITY: usize = 1024;
const CHAIN_CACHE_CAPACITY: usize = 2048;

pub struct GraphProvider<'a> {
    store: &'a dyn WorldStore,
    cost_model: CostModel,
    tiledata: TiledataTable,
    non_heads: NonHeadIndex,

    tile_cache: BoundedCache<Tile, Option<TileRow>>,
    door_touch_cache: BoundedCache<Tile, Vec<crate::store::rows::DoorNodeRow>>,
    object_touch_cache: BoundedCache<Tile, Vec<ObjectNodeRow>>,
    npc_touch_cache: BoundedCache<Tile, Vec<NpcNodeRow>>,
    requirement_cache: BoundedCache<i64, Option<crate::requirements::RequirementRow>>,
    chain_cache: BoundedCache<(crate::coord::NodeKind, i64), crate::chain::ChainResolution>,

    lodestones: Option<Vec<LodestoneNodeRow>>,
    ifslots: Option<Vec<IfslotNodeRow>>,
    items: Option<Vec<ItemNodeRow>>,

    /// Count of requirement-gated rows the provider rejected this search.
    /// Incremented once per encounter, not deduplicated by node id.
    req_filtered: u64,
}

impl<'a> GraphProvider<'a> {
    pub fn new(store: &'a dyn WorldStore) -> Self {
        Self {
            store,
            cost_model: CostModel::new(),
            tiledata: TiledataTable::build(),
            non_heads: NonHeadIndex::new(),
            tile_cache: BoundedCache::new(TILE_CACHE_CAPACITY),
            door_touch_cache: BoundedCache::new(TOUCH_CACHE_CAPACITY),
            object_touch_cache: BoundedCache::new(TOUCH_CACHE_CAPACITY),
            npc_touch_cache: BoundedCache::new(TOUCH_CACHE_CAPACITY),
            requirement_cache: BoundedCache::new(REQUIREMENT_CACHE_CAPACITY),
            chain_cache: BoundedCache::new(CHAIN_CACHE_CAPACITY),
            lodestones: None,
            ifslots: None,
            items: None,
            req_filtered: 0,
        }
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Rows rejected by the requirement gate so far this search.
    pub fn req_filtered(&self) -> u64 {
        self.req_filtered
    }

    /// Generate every outgoing edge from `tile`, in a fixed deterministic
    /// order: movement, doors, lodestones, objects, ifslots, npcs, items.
    pub fn neighbors(&mut self, tile: Tile, options: &SearchOptions) -> Result<Vec<Edge>> {
        self.non_heads.ensure_built(self.store)?;
        let ctx = options.extras.requirements_map.clone();
        let start_tile = options.extras.start_tile;
        let mut all_edges = Vec::new();

        if let Some(row) = self.tile_row(tile)? {
            let store = self.store;
            let tile_cache = &mut self.tile_cache;
            let mut tile_exists = |t: Tile| -> Result<bool> {
                if let Some(cached) = tile_cache.get(&t) {
                    return Ok(cached.is_some());
                }
                let r = store.fetch_tile(t.x, t.y, t.plane)?;
                tile_cache.insert(t, r.clone());
                Ok(r.is_some())
            };
            all_edges.extend(movement::movement_edges(tile, &row, &self.tiledata, &self.cost_model, &mut tile_exists)?);
        }

        if options.use_doors {
            let doors = self.doors_touching(tile)?;
            let store = self.store;
            let tile_cache = &mut self.tile_cache;
            let requirement_cache = &mut self.requirement_cache;
            let req_filtered = &mut self.req_filtered;
            let ctx_ref = &ctx;
            let mut tile_exists = |t: Tile| -> Result<bool> {
                if let Some(cached) = tile_cache.get(&t) {
                    return Ok(cached.is_some());
                }
                let r = store.fetch_tile(t.x, t.y, t.plane)?;
                tile_cache.insert(t, r.clone());
                Ok(r.is_some())
            };
            let mut requirement_gate = |req_id: Option<i64>| -> Result<bool> {
                gate(store, requirement_cache, req_filtered, req_id, ctx_ref)
            };
            all_edges.extend(doors::door_edges(
                tile,
                doors,
                &self.non_heads,
                &self.cost_model,
                options,
                &mut requirement_gate,
                &mut tile_exists,
            )?);
        }

        if options.use_lodestones {
            let lodestones = self.lodestones_all()?;
            let store = self.store;
            let tile_cache = &mut self.tile_cache;
            let requirement_cache = &mut self.requirement_cache;
            let req_filtered = &mut self.req_filtered;
            let ctx_ref = &ctx;
            let mut tile_exists = |t: Tile| -> Result<bool> {
                if let Some(cached) = tile_cache.get(&t) {
                    return Ok(cached.is_some());
                }
                let r = store.fetch_tile(t.x, t.y, t.plane)?;
                tile_cache.insert(t, r.clone());
                Ok(r.is_some())
            };
            let mut requirement_gate = |req_id: Option<i64>| -> Result<bool> {
                gate(store, requirement_cache, req_filtered, req_id, ctx_ref)
            };
            all_edges.extend(lodestones::lodestone_edges(
                tile,
                start_tile,
                &lodestones,
                &self.non_heads,
                &self.cost_model,
                options,
                &mut requirement_gate,
                &mut tile_exists,
            )?);
        }

        if options.use_objects {
            let rows = self.objects_touching(tile)?;
            let store = self.store;
            let tile_cache = &mut self.tile_cache;
            let requirement_cache = &mut self.requirement_cache;
            let req_filtered = &mut self.req_filtered;
            let chain_cache = &mut self.chain_cache;
            let cost_model = &self.cost_model;
            let ctx_ref = &ctx;
            let mut tile_exists = |t: Tile| -> Result<bool> {
                if let Some(cached) = tile_cache.get(&t) {
                    return Ok(cached.is_some());
                }
                let r = store.fetch_tile(t.x, t.y, t.plane)?;
                tile_cache.insert(t, r.clone());
                Ok(r.is_some())
            };
            let mut requirement_gate = |req_id: Option<i64>| -> Result<bool> {
                gate(store, requirement_cache, req_filtered, req_id, ctx_ref)
            };
            let mut resolve_chain = |node: NodeRef| -> Result<crate::chain::ChainResolution> {
                resolve(store, cost_model, options, chain_cache, node)
            };
            all_edges.extend(actions::object_edges(
                tile,
                rows,
                &self.non_heads,
                &mut requirement_gate,
                &mut resolve_chain,
                &mut tile_exists,
            )?);
        }

        if options.use_ifslots {
            let rows = self.ifslots_all()?;
            let store = self.store;
            let tile_cache = &mut self.tile_cache;
            let requirement_cache = &mut self.requirement_cache;
            let req_filtered = &mut self.req_filtered;
            let chain_cache = &mut self.chain_cache;
            let cost_model = &self.cost_model;
            let ctx_ref = &ctx;
            let mut tile_exists = |t: Tile| -> Result<bool> {
                if let Some(cached) = tile_cache.get(&t) {
                    return Ok(cached.is_some());
                }
                let r = store.fetch_tile(t.x, t.y, t.plane)?;
                tile_cache.insert(t, r.clone());
                Ok(r.is_some())
            };
            let mut requirement_gate = |req_id: Option<i64>| -> Result<bool> {
                gate(store, requirement_cache, req_filtered, req_id, ctx_ref)
            };
            let mut resolve_chain = |node: NodeRef| -> Result<crate::chain::ChainResolution> {
                resolve(store, cost_model, options, chain_cache, node)
            };
            all_edges.extend(actions::ifslot_edges(
                tile,
                rows,
                &self.non_heads,
                &mut requirement_gate,
                &mut resolve_chain,
                &mut tile_exists,
            )?);
        }

        if options.use_npcs {
            let rows = self.npcs_touching(tile)?;
            let store = self.store;
            let tile_cache = &mut self.tile_cache;
            let requirement_cache = &mut self.requirement_cache;
            let req_filtered = &mut self.req_filtered;
            let chain_cache = &mut self.chain_cache;
            let cost_model = &self.cost_model;
            let ctx_ref = &ctx;
            let mut tile_exists = |t: Tile| -> Result<bool> {
                if let Some(cached) = tile_cache.get(&t) {
                    return Ok(cached.is_some());
                }
                let r = store.fetch_tile(t.x, t.y, t.plane)?;
                tile_cache.insert(t, r.clone());
                Ok(r.is_some())
            };
            let mut requirement_gate = |req_id: Option<i64>| -> Result<bool> {
                gate(store, requirement_cache, req_filtered, req_id, ctx_ref)
            };
            let mut resolve_chain = |node: NodeRef| -> Result<crate::chain::ChainResolution> {
                resolve(store, cost_model, options, chain_cache, node)
            };
            all_edges.extend(actions::npc_edges(
                tile,
                rows,
                &self.non_heads,
                &mut requirement_gate,
                &mut resolve_chain,
                &mut tile_exists,
            )?);
        }

        if options.use_items {
            let rows = self.items_all()?;
            let store = self.store;
            let tile_cache = &mut self.tile_cache;
            let requirement_cache = &mut self.requirement_cache;
            let req_filtered = &mut self.req_filtered;
            let chain_cache = &mut self.chain_cache;
            let cost_model = &self.cost_model;
            let ctx_ref = &ctx;
            let mut tile_exists = |t: Tile| -> Result<bool> {
                if let Some(cached) = tile_cache.get(&t) {
                    return Ok(cached.is_some());
                }
                let r = store.fetch_tile(t.x, t.y, t.plane)?;
                tile_cache.insert(t, r.clone());
                Ok(r.is_some())
            };
            let mut requirement_gate = |req_id: Option<i64>| -> Result<bool> {
                gate(store, requirement_cache, req_filtered, req_id, ctx_ref)
            };
            let mut resolve_chain = |node: NodeRef| -> Result<crate::chain::ChainResolution> {
                resolve(store, cost_model, options, chain_cache, node)
            };
            all_edges.extend(actions::item_edges(
                tile,
                rows,
                &self.non_heads,
                &mut requirement_gate,
                &mut resolve_chain,
                &mut tile_exists,
            )?);
        }

        Ok(all_edges)
    }

    fn tile_row(&mut self, tile: Tile) -> Result<Option<TileRow>> {
        if let Some(cached) = self.tile_cache.get(&tile) {
            return Ok(cached.clone());
        }
        let row = self.store.fetch_tile(tile.x, tile.y, tile.plane)?;
        self.tile_cache.insert(tile, row.clone());
        Ok(row)
    }

    fn doors_touching(&mut self, tile: Tile) -> Result<Vec<crate::store::rows::DoorNodeRow>> {
        if let Some(cached) = self.door_touch_cache.get(&tile) {
            return Ok(cached.clone());
        }
        let rows = self.store.doors_touching(tile)?;
        self.door_touch_cache.insert(tile, rows.clone());
        Ok(rows)
    }

    fn objects_touching(&mut self, tile: Tile) -> Result<Vec<ObjectNodeRow>> {
        if let Some(cached) = self.object_touch_cache.get(&tile) {
            return Ok(cached.clone());
        }
        let rows = self.store.objects_touching(tile)?;
        self.object_touch_cache.insert(tile, rows.clone());
        Ok(rows)
    }

    fn npcs_touching(&mut self, tile: Tile) -> Result<Vec<NpcNodeRow>> {
        if let Some(cached) = self.npc_touch_cache.get(&tile) {
            return Ok(cached.clone());
        }
        let rows = self.store.npcs_touching(tile)?;
        self.npc_touch_cache.insert(tile, rows.clone());
        Ok(rows)
    }

    fn lodestones_all(&mut self) -> Result<Vec<LodestoneNodeRow>> {
        if self.lodestones.is_none() {
            self.lodestones = Some(self.store.all_lodestones()?);
        }
        Ok(self.lodestones.clone().unwrap_or_default())
    }

    fn ifslots_all(&mut self) -> Result<Vec<IfslotNodeRow>> {
        if self.ifslots.is_none() {
            self.ifslots = Some(self.store.all_ifslots()?);
        }
        Ok(self.ifslots.clone().unwrap_or_default())
    }

    fn items_all(&mut self) -> Result<Vec<ItemNodeRow>> {
        if self.items.is_none() {
            self.items = Some(self.store.all_items()?);
        }
        Ok(self.items.clone().unwrap_or_default())
    }
}

fn gate(
    store: &dyn WorldStore,
    cache: &mut BoundedCache<i64, Option<crate::requirements::RequirementRow>>,
    req_filtered: &mut u64,
    requirement_id: Option<i64>,
    ctx: &std::collections::HashMap<String, i64>,
) -> Result<bool> {
    let Some(id) = requirement_id else {
        return Ok(true);
    };
    let passed = if let Some(cached) = cache.get(&id) {
        match cached {
            Some(req) => requirements::evaluate(req, ctx),
            None => false,
        }
    } else {
        let req = store.fetch_requirement(id)?;
        cache.insert(id, req.clone());
        match req {
            Some(r) => requirements::evaluate(&r, ctx),
            None => false,
        }
    };
    if !passed {
        *req_filtered += 1;
    }
    Ok(passed)
}

fn resolve(
    store: &dyn WorldStore,
    cost_model: &CostModel,
    options: &SearchOptions,
    cache: &mut BoundedCache<(crate::coord::NodeKind, i64), crate::chain::ChainResolution>,
    node: NodeRef,
) -> Result<crate::chain::ChainResolution> {
    let key = (node.kind, node.id);
    if let Some(cached) = cache.get(&key) {
        return Ok(cached.clone());
    }
    let resolver = ChainResolver::new(store, cost_model, options);
    let resolution = resolver.resolve(node)?;
    cache.insert(key, resolution.clone());
    Ok(resolution)
}
