//! Node-chain resolver: walks `next_node_type`/`next_node_id` links into a
//! single aggregate edge with merged cost and destination.

use crate::coord::{NodeKind, NodeRef, Rect};
use crate::cost::CostModel;
use crate::options::SearchOptions;
use crate::store::rows::{NodeHeader, NodeRow};
use crate::store::WorldStore;
use std::collections::HashSet;

/// Why a chain failed to resolve; never surfaced as a search-level error —
/// only used to suppress emission of the candidate edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFailure {
    ChainDepthExceeded,
    CycleDetected,
    MissingNode,
    MissingDestination,
}

impl ChainFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChainDepthExceeded => "chain-depth-exceeded",
            Self::CycleDetected => "cycle-detected",
            Self::MissingNode => "missing-node",
            Self::MissingDestination => "missing-destination",
        }
    }
}

/// One link visited while resolving a chain; `link.row` carries everything
/// needed to reconstruct a per-link `ActionStep`.
#[derive(Debug, Clone)]
pub struct ChainLink {
    pub node_ref: NodeRef,
    pub cost_ms: i64,
    pub destination: Option<Rect>,
    pub row: NodeRow,
}

#[derive(Debug, Clone)]
pub struct ChainResolution {
    pub start: NodeRef,
    pub links: Vec<ChainLink>,
    pub total_cost_ms: i64,
    pub destination: Option<Rect>,
    pub failure_reason: Option<ChainFailure>,
}

impl ChainResolution {
    pub fn is_success(&self) -> bool {
        self.failure_reason.is_none() && self.destination.is_some()
    }
}

/// Resolves `NodeRef` chains against a [`WorldStore`], honoring
/// `max_chain_depth` and detecting cycles. Iterative, not recursive.
pub struct ChainResolver<'a> {
    store: &'a dyn WorldStore,
    cost_model: &'a CostModel,
    options: &'a SearchOptions,
}

impl<'a> ChainResolver<'a> {
    pub fn new(store: &'a dyn WorldStore, cost_model: &'a CostModel, options: &'a SearchOptions) -> Self {
        Self { store, cost_model, options }
    }

    pub fn resolve(&self, start: NodeRef) -> crate::errors::Result<ChainResolution> {
        let chain_start = start;
        let mut current = start;
        let mut visited: HashSet<(NodeKind, i64)> = HashSet::new();
        let mut links = Vec::new();
        let mut total_cost: i64 = 0;
        let mut depth: u32 = 0;
        let mut failure: Option<ChainFailure> = None;

        loop {
            if depth >= self.options.max_chain_depth {
                tracing::warn!(?start, limit = self.options.max_chain_depth, "chain depth exceeded");
                failure = Some(ChainFailure::ChainDepthExceeded);
                break;
            }
            let key = (current.kind, current.id);
            if !visited.insert(key) {
                tracing::warn!(?start, "chain cycle detected");
                failure = Some(ChainFailure::CycleDetected);
                break;
            }

            let Some(row) = self.store.fetch_node(current.kind, current.id)? else {
                tracing::warn!(?start, node = ?current, "chain aborted: missing node");
                failure = Some(ChainFailure::MissingNode);
                break;
            };

            let cost = self.node_cost(&row);
            let destination = self.destination_bounds(&row);
            links.push(ChainLink { node_ref: current, cost_ms: cost, destination, row });
            total_cost += cost;

            let header: &NodeHeader = links.last().unwrap().row.header();
            match header.next {
                Some((next_kind, next_id)) => {
                    current = NodeRef::new(next_kind, next_id);
                    depth += 1;
                }
                None => break,
            }
        }

        let destination = links.last().and_then(|l| l.destination);
        if failure.is_none() && destination.is_none() {
            tracing::warn!(?start, "chain resolved without destination bounds");
            failure = Some(ChainFailure::MissingDestination);
        }

        Ok(ChainResolution {
            start: chain_start,
            links,
            total_cost_ms: total_cost,
            destination,
            failure_reason: failure,
        })
    }

    fn node_cost(&self, row: &NodeRow) -> i64 {
        let header = row.header();
        match row {
            NodeRow::Door(_) => self.cost_model.door_cost(self.options, header.cost),
            NodeRow::Lodestone(_) => self.cost_model.lodestone_cost(self.options, header.cost),
            NodeRow::Object(_) => self.cost_model.object_cost(self.options, header.cost),
            NodeRow::Ifslot(_) => self.cost_model.ifslot_cost(self.options, header.cost),
            NodeRow::Npc(_) => self.cost_model.npc_cost(self.options, header.cost),
            NodeRow::Item(_) => self.cost_model.item_cost(self.options, header.cost),
        }
    }

    fn destination_bounds(&self, row: &NodeRow) -> Option<Rect> {
        match row {
            NodeRow::Lodestone(r) => Some(Rect::single_tile(r.dest)),
            NodeRow::Object(r) => Rect::from_optional(r.dest_min_x, r.dest_max_x, r.dest_min_y, r.dest_max_y, r.dest_plane),
            NodeRow::Npc(r) => Rect::from_optional(r.dest_min_x, r.dest_max_x, r.dest_min_y, r.dest_max_y, r.dest_plane),
            NodeRow::Ifslot(r) => Rect::from_optional(r.dest_min_x, r.dest_max_x, r.dest_min_y, r.dest_max_y, r.dest_plane),
            NodeRow::Item(r) => Rect::from_optional(r.dest_min_x, r.dest_max_x, r.dest_min_y, r.dest_max_y, r.dest_plane),
            NodeRow::Door(r) => {
                let inside = Rect::single_tile(r.tile_inside);
                let outside = Rect::single_tile(r.tile_outside);
                Some(inside.merge(outside))
            }
        }
    }
}
