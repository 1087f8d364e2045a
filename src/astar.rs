//! Deterministic A* engine.

use crate::coord::Tile;
use crate::errors::Result;
use crate::graph::{Edge, GraphProvider};
use crate::options::SearchOptions;
use crate::path::{expand_edge, PathResult};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::{Duration, Instant};

/// Priority-queue entry. Field declaration order IS the tie-break order
/// `(f, h, g, seq, tile)` — derived `Ord` compares fields top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueItem {
    f: i64,
    h: i64,
    g: i64,
    seq: u64,
    tile: Tile,
}

pub fn search(graph: &mut GraphProvider<'_>, start: Tile, goal: Tile, options: &SearchOptions) -> Result<PathResult> {
    if start == goal {
        return Ok(PathResult::trivial(start));
    }

    // `timeout_ms = 0` must still expire on the very first loop iteration,
    // so the deadline is computed unconditionally rather than left optional.
    let deadline = Instant::now() + Duration::from_millis(options.timeout_ms);

    let mut g_score: HashMap<Tile, i64> = HashMap::new();
    g_score.insert(start, 0);
    let mut parent: HashMap<Tile, (Tile, Edge)> = HashMap::new();
    let mut closed: HashSet<Tile> = HashSet::new();

    let mut seq: u64 = 0;
    let mut open: BinaryHeap<Reverse<QueueItem>> = BinaryHeap::new();
    let start_h = graph.cost_model().heuristic(start, goal);
    open.push(Reverse(QueueItem { f: start_h, h: start_h, g: 0, seq, tile: start }));

    let mut expanded: u64 = 0;

    while let Some(Reverse(item)) = open.pop() {
        if Instant::now() >= deadline {
            return Ok(PathResult::failure("timeout", expanded));
        }

        if item.g != *g_score.get(&item.tile).unwrap_or(&i64::MAX) {
            continue;
        }

        if item.tile == goal {
            let (path, actions, total_cost) = reconstruct(item.tile, &parent);
            return Ok(PathResult { path: Some(path), actions, reason: None, expanded, cost_ms: total_cost });
        }

        expanded += 1;
        if expanded > options.max_expansions {
            return Ok(PathResult::failure("max-expansions", expanded));
        }

        closed.insert(item.tile);

        for edge in graph.neighbors(item.tile, options)? {
            let neighbor = edge.to;
            let tentative_g = item.g + edge.cost_ms;
            if tentative_g >= *g_score.get(&neighbor).unwrap_or(&i64::MAX) {
                continue;
            }

            g_score.insert(neighbor, tentative_g);
            let nh = graph.cost_model().heuristic(neighbor, goal);
            let nf = tentative_g + nh;
            seq += 1;
            parent.insert(neighbor, (item.tile, edge));
            open.push(Reverse(QueueItem { f: nf, h: nh, g: tentative_g, seq, tile: neighbor }));
        }
    }

    Ok(PathResult::failure("unreachable", expanded))
}

fn reconstruct(end: Tile, parent: &HashMap<Tile, (Tile, Edge)>) -> (Vec<Tile>, Vec<crate::path::ActionStep>, i64) {
    let mut rev_tiles = vec![end];
    let mut rev_edges = Vec::new();
    let mut total_cost: i64 = 0;
    let mut current = end;

    while let Some((prev, edge)) = parent.get(&current) {
        rev_tiles.push(*prev);
        total_cost += edge.cost_ms;
        rev_edges.push(edge.clone());
        current = *prev;
    }

    rev_tiles.reverse();
    rev_edges.reverse();

    let mut actions = Vec::new();
    for edge in &rev_edges {
        actions.extend(expand_edge(edge));
    }

    (rev_tiles, actions, total_cost)
}
