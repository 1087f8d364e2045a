//! Search result types: `PathResult` and `ActionStep`.

use crate::coord::{NodeRef, Tile};
use crate::graph::{Edge, EdgeMetadata, StepKind};

#[derive(Debug, Clone)]
pub struct ActionStep {
    pub kind: StepKind,
    pub from_tile: Tile,
    pub to_tile: Tile,
    pub cost_ms: i64,
    pub node: Option<NodeRef>,
    pub metadata: EdgeMetadata,
}

#[derive(Debug, Clone, Default)]
pub struct PathResult {
    pub path: Option<Vec<Tile>>,
    pub actions: Vec<ActionStep>,
    /// `None` on success; one of a fixed set of reason strings otherwise:
    /// "invalid-input", "tile-not-found", "timeout", "max-expansions",
    /// "unreachable".
    pub reason: Option<&'static str>,
    pub expanded: u64,
    pub cost_ms: i64,
}

impl PathResult {
    pub fn failure(reason: &'static str, expanded: u64) -> Self {
        Self { path: None, actions: Vec::new(), reason: Some(reason), expanded, cost_ms: 0 }
    }

    pub fn trivial(start: Tile) -> Self {
        Self { path: Some(vec![start]), actions: Vec::new(), reason: None, expanded: 0, cost_ms: 0 }
    }

    pub fn is_success(&self) -> bool {
        self.reason.is_none() && self.path.is_some()
    }
}

/// Expand one reconstructed edge into its `ActionStep`s: a plain edge
/// becomes a single step; a chain-resolved edge with a non-empty chain
/// list becomes one step per link, with every link but the last keeping
/// `from_tile == to_tile == edge.from`.
pub fn expand_edge(edge: &Edge) -> Vec<ActionStep> {
    if edge.metadata.chain.is_empty() {
        return vec![ActionStep {
            kind: edge.kind,
            from_tile: edge.from,
            to_tile: edge.to,
            cost_ms: edge.cost_ms,
            node: edge.node,
            metadata: edge.metadata.clone(),
        }];
    }

    let last_index = edge.metadata.chain.len() - 1;
    edge.metadata
        .chain
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let to_tile = if i == last_index { edge.to } else { edge.from };
            ActionStep {
                kind: link.kind.into(),
                from_tile: edge.from,
                to_tile,
                cost_ms: link.cost_ms,
                node: Some(NodeRef::new(link.kind, link.id)),
                metadata: link.metadata.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::NodeKind;
    use crate::graph::ChainStepMeta;

    fn plain_edge() -> Edge {
        Edge {
            kind: StepKind::Move,
            from: Tile::new(0, 0, 0),
            to: Tile::new(1, 0, 0),
            cost_ms: 600,
            node: None,
            metadata: EdgeMetadata::default(),
        }
    }

    #[test]
    fn plain_edge_becomes_single_step() {
        let steps = expand_edge(&plain_edge());
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].to_tile, Tile::new(1, 0, 0));
    }

    #[test]
    fn chain_edge_expands_keeping_intermediate_tiles_at_origin() {
        let mut edge = plain_edge();
        edge.kind = StepKind::Object;
        edge.to = Tile::new(9, 9, 0);
        edge.metadata.chain = vec![
            ChainStepMeta { kind: NodeKind::Ifslot, id: 1, cost_ms: 100, metadata: EdgeMetadata::default() },
            ChainStepMeta { kind: NodeKind::Object, id: 2, cost_ms: 200, metadata: EdgeMetadata::default() },
        ];
        let steps = expand_edge(&edge);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].from_tile, edge.from);
        assert_eq!(steps[0].to_tile, edge.from);
        assert_eq!(steps[1].from_tile, edge.from);
        assert_eq!(steps[1].to_tile, edge.to);
    }
}
