//! Node and edge enumeration, plus the bookkeeping check used by tests.

use smallvec::SmallVec;

use super::AdjacencyGraph;
use super::arena::EdgeIdx;
use crate::model::{Datum, EdgeSymmetry, NodeId, Weight, WeightFn};

/// One direction of an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView<'a, D, W> {
    pub source: NodeId,
    pub target: NodeId,
    pub data: &'a D,
    /// `None` when this direction has no queue entry.
    pub weight: Option<W>,
}

impl<N, W, D, F, S> AdjacencyGraph<N, W, D, F, S>
where
    N: Datum,
    W: Weight,
    D: Datum,
    F: WeightFn<N, D, W>,
    S: EdgeSymmetry,
{
    /// Valid nodes with their data, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> {
        self.nodes.iter().map(|(id, slot)| (id, &slot.data))
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|(id, _)| id)
    }

    /// Neighbours of `id` in ascending order. Empty for an invalid id.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .nodes
            .get(id)
            .map(|s| s.adjacency.keys().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Adjacency of `id` as `(neighbour, record)` pairs in ascending
    /// neighbour order.
    pub(super) fn sorted_adjacency(&self, id: NodeId) -> SmallVec<[(NodeId, EdgeIdx); 8]> {
        let mut out: SmallVec<[(NodeId, EdgeIdx); 8]> = self
            .nodes
            .get(id)
            .map(|s| s.adjacency.iter().map(|(&n, &e)| (n, e)).collect())
            .unwrap_or_default();
        out.sort_unstable_by_key(|&(n, _)| n);
        out
    }

    fn view(&self, idx: EdgeIdx, side: usize) -> Option<EdgeView<'_, D, W>> {
        let entry = self.edges.get(idx)?;
        let (source, target) = entry.pair(side);
        let weight = entry.handles[side].and_then(|h| self.queue.key(h).copied());
        Some(EdgeView {
            source,
            target,
            data: &entry.data[side],
            weight,
        })
    }

    /// Outgoing directions of `id`, ordered by target.
    ///
    /// On symmetric graphs the weight is reported on every direction.
    pub fn edges_of(&self, id: NodeId) -> Vec<EdgeView<'_, D, W>> {
        self.sorted_adjacency(id)
            .into_iter()
            .filter_map(|(target, idx)| {
                let side = self.edges.get(idx)?.side_of(id);
                let mut v = self.view(idx, side)?;
                if S::SYMMETRIC {
                    v.weight = self.edge_weight(id, target);
                }
                Some(v)
            })
            .collect()
    }

    /// Every weight-carrying direction once, in edge-arena order: one view
    /// per symmetric edge (source is the larger id), two per asymmetric edge.
    pub fn edge_list(&self) -> Vec<EdgeView<'_, D, W>> {
        self.edges
            .iter()
            .flat_map(|(idx, entry)| {
                Self::weighted_sides(entry)
                    .iter()
                    .filter_map(move |&side| self.view(idx, side))
            })
            .collect()
    }

    /// Verify that adjacency maps, edge records and the queue agree.
    ///
    /// - every adjacency entry names a live neighbour whose map points at the
    ///   same record
    /// - every record is reachable from both of its ends
    /// - queued payloads match the half they belong to
    /// - symmetric records queue only their upper half
    /// - the queue holds no orphaned entries and is heap-ordered
    pub fn check_consistency(&self) -> bool {
        if !self.nodes.is_consistent() || !self.queue.check_heap() {
            return false;
        }

        let mut directed = 0usize;
        for (id, slot) in self.nodes.iter() {
            for (&other, &idx) in &slot.adjacency {
                directed += 1;
                let back = self.nodes.get(other).and_then(|s| s.adjacency.get(&id));
                if other == id || back != Some(&idx) {
                    return false;
                }
                match self.edges.get(idx) {
                    Some(e) if e.ends.contains(&id) && e.ends.contains(&other) => {}
                    _ => return false,
                }
            }
        }
        if directed != 2 * self.edges.len() {
            return false;
        }

        let mut queued = 0usize;
        for (_, entry) in self.edges.iter() {
            for side in 0..2 {
                let Some(h) = entry.handles[side] else {
                    continue;
                };
                if S::SYMMETRIC && side != entry.upper_side() {
                    return false;
                }
                if self.queue.payload(h) != Some(&entry.pair(side)) {
                    return false;
                }
                queued += 1;
            }
        }
        queued == self.queue.len()
    }
}
