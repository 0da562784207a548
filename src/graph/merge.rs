//! Node contraction and bulk weight maintenance.
//!
//! Both contraction primitives keep the smaller id, fold the absorbed
//! node's datum into it and move the absorbed node's edges over. Where the
//! survivor already had an edge to the same neighbour, the two records
//! collapse into one and their data is accumulated per direction.
//!
//! They differ only in what happens to the weights afterwards:
//! [`merge_nodes`](AdjacencyGraph::merge_nodes) recomputes every edge of the
//! survivor, [`topological_merge`](AdjacencyGraph::topological_merge) only
//! re-tags the existing queue entries and leaves their keys stale.

use std::mem;

use tracing::trace;

use super::AdjacencyGraph;
use super::arena::EdgeIdx;
use crate::model::{Datum, EdgeSymmetry, NodeId, Weight, WeightFn};

impl<N, W, D, F, S> AdjacencyGraph<N, W, D, F, S>
where
    N: Datum,
    W: Weight,
    D: Datum,
    F: WeightFn<N, D, W>,
    S: EdgeSymmetry,
{
    /// Contract `a` and `b` into `min(a, b)` and recompute the weights of
    /// all its edges.
    ///
    /// Returns the survivor; `merge_nodes(u, u)` is `Some(u)` and changes
    /// nothing. `None` if either id is invalid.
    pub fn merge_nodes(&mut self, a: NodeId, b: NodeId) -> Option<NodeId> {
        self.contract(a, b, true)
    }

    /// Like [`merge_nodes`](Self::merge_nodes), but queue entries keep their
    /// current weight and only learn their new endpoints.
    ///
    /// Node data is still accumulated into the survivor, unlike a purely
    /// structural merge that leaves both data untouched. A later
    /// [`recompute_all_weights`](Self::recompute_all_weights) therefore sees
    /// the merged statistics.
    pub fn topological_merge(&mut self, a: NodeId, b: NodeId) -> Option<NodeId> {
        self.contract(a, b, false)
    }

    fn contract(&mut self, a: NodeId, b: NodeId, recompute: bool) -> Option<NodeId> {
        if !self.nodes.is_live(a) || !self.nodes.is_live(b) {
            return None;
        }
        if a == b {
            return Some(a);
        }
        let (survivor, absorbed) = if a < b { (a, b) } else { (b, a) };

        let absorbed_data = mem::take(&mut self.nodes.get_mut(absorbed)?.data);
        self.nodes.get_mut(survivor)?.data.accumulate(&absorbed_data);

        self.remove_edge(survivor, absorbed);

        let moved = self.sorted_adjacency(absorbed);
        if let Some(slot) = self.nodes.get_mut(absorbed) {
            slot.adjacency.clear();
        }
        for (neighbor, idx) in moved {
            if let Some(slot) = self.nodes.get_mut(neighbor) {
                slot.adjacency.remove(&absorbed);
            }
            let existing = self
                .nodes
                .get(survivor)
                .and_then(|s| s.adjacency.get(&neighbor).copied());
            match existing {
                Some(kept) => self.fold_parallel(kept, idx, survivor, absorbed),
                None => self.relink(idx, absorbed, survivor, neighbor),
            }
        }

        for (_, idx) in self.sorted_adjacency(survivor) {
            if recompute {
                let sides = self.edges.get(idx).map_or(&[][..], |e| Self::weighted_sides(e));
                for &side in sides {
                    if let Some(w) = self.side_weight(idx, side) {
                        self.store_weight(idx, side, w);
                    }
                }
            } else if let Some(entry) = self.edges.get(idx) {
                for side in 0..2 {
                    if let Some(h) = entry.handles[side] {
                        self.queue.set_payload(h, entry.pair(side));
                    }
                }
            }
        }

        self.nodes.tombstone(absorbed);
        trace!(%survivor, %absorbed, recompute, "nodes merged");
        Some(survivor)
    }

    /// Collapse record `old` (absorbed to w) into `kept` (survivor to w).
    fn fold_parallel(&mut self, kept: EdgeIdx, old: EdgeIdx, survivor: NodeId, absorbed: NodeId) {
        let Some(old_entry) = self.edges.remove(old) else {
            return;
        };
        for h in old_entry.handles.into_iter().flatten() {
            self.queue.erase(h);
        }
        let Some(entry) = self.edges.get_mut(kept) else {
            return;
        };
        let old_side = old_entry.side_of(absorbed);
        let kept_side = entry.side_of(survivor);
        entry.data[kept_side].accumulate(&old_entry.data[old_side]);
        entry.data[1 - kept_side].accumulate(&old_entry.data[1 - old_side]);
    }

    /// Move record `idx` from `absorbed` over to `survivor`.
    fn relink(&mut self, idx: EdgeIdx, absorbed: NodeId, survivor: NodeId, neighbor: NodeId) {
        let Some(entry) = self.edges.get_mut(idx) else {
            return;
        };
        let side = entry.side_of(absorbed);
        entry.ends[side] = survivor;
        if S::SYMMETRIC {
            let upper = entry.upper_side();
            if entry.handles[upper].is_none() {
                entry.handles.swap(0, 1);
            }
        }
        if let Some(slot) = self.nodes.get_mut(survivor) {
            slot.adjacency.insert(neighbor, idx);
        }
        if let Some(slot) = self.nodes.get_mut(neighbor) {
            slot.adjacency.insert(survivor, idx);
        }
    }

    /// Rebuild the whole queue from the weight function in one pass.
    ///
    /// Entries are collected in edge-arena order and heapified at once.
    /// Every weight-carrying direction ends up weighted, including edges
    /// created by [`force_edge`](Self::force_edge).
    pub fn recompute_all_weights(&mut self) {
        self.queue.clear();
        for entry in self.edges.iter_mut() {
            entry.handles = [None, None];
        }

        let mut slots = Vec::with_capacity(self.edges.len());
        let mut batch = Vec::with_capacity(self.edges.len());
        for (idx, entry) in self.edges.iter() {
            for &side in Self::weighted_sides(entry) {
                if let Some(w) = self.side_weight(idx, side) {
                    batch.push((w, entry.pair(side)));
                    slots.push((idx, side));
                }
            }
        }

        let handles = self.queue.build(batch);
        for ((idx, side), h) in slots.into_iter().zip(handles) {
            if let Some(entry) = self.edges.get_mut(idx) {
                entry.handles[side] = Some(h);
            }
        }
    }

    /// Copy the datum of each edge's upper direction (source is the larger
    /// id) onto its lower direction.
    pub fn mirror_edge_data(&mut self) {
        for entry in self.edges.iter_mut() {
            let upper = entry.upper_side();
            entry.data[1 - upper] = entry.data[upper].clone();
        }
    }
}
