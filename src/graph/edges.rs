//! Edge insertion, removal, data and weight access.

use tracing::trace;

use super::AdjacencyGraph;
use super::arena::{EdgeEntry, EdgeIdx};
use crate::model::{Datum, EdgeSymmetry, NodeId, NodePair, Weight, WeightFn};

impl<N, W, D, F, S> AdjacencyGraph<N, W, D, F, S>
where
    N: Datum,
    W: Weight,
    D: Datum,
    F: WeightFn<N, D, W>,
    S: EdgeSymmetry,
{
    // ========================================================================
    // Lookup helpers
    // ========================================================================

    #[inline]
    pub(super) fn edge_idx(&self, a: NodeId, b: NodeId) -> Option<EdgeIdx> {
        if !self.nodes.is_live(b) {
            return None;
        }
        self.nodes.get(a)?.adjacency.get(&b).copied()
    }

    /// Halves of `entry` that carry a queue entry.
    #[inline]
    pub(super) fn weighted_sides(entry: &EdgeEntry<D>) -> &'static [usize] {
        if !S::SYMMETRIC {
            &[0, 1]
        } else if entry.upper_side() == 0 {
            &[0]
        } else {
            &[1]
        }
    }

    /// Half that holds the weight of direction `source -> ...`.
    #[inline]
    fn weight_side(entry: &EdgeEntry<D>, source: NodeId) -> usize {
        if S::SYMMETRIC {
            entry.upper_side()
        } else {
            entry.side_of(source)
        }
    }

    /// Weight of half `side` as the weight function sees it.
    pub(super) fn side_weight(&self, idx: EdgeIdx, side: usize) -> Option<W> {
        let entry = self.edges.get(idx)?;
        let (source, target) = entry.pair(side);
        let source = &self.nodes.get(source)?.data;
        let target = &self.nodes.get(target)?.data;
        Some(self.weight_fn.weight(source, target, &entry.data[side]))
    }

    /// Store `weight` for half `side`, inserting a queue entry if it has none.
    pub(super) fn store_weight(&mut self, idx: EdgeIdx, side: usize, weight: W) {
        let Some(entry) = self.edges.get_mut(idx) else {
            return;
        };
        let pair = entry.pair(side);
        match entry.handles[side] {
            Some(h) if self.queue.update_with(h, weight, pair) => {}
            _ => entry.handles[side] = Some(self.queue.insert(weight, pair)),
        }
    }

    fn link(&mut self, a: NodeId, b: NodeId, forward: D, backward: D) -> Option<EdgeIdx> {
        if a == b || !self.nodes.is_live(a) || !self.nodes.is_live(b) {
            return None;
        }
        if self.nodes.get(a)?.adjacency.contains_key(&b) {
            return None;
        }
        let idx = self.edges.insert(EdgeEntry::new(a, b, forward, backward));
        self.nodes.get_mut(a)?.adjacency.insert(b, idx);
        self.nodes.get_mut(b)?.adjacency.insert(a, idx);
        Some(idx)
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Connect `a` and `b`, both directions holding `data`. Weights come from
    /// the weight function.
    ///
    /// Fails for `a == b`, invalid ids or an existing edge.
    pub fn insert_edge(&mut self, a: NodeId, b: NodeId, data: D) -> bool {
        self.insert_edge_pair(a, b, data.clone(), data)
    }

    /// Like [`insert_edge`](Self::insert_edge) with separate data for
    /// `a -> b` and `b -> a`.
    pub fn insert_edge_pair(&mut self, a: NodeId, b: NodeId, forward: D, backward: D) -> bool {
        let Some(idx) = self.link(a, b, forward, backward) else {
            return false;
        };
        let sides = self
            .edges
            .get(idx)
            .map_or(&[][..], |e| Self::weighted_sides(e));
        for &side in sides {
            if let Some(w) = self.side_weight(idx, side) {
                self.store_weight(idx, side, w);
            }
        }
        true
    }

    /// Connect `a` and `b` with an explicit weight for both directions.
    pub fn insert_weighted_edge(&mut self, a: NodeId, b: NodeId, data: D, weight: W) -> bool {
        self.insert_weighted_edge_pair(a, b, data.clone(), weight, data, weight)
    }

    /// Explicit data and weight per direction. Symmetric graphs use
    /// `forward_weight` for the single queued half.
    pub fn insert_weighted_edge_pair(
        &mut self,
        a: NodeId,
        b: NodeId,
        forward: D,
        forward_weight: W,
        backward: D,
        backward_weight: W,
    ) -> bool {
        let Some(idx) = self.link(a, b, forward, backward) else {
            return false;
        };
        if S::SYMMETRIC {
            let side = if a > b { 0 } else { 1 };
            self.store_weight(idx, side, forward_weight);
        } else {
            self.store_weight(idx, 0, forward_weight);
            self.store_weight(idx, 1, backward_weight);
        }
        true
    }

    /// Edge datum of `a -> b`, creating an unweighted edge with default data
    /// in both directions if none exists.
    ///
    /// `None` for `a == b` or invalid ids.
    pub fn force_edge(&mut self, a: NodeId, b: NodeId) -> Option<&mut D> {
        let idx = match self.edge_idx(a, b) {
            Some(idx) => idx,
            None => self.link(a, b, D::default(), D::default())?,
        };
        let entry = self.edges.get_mut(idx)?;
        let side = entry.side_of(a);
        Some(&mut entry.data[side])
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove both directions of the edge and their queue entries.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let Some(idx) = self.edge_idx(a, b) else {
            return false;
        };
        if let Some(slot) = self.nodes.get_mut(a) {
            slot.adjacency.remove(&b);
        }
        if let Some(slot) = self.nodes.get_mut(b) {
            slot.adjacency.remove(&a);
        }
        if let Some(entry) = self.edges.remove(idx) {
            for h in entry.handles.into_iter().flatten() {
                self.queue.erase(h);
            }
        }
        trace!(%a, %b, "edge removed");
        true
    }

    // ========================================================================
    // Data
    // ========================================================================

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_idx(a, b).is_some()
    }

    /// Datum of direction `a -> b`.
    pub fn edge_data(&self, a: NodeId, b: NodeId) -> Option<&D> {
        let entry = self.edges.get(self.edge_idx(a, b)?)?;
        Some(&entry.data[entry.side_of(a)])
    }

    pub fn edge_data_mut(&mut self, a: NodeId, b: NodeId) -> Option<&mut D> {
        let idx = self.edge_idx(a, b)?;
        let entry = self.edges.get_mut(idx)?;
        let side = entry.side_of(a);
        Some(&mut entry.data[side])
    }

    /// Overwrite the datum of `a -> b`; symmetric graphs write both
    /// directions. Weights are not refreshed.
    pub fn set_edge_data(&mut self, a: NodeId, b: NodeId, data: D) -> bool {
        let Some(entry) = self.edge_idx(a, b).and_then(|idx| self.edges.get_mut(idx)) else {
            return false;
        };
        let side = entry.side_of(a);
        if S::SYMMETRIC {
            entry.data[1 - side] = data.clone();
        }
        entry.data[side] = data;
        true
    }

    // ========================================================================
    // Weights
    // ========================================================================

    /// Stored weight of `a -> b`. `None` if the edge is missing or unweighted.
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<W> {
        let entry = self.edges.get(self.edge_idx(a, b)?)?;
        let h = entry.handles[Self::weight_side(entry, a)]?;
        self.queue.key(h).copied()
    }

    /// Set an explicit weight for `a -> b` (for both directions when
    /// symmetric).
    pub fn set_edge_weight(&mut self, a: NodeId, b: NodeId, weight: W) -> bool {
        let Some(idx) = self.edge_idx(a, b) else {
            return false;
        };
        let Some(side) = self.edges.get(idx).map(|e| Self::weight_side(e, a)) else {
            return false;
        };
        self.store_weight(idx, side, weight);
        true
    }

    /// Recompute the weight of `a -> b` with the weight function and store it.
    pub fn update_edge_weight(&mut self, a: NodeId, b: NodeId) -> bool {
        let Some(idx) = self.edge_idx(a, b) else {
            return false;
        };
        let Some(side) = self.edges.get(idx).map(|e| Self::weight_side(e, a)) else {
            return false;
        };
        match self.side_weight(idx, side) {
            Some(w) => {
                self.store_weight(idx, side, w);
                true
            }
            None => false,
        }
    }

    /// Evaluate the weight function for `a -> b` without storing the result.
    pub fn compute_edge_weight(&self, a: NodeId, b: NodeId) -> Option<W> {
        let idx = self.edge_idx(a, b)?;
        let side = Self::weight_side(self.edges.get(idx)?, a);
        self.side_weight(idx, side)
    }

    /// Reverse direction of `(a, b)`, read through the shared edge record.
    ///
    /// Both adjacency maps must point at the same record; a mismatch is a
    /// bookkeeping bug and trips a debug assertion.
    pub fn complement(&self, a: NodeId, b: NodeId) -> Option<NodePair> {
        let forward = self.edge_idx(a, b)?;
        let backward = self.edge_idx(b, a)?;
        debug_assert_eq!(forward, backward, "edge ({a}, {b}) and its reverse disagree");
        let entry = self.edges.get(forward)?;
        let side = entry.side_of(a);
        (forward == backward && entry.pair(side) == (a, b)).then(|| entry.pair(1 - side))
    }
}
