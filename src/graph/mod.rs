//! # Weighted Adjacency Graph
//!
//! [`AdjacencyGraph`] keeps per-node statistics, per-direction edge data and
//! a priority queue over edge weights, so the globally cheapest edge is
//! always one peek away.
//!
//! ## Storage
//!
//! | Part | Layout |
//! |------|--------|
//! | nodes | dense slots, tombstoned on removal and reused by `insert_node` |
//! | adjacency | per-node `HashMap<NodeId, EdgeIdx>` |
//! | edges | one arena record per undirected edge, holding both directions |
//! | weights | [`IndexedMinQueue`] keyed by weight, payload `(source, target)` |
//!
//! Since both directions of an edge share one record, the reverse of
//! `(u, v)` is found without a second lookup and survives every move a
//! contraction makes.
//!
//! ## Symmetric graphs
//!
//! With [`Symmetric`] edges only the half whose source is the larger id
//! carries a queue entry, so `lowest_weight_edge` reports such edges as
//! `(larger, smaller)`. The weight of that half is
//! `f(node[larger], node[smaller], data[larger -> smaller])`.
//!
//! ## Failure model
//!
//! Mutations are advisory: invalid ids, self edges and duplicates yield
//! `false`/`None` and leave the graph untouched.

mod arena;
mod edges;
mod iter;
mod merge;

pub use iter::EdgeView;

use std::marker::PhantomData;

use crate::index::IndexedMinQueue;
use crate::model::{
    Datum, EdgeSymmetry, NodeHandle, NodeId, NodePair, Symmetric, VoidWeight, Weight, WeightFn,
};
use arena::{EdgeArena, NodeArena};

// ============================================================================
// AdjacencyGraph
// ============================================================================

/// Weighted undirected graph with directional edge data.
///
/// - `N`: node datum
/// - `W`: weight
/// - `D`: edge datum
/// - `F`: weight function
/// - `S`: [`Symmetric`] or [`Asymmetric`](crate::model::Asymmetric)
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<N, W = f32, D = u32, F = VoidWeight, S = Symmetric> {
    nodes: NodeArena<N>,
    edges: EdgeArena<D>,
    queue: IndexedMinQueue<W, NodePair>,
    weight_fn: F,
    _symmetry: PhantomData<S>,
}

impl<N, W, D, F, S> Default for AdjacencyGraph<N, W, D, F, S>
where
    N: Datum,
    W: Weight,
    D: Datum,
    F: WeightFn<N, D, W> + Default,
    S: EdgeSymmetry,
{
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<N, W, D, F, S> AdjacencyGraph<N, W, D, F, S>
where
    N: Datum,
    W: Weight,
    D: Datum,
    F: WeightFn<N, D, W>,
    S: EdgeSymmetry,
{
    pub fn new(weight_fn: F) -> Self {
        Self {
            nodes: NodeArena::default(),
            edges: EdgeArena::default(),
            queue: IndexedMinQueue::new(),
            weight_fn,
            _symmetry: PhantomData,
        }
    }

    /// Graph with `count` nodes `0..count`, each holding a clone of `data`.
    pub fn with_nodes(count: usize, data: N, weight_fn: F) -> Self {
        let mut graph = Self::new(weight_fn);
        graph.insert_nodes(count, data);
        graph
    }

    /// `true` for graphs with direction-independent weights.
    #[inline]
    pub fn is_symmetric(&self) -> bool {
        S::SYMMETRIC
    }

    pub fn weight_fn(&self) -> &F {
        &self.weight_fn
    }

    /// Swap the weight function. Stored weights are kept; call
    /// [`recompute_all_weights`](Self::recompute_all_weights) to refresh them.
    pub fn set_weight_fn(&mut self, weight_fn: F) {
        self.weight_fn = weight_fn;
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Add a node. Free slots next to the valid range are reused first,
    /// then interior holes; otherwise the node is appended.
    pub fn insert_node(&mut self, data: N) -> NodeId {
        self.nodes.insert(data)
    }

    /// Add `count` nodes holding clones of `data`.
    pub fn insert_nodes(&mut self, count: usize, data: N) -> Vec<NodeId> {
        (0..count).map(|_| self.nodes.insert(data.clone())).collect()
    }

    /// Remove a node and every edge touching it.
    ///
    /// Returns `false` if `id` is not a valid node.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if !self.is_node_id_valid(id) {
            return false;
        }
        for neighbor in self.neighbors(id) {
            self.remove_edge(id, neighbor);
        }
        self.nodes.tombstone(id).is_some()
    }

    /// Drop everything, then create nodes `0..count` holding clones of `data`.
    pub fn resize(&mut self, count: usize, data: N) {
        self.clear();
        self.insert_nodes(count, data);
    }

    /// Remove all nodes and edges. Handles taken earlier turn stale.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.edges.clear();
        self.nodes.clear();
    }

    /// Number of valid nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.nodes.live_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.live_count() == 0
    }

    #[inline]
    pub fn is_node_id_valid(&self, id: NodeId) -> bool {
        self.nodes.is_live(id)
    }

    pub fn first_valid_id(&self) -> Option<NodeId> {
        self.nodes.range().map(|(first, _)| NodeId(first))
    }

    /// Largest valid id, `None` for an empty graph.
    pub fn last_valid_id(&self) -> Option<NodeId> {
        self.nodes.range().map(|(_, last)| NodeId(last))
    }

    pub fn node_data(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(id).map(|s| &s.data)
    }

    /// Mutable node datum. Weights of incident edges are not refreshed.
    pub fn node_data_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(id).map(|s| &mut s.data)
    }

    pub fn set_node_data(&mut self, id: NodeId, data: N) -> bool {
        match self.nodes.get_mut(id) {
            Some(slot) => {
                slot.data = data;
                true
            }
            None => false,
        }
    }

    /// Generation-checked handle to a valid node.
    pub fn node_handle(&self, id: NodeId) -> Option<NodeHandle> {
        self.nodes
            .generation(id)
            .map(|generation| NodeHandle { id, generation })
    }

    /// `false` once the node behind `handle` was removed or absorbed, even if
    /// its id has been handed out again.
    pub fn is_handle_live(&self, handle: NodeHandle) -> bool {
        self.nodes.generation(handle.id) == Some(handle.generation)
    }

    // ========================================================================
    // Counts
    // ========================================================================

    /// Outgoing edges of `id`, `None` for an invalid id.
    pub fn number_edges(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id).map(|s| s.adjacency.len())
    }

    /// Valid nodes with at least one edge.
    pub fn total_adjacent_nodes(&self) -> usize {
        self.nodes
            .iter()
            .filter(|(_, s)| !s.adjacency.is_empty())
            .count()
    }

    /// Directed edge records, i.e. twice the number of undirected edges.
    pub fn total_edges(&self) -> usize {
        self.nodes.iter().map(|(_, s)| s.adjacency.len()).sum()
    }

    /// Undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ========================================================================
    // Priority queue
    // ========================================================================

    /// Cheapest weighted edge as `((source, target), weight)`.
    pub fn lowest_weight_edge(&self) -> Option<(NodePair, W)> {
        self.queue.front().map(|(w, pair)| (*pair, *w))
    }

    /// Number of queued edge weights.
    pub fn weighted_edge_count(&self) -> usize {
        self.queue.len()
    }
}
