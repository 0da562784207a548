//! Region adjacency graph construction from a label image.
//!
//! [`RegionGraphBuilder`] runs one forward scan over the labels. Each pixel
//! is compared with its right and bottom neighbour, which covers every
//! 4-adjacent pair exactly once. What the scan records on nodes and edges is
//! decided by a [`RegionHooks`] strategy.

use tracing::{debug, warn};

use crate::graph::AdjacencyGraph;
use crate::model::{Datum, EdgeSymmetry, Matrix, NodeId, Pixel, Weight, WeightFn};
use crate::{Error, Result};

/// Customization points of the builder scan. Every hook has a no-op default.
pub trait RegionHooks {
    type Node: Datum;
    type Edge: Datum;

    /// Validate hook-owned data against the label image before the scan.
    fn check_internal_data(&self, _rows: usize, _cols: usize, _max_label: usize) -> Result<()> {
        Ok(())
    }

    /// Fold the pixel at `pixel`, labelled `label`, into its region.
    fn consider_for_node_data(&mut self, _pixel: Pixel, _label: usize, _node: &mut Self::Node) {}

    /// Fold one adjacent pixel pair across a region boundary into the edge
    /// datum of the direction `larger label -> smaller label`.
    fn consider_for_edge_data(&mut self, _from: Pixel, _to: Pixel, _edge: &mut Self::Edge) {}

    /// Runs once after the scan, before weights are computed.
    fn prepare_edge_and_node_data<W, F, S>(
        &mut self,
        _graph: &mut AdjacencyGraph<Self::Node, W, Self::Edge, F, S>,
    ) -> Result<()>
    where
        W: Weight,
        F: WeightFn<Self::Node, Self::Edge, W>,
        S: EdgeSymmetry,
    {
        Ok(())
    }
}

/// Builds region adjacency graphs with the strategy `H`.
#[derive(Debug, Clone, Default)]
pub struct RegionGraphBuilder<H> {
    hooks: H,
}

impl<H: RegionHooks> RegionGraphBuilder<H> {
    pub fn new(hooks: H) -> Self {
        Self { hooks }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn into_hooks(self) -> H {
        self.hooks
    }

    /// Rebuild `graph` from `labels`.
    ///
    /// The graph ends up with one node per label in `0..=max(labels)`, used
    /// or not. Two labels are connected when they touch and the larger one is
    /// at least `min_label`. Afterwards every edge is weighted.
    pub fn generate<W, F, S>(
        &mut self,
        labels: &Matrix<usize>,
        min_label: usize,
        graph: &mut AdjacencyGraph<H::Node, W, H::Edge, F, S>,
    ) -> Result<()>
    where
        W: Weight,
        F: WeightFn<H::Node, H::Edge, W>,
        S: EdgeSymmetry,
    {
        self.generate_with_data(labels, min_label, &[], graph)
    }

    /// Like [`generate`](Self::generate), but node `i` starts with
    /// `initial[i]` instead of the default datum.
    pub fn generate_with_data<W, F, S>(
        &mut self,
        labels: &Matrix<usize>,
        min_label: usize,
        initial: &[H::Node],
        graph: &mut AdjacencyGraph<H::Node, W, H::Edge, F, S>,
    ) -> Result<()>
    where
        W: Weight,
        F: WeightFn<H::Node, H::Edge, W>,
        S: EdgeSymmetry,
    {
        graph.clear();
        let max_label = labels.max_value().ok_or(Error::EmptyLabels)?;
        let (rows, cols) = labels.size();
        let Some(node_count) = max_label.checked_add(1) else {
            warn!(max_label, "label too large for a node id range");
            return Err(Error::InternalDataCheck(format!(
                "label {max_label} leaves no room for a node range"
            )));
        };

        if let Err(e) = self.hooks.check_internal_data(rows, cols, max_label) {
            warn!(rows, cols, max_label, error = %e, "internal data check failed");
            return Err(e);
        }

        graph.resize(node_count, H::Node::default());
        for (i, data) in initial.iter().take(node_count).enumerate() {
            graph.set_node_data(NodeId(i), data.clone());
        }

        self.scan(labels, min_label, graph);
        debug!(rows, cols, nodes = graph.size(), edges = graph.edge_count(), "label scan done");

        self.hooks.prepare_edge_and_node_data(graph)?;
        if S::SYMMETRIC {
            graph.mirror_edge_data();
        }
        graph.recompute_all_weights();
        debug!(weighted = graph.weighted_edge_count(), "region graph ready");
        Ok(())
    }

    fn scan<W, F, S>(
        &mut self,
        labels: &Matrix<usize>,
        min_label: usize,
        graph: &mut AdjacencyGraph<H::Node, W, H::Edge, F, S>,
    ) where
        W: Weight,
        F: WeightFn<H::Node, H::Edge, W>,
        S: EdgeSymmetry,
    {
        let (rows, cols) = labels.size();
        for y in 0..rows {
            for x in 0..cols {
                let p = Pixel::new(x, y);
                let a = labels[p];
                if let Some(node) = graph.node_data_mut(NodeId(a)) {
                    self.hooks.consider_for_node_data(p, a, node);
                }
                if x + 1 < cols {
                    self.boundary(labels, p, Pixel::new(x + 1, y), min_label, graph);
                }
                if y + 1 < rows {
                    self.boundary(labels, p, Pixel::new(x, y + 1), min_label, graph);
                }
            }
        }
    }

    fn boundary<W, F, S>(
        &mut self,
        labels: &Matrix<usize>,
        from: Pixel,
        to: Pixel,
        min_label: usize,
        graph: &mut AdjacencyGraph<H::Node, W, H::Edge, F, S>,
    ) where
        W: Weight,
        F: WeightFn<H::Node, H::Edge, W>,
        S: EdgeSymmetry,
    {
        let (a, b) = (labels[from], labels[to]);
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        if hi < min_label {
            return;
        }
        if let Some(edge) = graph.force_edge(NodeId(hi), NodeId(lo)) {
            self.hooks.consider_for_edge_data(from, to, edge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Asymmetric, Symmetric, VoidWeight};
    use crate::region::hooks::BoundaryCount;
    use pretty_assertions::assert_eq;

    type Graph = AdjacencyGraph<u32, f32, u32, VoidWeight, Symmetric>;

    fn labels(rows: Vec<Vec<usize>>) -> Matrix<usize> {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_boundary_pairs_counted_once() {
        let mut builder = RegionGraphBuilder::new(BoundaryCount);
        let mut g = Graph::default();
        builder
            .generate(&labels(vec![vec![1, 1, 2], vec![1, 2, 2]]), 0, &mut g)
            .unwrap();

        assert_eq!(g.size(), 3);
        assert_eq!(g.number_edges(NodeId(0)), Some(0));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_data(NodeId(2), NodeId(1)), Some(&3));
        assert_eq!(g.edge_data(NodeId(1), NodeId(2)), Some(&3));
        assert_eq!(g.node_data(NodeId(1)), Some(&3));
        assert_eq!(g.node_data(NodeId(2)), Some(&3));
        assert_eq!(g.lowest_weight_edge(), Some(((NodeId(2), NodeId(1)), 0.0)));
        assert!(g.check_consistency());
    }

    #[test]
    fn test_min_label_skips_protected_pairs() {
        let mut builder = RegionGraphBuilder::new(BoundaryCount);
        let mut g = Graph::default();
        let l = labels(vec![vec![0, 1, 3], vec![0, 1, 3]]);
        builder.generate(&l, 2, &mut g).unwrap();
        assert!(!g.has_edge(NodeId(0), NodeId(1)));
        assert!(g.has_edge(NodeId(3), NodeId(1)));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_asymmetric_edge_data_is_not_mirrored() {
        let mut builder = RegionGraphBuilder::new(BoundaryCount);
        let mut g: AdjacencyGraph<u32, f32, u32, VoidWeight, Asymmetric> = AdjacencyGraph::default();
        builder.generate(&labels(vec![vec![0, 1]]), 0, &mut g).unwrap();
        assert_eq!(g.edge_data(NodeId(1), NodeId(0)), Some(&1));
        assert_eq!(g.edge_data(NodeId(0), NodeId(1)), Some(&0));
        assert_eq!(g.weighted_edge_count(), 2);
    }

    #[test]
    fn test_initial_node_data() {
        let mut builder = RegionGraphBuilder::new(BoundaryCount);
        let mut g = Graph::default();
        let l = labels(vec![vec![0, 1]]);
        builder.generate_with_data(&l, 0, &[10, 20, 30], &mut g).unwrap();
        assert_eq!(g.size(), 2);
        assert_eq!(g.node_data(NodeId(0)), Some(&11));
        assert_eq!(g.node_data(NodeId(1)), Some(&21));
    }

    #[test]
    fn test_empty_labels_rejected() {
        let mut builder = RegionGraphBuilder::new(BoundaryCount);
        let mut g = Graph::default();
        let empty: Matrix<usize> = Matrix::from_vec(0, 0, Vec::new()).unwrap();
        assert!(matches!(builder.generate(&empty, 0, &mut g), Err(Error::EmptyLabels)));
    }

    #[test]
    fn test_largest_label_value_rejected() {
        let mut builder = RegionGraphBuilder::new(BoundaryCount);
        let mut g = Graph::default();
        let l = labels(vec![vec![0, usize::MAX]]);
        assert!(matches!(builder.generate(&l, 0, &mut g), Err(Error::InternalDataCheck(_))));
        assert!(g.is_empty());
    }

    #[test]
    fn test_rebuild_replaces_previous_graph() {
        let mut builder = RegionGraphBuilder::new(BoundaryCount);
        let mut g = Graph::default();
        builder.generate(&labels(vec![vec![0, 1, 2]]), 0, &mut g).unwrap();
        builder.generate(&labels(vec![vec![0, 1]]), 0, &mut g).unwrap();
        assert_eq!(g.size(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.check_consistency());
    }
}
