//! Weight functions and edge symmetry markers.

/// Derives the merge cost of an edge from its two end nodes and its data.
///
/// Must be deterministic and free of side effects: the graph calls it again
/// whenever weights are recomputed and expects the same answer.
///
/// Any `Fn(&N, &N, &D) -> W` closure is a weight function.
pub trait WeightFn<N, D, W> {
    fn weight(&self, source: &N, target: &N, data: &D) -> W;
}

impl<N, D, W, F> WeightFn<N, D, W> for F
where
    F: Fn(&N, &N, &D) -> W,
{
    #[inline]
    fn weight(&self, source: &N, target: &N, data: &D) -> W {
        self(source, target, data)
    }
}

/// Weight function that always yields `W::default()`.
///
/// For graphs where only the topology matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidWeight;

impl<N, D, W: Default> WeightFn<N, D, W> for VoidWeight {
    #[inline]
    fn weight(&self, _source: &N, _target: &N, _data: &D) -> W {
        W::default()
    }
}

/// Whether the weight of an edge depends on its direction.
pub trait EdgeSymmetry {
    const SYMMETRIC: bool;
}

/// Edge weight is the same in both directions; one queue entry per edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Symmetric;

/// Each direction of an edge carries its own weight and queue entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Asymmetric;

impl EdgeSymmetry for Symmetric {
    const SYMMETRIC: bool = true;
}

impl EdgeSymmetry for Asymmetric {
    const SYMMETRIC: bool = false;
}
