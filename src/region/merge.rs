//! Greedy merge driver.
//!
//! Repeatedly contracts the cheapest edge of a region graph until the
//! cheapest weight exceeds the threshold, the queue runs dry, or only
//! `min_region_number` connected regions are left.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::graph::AdjacencyGraph;
use crate::model::{Datum, EdgeSymmetry, NodeId, NodePair, Weight, WeightFn};
use crate::Result;

use super::Equivalences;

/// Contraction primitive used by the merge loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergeMode {
    /// Recompute the survivor's edge weights after every merge.
    Optimal,
    /// Keep the weights queued at build time. Faster; later decisions see
    /// stale costs.
    #[default]
    Fast,
}

/// Merge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeParams<W> {
    pub mode: MergeMode,
    /// Edges heavier than this are never contracted.
    pub threshold: W,
    /// Stop once this many connected regions remain.
    pub min_region_number: usize,
}

impl<W: Default> Default for MergeParams<W> {
    fn default() -> Self {
        Self {
            mode: MergeMode::default(),
            threshold: W::default(),
            min_region_number: 1,
        }
    }
}

impl<W> MergeParams<W>
where
    W: Serialize + for<'de> Deserialize<'de> + Default,
{
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    QueueEmpty,
    AboveThreshold,
    RegionFloor,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::QueueEmpty => "no edges left",
            StopReason::AboveThreshold => "cheapest edge above threshold",
            StopReason::RegionFloor => "region floor reached",
        };
        f.write_str(s)
    }
}

/// Runs merge loops over region graphs.
#[derive(Debug, Clone, Default)]
pub struct RegionMerger<W> {
    params: MergeParams<W>,
}

impl<W: Weight> RegionMerger<W> {
    pub fn new(params: MergeParams<W>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MergeParams<W> {
        &self.params
    }

    pub fn set_params(&mut self, params: MergeParams<W>) {
        self.params = params;
    }

    /// Merge with the configured threshold.
    pub fn merge_default<N, D, F, S>(&self, graph: &mut AdjacencyGraph<N, W, D, F, S>) -> Equivalences
    where
        N: Datum,
        D: Datum,
        F: WeightFn<N, D, W>,
        S: EdgeSymmetry,
    {
        self.merge(self.params.threshold, graph)
    }

    /// Contract cheapest edges while their weight is at most `threshold`.
    ///
    /// The returned table has `last_valid_id + 1` entries, resolved to the
    /// smallest label of each class.
    pub fn merge<N, D, F, S>(&self, threshold: W, graph: &mut AdjacencyGraph<N, W, D, F, S>) -> Equivalences
    where
        N: Datum,
        D: Datum,
        F: WeightFn<N, D, W>,
        S: EdgeSymmetry,
    {
        self.run(threshold, None, graph)
    }

    /// Protected-label merge with the configured threshold.
    pub fn merge_protected_default<N, D, F, S>(
        &self,
        min_label: usize,
        graph: &mut AdjacencyGraph<N, W, D, F, S>,
    ) -> Equivalences
    where
        N: Datum,
        D: Datum,
        F: WeightFn<N, D, W>,
        S: EdgeSymmetry,
    {
        self.merge_protected(self.params.threshold, min_label, graph)
    }

    /// Like [`merge`](Self::merge), but two regions whose representatives
    /// are both below `min_label` are never joined. The edge between them is
    /// removed from the graph instead.
    pub fn merge_protected<N, D, F, S>(
        &self,
        threshold: W,
        min_label: usize,
        graph: &mut AdjacencyGraph<N, W, D, F, S>,
    ) -> Equivalences
    where
        N: Datum,
        D: Datum,
        F: WeightFn<N, D, W>,
        S: EdgeSymmetry,
    {
        self.run(threshold, Some(min_label), graph)
    }

    fn contract<N, D, F, S>(&self, (a, b): NodePair, graph: &mut AdjacencyGraph<N, W, D, F, S>) -> Option<NodeId>
    where
        N: Datum,
        D: Datum,
        F: WeightFn<N, D, W>,
        S: EdgeSymmetry,
    {
        match self.params.mode {
            MergeMode::Optimal => graph.merge_nodes(a, b),
            MergeMode::Fast => graph.topological_merge(a, b),
        }
    }

    fn run<N, D, F, S>(
        &self,
        threshold: W,
        min_label: Option<usize>,
        graph: &mut AdjacencyGraph<N, W, D, F, S>,
    ) -> Equivalences
    where
        N: Datum,
        D: Datum,
        F: WeightFn<N, D, W>,
        S: EdgeSymmetry,
    {
        let len = graph.last_valid_id().map_or(0, |id| id.index() + 1);
        let mut equivalences = Equivalences::identity(len);
        let mut regions = graph.total_adjacent_nodes();
        let mut merges = 0usize;
        let mut discarded = 0usize;

        let stop = loop {
            let Some(((a, b), w)) = graph.lowest_weight_edge() else {
                break StopReason::QueueEmpty;
            };
            if !matches!(w.partial_cmp(&threshold), Some(Ordering::Less | Ordering::Equal)) {
                break StopReason::AboveThreshold;
            }
            if regions <= self.params.min_region_number {
                break StopReason::RegionFloor;
            }

            if let Some(min_label) = min_label {
                let top = equivalences
                    .representative(a.index())
                    .max(equivalences.representative(b.index()));
                if top < min_label {
                    debug!(%a, %b, weight = ?w, "protected pair, edge removed");
                    graph.remove_edge(a, b);
                    discarded += 1;
                    continue;
                }
            }

            let Some(survivor) = self.contract((a, b), graph) else {
                debug_assert!(false, "queued edge ({a}, {b}) names an invalid node");
                break StopReason::QueueEmpty;
            };
            let absorbed = if survivor == a { b } else { a };
            let target = match min_label {
                Some(_) => equivalences.representative(survivor.index()),
                None => survivor.index(),
            };
            equivalences.set(absorbed.index(), target);
            regions -= 1;
            merges += 1;
            debug!(%survivor, %absorbed, weight = ?w, regions, "regions merged");
        };

        equivalences.resolve();
        info!(
            mode = ?self.params.mode,
            merges,
            discarded,
            regions,
            stop = %stop,
            "merge run finished"
        );
        equivalences
    }
}
