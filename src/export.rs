//! JSON persistence of adjacency graphs.
//!
//! A graph is written as a [`GraphRecord`]: the id range, the valid nodes
//! with their data, the symmetry flag, and one edge record per queued
//! direction (symmetric graphs list only the half with `target < source`).
//!
//! ```text
//! AdjacencyGraph → to_record() → GraphRecord → serde_json → text
//! text → serde_json → GraphRecord → from_record(weight_fn) → AdjacencyGraph
//! ```
//!
//! The weight function itself is not persisted; the reader supplies it.
//! Edge records without a weight are re-weighted through it on import.

use std::io::{Read, Write};

use hashbrown::HashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::AdjacencyGraph;
use crate::model::{Datum, EdgeSymmetry, NodeId, Weight, WeightFn};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord<N> {
    pub id: NodeId,
    pub data: N,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord<W, D> {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<W>,
    pub data: D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord<N, W, D> {
    /// Ids run from `0` to `size - 1`; ids missing from `nodes` are free.
    pub size: usize,
    pub nodes: Vec<NodeRecord<N>>,
    pub symmetric: bool,
    pub edges: Vec<EdgeRecord<W, D>>,
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidRecord(msg.into())
}

impl<N, W, D, F, S> AdjacencyGraph<N, W, D, F, S>
where
    N: Datum,
    W: Weight,
    D: Datum,
    F: WeightFn<N, D, W>,
    S: EdgeSymmetry,
{
    /// Snapshot of the graph. Edges are sorted by `(source, target)`.
    pub fn to_record(&self) -> GraphRecord<N, W, D> {
        let nodes = self
            .nodes()
            .map(|(id, data)| NodeRecord { id, data: data.clone() })
            .collect();
        let mut edges: Vec<EdgeRecord<W, D>> = self
            .edge_list()
            .into_iter()
            .map(|v| EdgeRecord {
                source: v.source,
                target: v.target,
                weight: v.weight,
                data: v.data.clone(),
            })
            .collect();
        edges.sort_by_key(|e| (e.source, e.target));

        GraphRecord {
            size: self.last_valid_id().map_or(0, |id| id.index() + 1),
            nodes,
            symmetric: S::SYMMETRIC,
            edges,
        }
    }

    /// Rebuild a graph from `record`, weighting it with `weight_fn`.
    ///
    /// Rejects records whose symmetry flag disagrees with `S`, a `size` other
    /// than the largest listed id plus one, duplicate nodes or edges, self
    /// edges and edges touching a node that is not listed.
    pub fn from_record(record: GraphRecord<N, W, D>, weight_fn: F) -> Result<Self> {
        if record.symmetric != S::SYMMETRIC {
            return Err(invalid(format!(
                "record symmetric = {}, graph symmetric = {}",
                record.symmetric,
                S::SYMMETRIC
            )));
        }

        let size = record.size;
        let expected = match record.nodes.iter().map(|n| n.id.index()).max() {
            Some(last) => last.checked_add(1),
            None => Some(0),
        };
        if expected != Some(size) {
            return Err(invalid(format!(
                "size {size} does not match the listed nodes (expected {})",
                expected.map_or_else(|| "overflow".to_string(), |e| e.to_string())
            )));
        }

        let mut graph = Self::with_nodes(size, N::default(), weight_fn);
        let mut listed = vec![false; size];
        for node in record.nodes {
            let i = node.id.index();
            match listed.get_mut(i) {
                Some(seen) if !*seen => *seen = true,
                Some(_) => return Err(invalid(format!("node {} listed twice", node.id))),
                None => return Err(invalid(format!("node {} outside size {size}", node.id))),
            }
            graph.set_node_data(node.id, node.data);
        }
        for (i, _) in listed.iter().enumerate().filter(|(_, seen)| !**seen) {
            graph.remove_node(NodeId(i));
        }

        let edge_count = record.edges.len();
        let mut seen = HashSet::with_capacity(edge_count);
        for edge in record.edges {
            let (s, t) = (edge.source, edge.target);
            if S::SYMMETRIC && t >= s {
                return Err(invalid(format!("symmetric edge ({s}, {t}) must have target < source")));
            }
            if !seen.insert((s, t)) {
                return Err(invalid(format!("edge ({s}, {t}) listed twice")));
            }
            let Some(data) = graph.force_edge(s, t) else {
                return Err(invalid(format!("edge ({s}, {t}) does not join two valid nodes")));
            };
            *data = edge.data.clone();
            if S::SYMMETRIC {
                graph.set_edge_data(s, t, edge.data);
            }
            match edge.weight {
                Some(w) => graph.set_edge_weight(s, t, w),
                None => graph.update_edge_weight(s, t),
            };
        }

        debug!(size, nodes = graph.size(), edges = edge_count, "graph record loaded");
        Ok(graph)
    }
}

/// Write `graph` as pretty-printed JSON followed by a newline.
pub fn export_json<N, W, D, F, S>(
    graph: &AdjacencyGraph<N, W, D, F, S>,
    writer: &mut dyn Write,
) -> Result<()>
where
    N: Datum + Serialize,
    W: Weight + Serialize,
    D: Datum + Serialize,
    F: WeightFn<N, D, W>,
    S: EdgeSymmetry,
{
    serde_json::to_writer_pretty(&mut *writer, &graph.to_record())?;
    writeln!(writer)?;
    Ok(())
}

/// Read a graph written by [`export_json`].
pub fn import_json<N, W, D, F, S, R>(reader: R, weight_fn: F) -> Result<AdjacencyGraph<N, W, D, F, S>>
where
    N: Datum + DeserializeOwned,
    W: Weight + DeserializeOwned,
    D: Datum + DeserializeOwned,
    F: WeightFn<N, D, W>,
    S: EdgeSymmetry,
    R: Read,
{
    let record: GraphRecord<N, W, D> = serde_json::from_reader(reader)?;
    AdjacencyGraph::from_record(record, weight_fn)
}
