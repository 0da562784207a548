//! # adjgraph: Weighted Region Adjacency Graphs
//!
//! A weighted graph that stays cheap to query under node contraction, and a
//! greedy region-merging pipeline built on it.
//!
//! ## Design Principles
//!
//! 1. **Dense ids**: a node id is a slot index; in a region graph it is the label
//! 2. **One record per edge**: both directions share a record, so the reverse
//!    of an edge is never looked up separately
//! 3. **Always-ready minimum**: every weighted direction sits in an indexed
//!    min-queue, `lowest_weight_edge` is a peek
//! 4. **Advisory mutation**: invalid ids and duplicate edges give `false`/`None`,
//!    pipeline steps give [`Result`]
//!
//! ## Quick Start
//!
//! ```rust
//! use adjgraph::{
//!     GrayMeans, GrayMeansGraph, Matrix, MergeMode, MergeParams, RegionGraphBuilder,
//!     RegionMerger, ScalarMeanDistance, reassign_labels,
//! };
//!
//! # fn main() -> adjgraph::Result<()> {
//! let labels = Matrix::from_rows(vec![vec![0, 1, 2], vec![0, 1, 2]])?;
//! let gray = Matrix::from_rows(vec![vec![10.0, 11.0, 50.0], vec![10.0, 11.0, 50.0]])?;
//!
//! let mut graph = GrayMeansGraph::<ScalarMeanDistance>::new(ScalarMeanDistance);
//! RegionGraphBuilder::new(GrayMeans::new(gray)).generate(&labels, 0, &mut graph)?;
//!
//! let merger = RegionMerger::new(MergeParams { mode: MergeMode::Optimal, threshold: 5.0, min_region_number: 1 });
//! let equivalences = merger.merge_default(&mut graph);
//! let merged = reassign_labels(&equivalences, &labels, true)?;
//! assert_eq!(merged.row(0), &[0, 0, 1]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`model`] | ids, datum/weight contracts, matrices, region statistics |
//! | [`index`] | indexed min-queue with stable handles |
//! | [`graph`] | the adjacency graph engine |
//! | [`region`] | graph builder, merge driver, label equivalences |
//! | [`export`] | JSON persistence |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod index;
pub mod graph;
pub mod region;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    NodeId, NodePair, NodeHandle,
    Accumulate, Datum, Weight, WeightFn, VoidWeight,
    EdgeSymmetry, Symmetric, Asymmetric,
    Matrix, Pixel, MeansNode, MeanValue, Rgb,
    ScalarMeanDistance, ScalarHarisDistance, ColorMeanDistance, ColorHarisDistance,
};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use index::{IndexedMinQueue, QueueHandle};
pub use graph::{AdjacencyGraph, EdgeView};

// ============================================================================
// Re-exports: Region merging
// ============================================================================

pub use region::{
    RegionGraphBuilder, RegionHooks, BoundaryCount, GrayMeans, ColorMeans,
    BoundaryGraph, GrayMeansGraph, ColorMeansGraph,
    RegionMerger, MergeParams, MergeMode, Equivalences,
    reassign_labels, reassign_labels_with_sizes, affinity_matrix,
};

pub use export::{GraphRecord, NodeRecord, EdgeRecord, export_json, import_json};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Labeled mask was empty")]
    EmptyLabels,

    #[error("Size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Label {label} outside equivalence table of length {len}")]
    LabelOutOfRange { label: usize, len: usize },

    #[error("Internal data check failed: {0}")]
    InternalDataCheck(String),

    #[error("Edge and node data preparation failed: {0}")]
    PrepareFailed(String),

    #[error("Invalid graph record: {0}")]
    InvalidRecord(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
