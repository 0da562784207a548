//! # Region Merging
//!
//! Turns an over-segmented label image into coarser regions:
//!
//! 1. [`RegionGraphBuilder::generate`] builds an [`AdjacencyGraph`](crate::graph::AdjacencyGraph)
//!    with one node per label and one edge per pair of touching labels.
//! 2. [`RegionMerger::merge`] contracts the cheapest edges and records who
//!    absorbed whom in an [`Equivalences`] table.
//! 3. [`reassign_labels`] applies the table to the original labels.

pub mod builder;
pub mod hooks;
pub mod labels;
pub mod merge;

pub use builder::{RegionGraphBuilder, RegionHooks};
pub use hooks::{BoundaryCount, BoundaryGraph, ColorMeans, ColorMeansGraph, GrayMeans, GrayMeansGraph};
pub use labels::{affinity_matrix, reassign_labels, reassign_labels_with_sizes, Equivalences};
pub use merge::{MergeMode, MergeParams, RegionMerger};
