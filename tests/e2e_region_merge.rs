//! End-to-end tests for the region merging pipeline.
//!
//! Each test runs: labels -> RegionGraphBuilder -> RegionMerger -> reassign_labels.

use adjgraph::{
    affinity_matrix, reassign_labels, reassign_labels_with_sizes, BoundaryCount, BoundaryGraph,
    ColorMeanDistance, ColorMeans, ColorMeansGraph, Error, GrayMeans, GrayMeansGraph, Matrix,
    MergeMode, MergeParams, NodeId, RegionGraphBuilder, RegionMerger, ScalarMeanDistance,
    VoidWeight,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helper: a 4x4 image split into four 2x2 quadrants.
//
//   0 0 1 1      gray 10 | 12
//   0 0 1 1           ---+---
//   2 2 3 3          50 | 53
//   2 2 3 3
// ============================================================================

fn quadrant_labels() -> Matrix<usize> {
    Matrix::from_rows(vec![
        vec![0, 0, 1, 1],
        vec![0, 0, 1, 1],
        vec![2, 2, 3, 3],
        vec![2, 2, 3, 3],
    ])
    .unwrap()
}

fn quadrant_gray() -> Matrix<f32> {
    Matrix::from_rows(vec![
        vec![10.0, 10.0, 12.0, 12.0],
        vec![10.0, 10.0, 12.0, 12.0],
        vec![50.0, 50.0, 53.0, 53.0],
        vec![50.0, 50.0, 53.0, 53.0],
    ])
    .unwrap()
}

fn gray_graph() -> GrayMeansGraph<ScalarMeanDistance> {
    let mut graph = GrayMeansGraph::<ScalarMeanDistance>::new(ScalarMeanDistance);
    RegionGraphBuilder::new(GrayMeans::new(quadrant_gray()))
        .generate(&quadrant_labels(), 0, &mut graph)
        .unwrap();
    graph
}

fn optimal(threshold: f32) -> RegionMerger<f32> {
    RegionMerger::new(MergeParams {
        mode: MergeMode::Optimal,
        threshold,
        min_region_number: 1,
    })
}

// ============================================================================
// 1. Builder output: one node per label, 4-adjacency only
// ============================================================================

#[test]
fn test_quadrant_graph_shape() {
    let graph = gray_graph();

    assert_eq!(graph.size(), 4);
    assert_eq!(graph.edge_count(), 4);
    assert!(!graph.has_edge(NodeId(0), NodeId(3)));
    assert!(!graph.has_edge(NodeId(1), NodeId(2)));
    assert_eq!(graph.edge_data(NodeId(0), NodeId(1)), Some(&2));
    assert_eq!(graph.edge_data(NodeId(1), NodeId(0)), Some(&2));
    assert_eq!(graph.edge_weight(NodeId(0), NodeId(1)), Some(2.0));
    assert_eq!(graph.edge_weight(NodeId(3), NodeId(2)), Some(3.0));
    assert_eq!(graph.lowest_weight_edge(), Some(((NodeId(1), NodeId(0)), 2.0)));
    assert_eq!(graph.node_data(NodeId(2)).map(|n| n.mean()), Some(50.0));
    assert!(graph.check_consistency());
}

// ============================================================================
// 2. Optimal merge below a threshold
// ============================================================================

#[test]
fn test_gray_pipeline_merges_similar_quadrants() {
    let mut graph = gray_graph();
    let equivalences = optimal(5.0).merge_default(&mut graph);

    assert_eq!(equivalences.as_slice(), &[0, 0, 2, 2]);
    assert_eq!(graph.size(), 2);
    assert_eq!(graph.node_data(NodeId(0)).map(|n| (n.size(), n.mean())), Some((8, 11.0)));
    assert_eq!(graph.node_data(NodeId(2)).map(|n| (n.size(), n.mean())), Some((8, 51.5)));
    // boundaries 0|2 and 1|3 are now one edge
    assert_eq!(graph.edge_data(NodeId(2), NodeId(0)), Some(&4));
    assert_eq!(graph.edge_weight(NodeId(0), NodeId(2)), Some(40.5));

    let (merged, sizes) = reassign_labels_with_sizes(&equivalences, &quadrant_labels(), true).unwrap();
    assert_eq!(merged.row(0), &[0, 0, 0, 0]);
    assert_eq!(merged.row(3), &[1, 1, 1, 1]);
    assert_eq!(sizes, vec![8, 8]);

    let sparse = reassign_labels(&equivalences, &quadrant_labels(), false).unwrap();
    assert_eq!(sparse.row(2), &[2, 2, 2, 2]);
}

#[test]
fn test_high_threshold_collapses_everything() {
    let mut graph = gray_graph();
    let equivalences = optimal(1000.0).merge_default(&mut graph);

    assert_eq!(equivalences.as_slice(), &[0, 0, 0, 0]);
    assert_eq!(graph.size(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.lowest_weight_edge().is_none());
}

// ============================================================================
// 3. Protected labels
// ============================================================================

#[test]
fn test_protected_labels_stay_apart() {
    let mut graph = gray_graph();
    let equivalences = optimal(100.0).merge_protected_default(2, &mut graph);

    // 0 and 1 never join; 3 goes into 2, then 2 into 1
    assert_eq!(equivalences.as_slice(), &[0, 1, 1, 1]);
    assert_eq!(graph.size(), 2);
    assert_eq!(graph.edge_count(), 0);
    assert!(equivalences.is_resolved());
}

#[test]
fn test_builder_skips_pairs_below_min_label() {
    let mut graph = BoundaryGraph::<VoidWeight>::new(VoidWeight);
    RegionGraphBuilder::new(BoundaryCount)
        .generate(&quadrant_labels(), 2, &mut graph)
        .unwrap();

    assert!(!graph.has_edge(NodeId(0), NodeId(1)));
    assert!(graph.has_edge(NodeId(0), NodeId(2)));
    assert!(graph.has_edge(NodeId(3), NodeId(2)));
    assert_eq!(graph.node_data(NodeId(1)), Some(&4));
}

// ============================================================================
// 4. Region floor with constant weights
// ============================================================================

#[test]
fn test_region_floor_with_void_weights() {
    let mut graph = BoundaryGraph::<VoidWeight>::new(VoidWeight);
    RegionGraphBuilder::new(BoundaryCount)
        .generate(&quadrant_labels(), 0, &mut graph)
        .unwrap();

    let merger = RegionMerger::new(MergeParams {
        mode: MergeMode::Fast,
        threshold: 0.0,
        min_region_number: 2,
    });
    let equivalences = merger.merge_default(&mut graph);
    let (_, regions) = equivalences.compact();

    assert_eq!(regions, 2);
    assert_eq!(graph.total_adjacent_nodes(), 2);
    assert!(equivalences.is_resolved());
}

// ============================================================================
// 5. Color pipeline
// ============================================================================

#[test]
fn test_color_pipeline() {
    let labels = Matrix::from_rows(vec![vec![0, 1, 2]]).unwrap();
    let red = Matrix::from_rows(vec![vec![200.0, 198.0, 0.0]]).unwrap();
    let green = Matrix::from_rows(vec![vec![0.0, 0.0, 0.0]]).unwrap();
    let blue = Matrix::from_rows(vec![vec![0.0, 0.0, 180.0]]).unwrap();

    let mut graph = ColorMeansGraph::<ColorMeanDistance>::new(ColorMeanDistance);
    RegionGraphBuilder::new(ColorMeans::from_channels(&red, &green, &blue).unwrap())
        .generate(&labels, 0, &mut graph)
        .unwrap();
    assert_eq!(graph.edge_weight(NodeId(0), NodeId(1)), Some(2.0));

    let equivalences = optimal(10.0).merge_default(&mut graph);
    assert_eq!(equivalences.as_slice(), &[0, 0, 2]);
    assert_eq!(graph.node_data(NodeId(0)).map(|n| n.mean().r), Some(199.0));
}

// ============================================================================
// 6. Affinity matrix and failures
// ============================================================================

#[test]
fn test_affinity_matrix_of_region_graph() {
    let graph = gray_graph();
    let affinity = affinity_matrix(&graph, f32::INFINITY);

    assert_eq!(affinity.size(), (4, 4));
    assert_eq!(affinity[(0, 2)], 40.0);
    assert_eq!(affinity[(2, 0)], 40.0);
    assert_eq!(affinity[(0, 3)], f32::INFINITY);
    assert_eq!(affinity[(1, 1)], f32::INFINITY);
}

#[test]
fn test_pipeline_failures() {
    let mut graph = GrayMeansGraph::<ScalarMeanDistance>::new(ScalarMeanDistance);
    let small = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
    let err = RegionGraphBuilder::new(GrayMeans::new(small))
        .generate(&quadrant_labels(), 0, &mut graph)
        .unwrap_err();
    assert!(matches!(err, Error::InternalDataCheck(_)));

    let empty: Matrix<usize> = Matrix::from_vec(0, 0, Vec::new()).unwrap();
    let err = RegionGraphBuilder::new(GrayMeans::new(quadrant_gray()))
        .generate(&empty, 0, &mut graph)
        .unwrap_err();
    assert!(matches!(err, Error::EmptyLabels));
}
