//! End-to-end tests for JSON persistence.
//!
//! Build a region graph, write it out, read it back, and check that the
//! restored graph merges exactly like the original.

use adjgraph::{
    export_json, import_json, AdjacencyGraph, Asymmetric, Error, GrayMeans, GrayMeansGraph,
    GraphRecord, Matrix, MergeMode, MergeParams, NodeId, RegionGraphBuilder, RegionMerger,
    ScalarMeanDistance, Symmetric,
};
use pretty_assertions::assert_eq;

type Gray = GrayMeansGraph<ScalarMeanDistance>;

// ============================================================================
// Helper: gray region graph over a 3x4 label image
// ============================================================================

fn region_graph() -> Gray {
    let labels = Matrix::from_rows(vec![
        vec![0, 0, 1, 1],
        vec![2, 2, 1, 3],
        vec![2, 4, 4, 3],
    ])
    .unwrap();
    let gray = Matrix::from_rows(vec![
        vec![10.0, 10.0, 20.0, 20.0],
        vec![30.0, 30.0, 20.0, 80.0],
        vec![30.0, 70.0, 70.0, 80.0],
    ])
    .unwrap();

    let mut graph = Gray::new(ScalarMeanDistance);
    RegionGraphBuilder::new(GrayMeans::new(gray))
        .generate(&labels, 0, &mut graph)
        .unwrap();
    graph
}

fn round_trip(graph: &Gray) -> Gray {
    let mut buf = Vec::new();
    export_json(graph, &mut buf).unwrap();
    import_json(buf.as_slice(), ScalarMeanDistance).unwrap()
}

// ============================================================================
// 1. Structure survives
// ============================================================================

#[test]
fn test_region_graph_round_trip() {
    let graph = region_graph();
    let restored = round_trip(&graph);

    assert_eq!(restored.to_record(), graph.to_record());
    assert_eq!(restored.size(), graph.size());
    assert_eq!(restored.edge_count(), graph.edge_count());
    assert_eq!(restored.lowest_weight_edge(), graph.lowest_weight_edge());
    assert_eq!(restored.neighbors(NodeId(1)), vec![NodeId(0), NodeId(2), NodeId(3), NodeId(4)]);
    assert!(restored.check_consistency());
}

// ============================================================================
// 2. Restored graph merges identically
// ============================================================================

#[test]
fn test_restored_graph_merges_identically() {
    let merger = RegionMerger::new(MergeParams {
        mode: MergeMode::Optimal,
        threshold: 15.0,
        min_region_number: 1,
    });

    let mut original = region_graph();
    let mut restored = round_trip(&original);

    let a = merger.merge_default(&mut original);
    let b = merger.merge_default(&mut restored);
    assert_eq!(a, b);
    assert_eq!(restored.to_record(), original.to_record());
}

// ============================================================================
// 3. Partially merged graphs keep their holes
// ============================================================================

#[test]
fn test_holes_survive_round_trip() {
    let mut graph = region_graph();
    graph.merge_nodes(NodeId(3), NodeId(4));
    graph.merge_nodes(NodeId(0), NodeId(2));

    let restored = round_trip(&graph);
    assert!(!restored.is_node_id_valid(NodeId(2)));
    assert!(!restored.is_node_id_valid(NodeId(4)));
    assert_eq!(restored.last_valid_id(), Some(NodeId(3)));
    assert_eq!(restored.node_data(NodeId(3)), graph.node_data(NodeId(3)));
    assert_eq!(restored.edge_data(NodeId(3), NodeId(1)), graph.edge_data(NodeId(3), NodeId(1)));

    // freed ids are reused after a restore as well
    let mut restored = restored;
    let id = restored.insert_node(Default::default());
    assert!(id == NodeId(2) || id == NodeId(4));
}

// ============================================================================
// 4. Record handling
// ============================================================================

#[test]
fn test_symmetry_must_match() {
    let record = region_graph().to_record();
    let json = serde_json::to_string(&record).unwrap();

    type AsymGray = AdjacencyGraph<adjgraph::MeansNode<f32>, f32, u32, ScalarMeanDistance, Asymmetric>;
    let result: Result<AsymGray, Error> = import_json(json.as_bytes(), ScalarMeanDistance);
    assert!(matches!(result, Err(Error::InvalidRecord(_))));
}

#[test]
fn test_hand_written_record() {
    let json = r#"{
        "size": 3,
        "nodes": [
            {"id": 0, "data": {"sum": 4.0, "n": 2}},
            {"id": 2, "data": {"sum": 9.0, "n": 1}}
        ],
        "symmetric": true,
        "edges": [{"source": 2, "target": 0, "data": 5}]
    }"#;
    let record: GraphRecord<adjgraph::MeansNode<f32>, f32, u32> = serde_json::from_str(json).unwrap();
    let graph: AdjacencyGraph<_, f32, u32, _, Symmetric> =
        AdjacencyGraph::from_record(record, ScalarMeanDistance).unwrap();

    assert_eq!(graph.size(), 2);
    assert_eq!(graph.edge_weight(NodeId(0), NodeId(2)), Some(7.0));
    assert_eq!(graph.edge_data(NodeId(0), NodeId(2)), Some(&5));
}
