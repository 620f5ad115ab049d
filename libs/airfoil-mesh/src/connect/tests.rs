//! # Connection Tests

use super::spatial_index::VertexIndex;
use super::*;
use approx::assert_relative_eq;

/// Unit lattice with i along +y and j along +x, so cells wind counter-clockwise.
fn patch(name: &str, origin: DVec2, ni: usize, nj: usize) -> StructuredBlock {
    let mut nodes = Vec::with_capacity(ni * nj);
    for j in 0..nj {
        for i in 0..ni {
            nodes.push(origin + DVec2::new(j as f64, i as f64));
        }
    }
    StructuredBlock::from_nodes(name, ni, nodes).unwrap()
}

// =============================================================================
// SPATIAL INDEX
// =============================================================================

#[test]
fn test_index_finds_neighbours_across_cells() {
    let points = [
        DVec2::new(0.0, 0.0),
        DVec2::new(0.9e-6, 0.0),
        DVec2::new(-0.5e-6, 0.5e-6),
        DVec2::new(5e-6, 0.0),
    ];
    let index = VertexIndex::new(&points, 1e-6);
    assert!(index.cell_count() >= 3);
    assert_eq!(index.query_radius(points[0], 1e-6), vec![0, 1, 2]);
    assert_eq!(index.query_radius(points[3], 1e-6), vec![3]);
}

// =============================================================================
// ASSEMBLY
// =============================================================================

#[test]
fn test_shared_edge_merges() {
    let a = patch("a", DVec2::ZERO, 3, 2);
    let b = patch("b", DVec2::X, 3, 3);
    let mesh = assemble(&[a, b], 1e-6).unwrap();

    // 6 + 9 nodes, 3 shared along x = 1
    assert_eq!(mesh.vertices().len(), 12);
    assert_eq!(mesh.cells().len(), 2 + 4);
    let max = mesh.cells().iter().flatten().copied().max().unwrap();
    assert_eq!(max, mesh.vertices().len() - 1);

    // Shared nodes resolve to the first block's vertices
    for i in 0..3 {
        assert_eq!(mesh.vertex_index(1, i, 0), mesh.vertex_index(0, i, 1));
    }
}

#[test]
fn test_cells_keep_counter_clockwise_winding() {
    let mesh = assemble(&[patch("a", DVec2::ZERO, 3, 3)], 1e-6).unwrap();
    for c in 0..mesh.cells().len() {
        assert_relative_eq!(mesh.cell_area(c), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_min_index_wins_and_order_is_kept() {
    // Second block shares the edge at x = 1, one node slightly perturbed
    let a = patch("a", DVec2::ZERO, 2, 2);
    let mut b = patch("b", DVec2::X, 2, 2);
    b.set_node(0, 0, DVec2::new(1.0 + 4e-7, 0.0));
    let mesh = assemble(&[a, b], 1e-6).unwrap();

    assert_eq!(mesh.vertices().len(), 6);
    // Canonical vertex keeps the lower-index position
    let shared = mesh.vertex_index(1, 0, 0).unwrap();
    assert_eq!(mesh.vertices()[shared], DVec2::new(1.0, 0.0));
    // Survivors keep their concatenation order
    let xs: Vec<f64> = mesh.vertices().iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0]);
}

#[test]
fn test_unreferenced_nodes_are_dropped() {
    let lone = StructuredBlock::from_line("line", &[DVec2::new(9.0, 9.0), DVec2::new(9.0, 10.0)])
        .unwrap();
    let mesh = assemble(&[patch("a", DVec2::ZERO, 2, 2), lone], 1e-6).unwrap();
    assert_eq!(mesh.vertices().len(), 4);
    assert_eq!(mesh.vertex_index(1, 0, 0), None);
    assert_eq!(mesh.vertex_index(0, 5, 0), None);
    assert_eq!(mesh.vertex_index(7, 0, 0), None);
}

#[test]
fn test_collapsed_cell_is_ambiguous() {
    let mut block = patch("a", DVec2::ZERO, 2, 2);
    block.set_node(1, 1, DVec2::new(1e-7, 0.0));
    block.set_node(0, 1, DVec2::new(1e-7, 1e-7));
    let err = assemble(&[block], 1e-6).unwrap_err();
    assert!(matches!(err, MeshError::ConnectivityAmbiguity { .. }));
}

#[test]
fn test_non_transitive_merge_is_ambiguous() {
    // 0 -- 1 -- 2 spaced 0.8 radius apart: 1 touches both, 0 and 2 do not touch
    let a = patch("a", DVec2::ZERO, 2, 2);
    let b = patch("b", DVec2::new(1.0 + 0.8e-6, 0.0), 2, 2);
    let c = patch("c", DVec2::new(1.0 + 1.6e-6, 0.0), 2, 2);
    let err = assemble(&[a, b, c], 1e-6).unwrap_err();
    assert!(matches!(err, MeshError::ConnectivityAmbiguity { .. }));
}

#[test]
fn test_invalid_radius_and_empty_input() {
    let block = patch("a", DVec2::ZERO, 2, 2);
    assert!(matches!(
        assemble(std::slice::from_ref(&block), 0.0),
        Err(MeshError::InvalidParameter { .. })
    ));
    assert!(matches!(
        assemble(&[], 1e-6),
        Err(MeshError::InvalidParameter { .. })
    ));
}

#[test]
fn test_map_nodes_follows_block_line() {
    let mesh = assemble(&[patch("a", DVec2::ZERO, 3, 2)], 1e-6).unwrap();
    let line = mesh.map_nodes(0, (0..3).map(|i| (i, 1))).unwrap();
    assert_eq!(line, vec![3, 4, 5]);
    assert!(mesh.map_nodes(0, [(0, 2)]).is_none());
}

// =============================================================================
// BOUNDARY AND QUALITY
// =============================================================================

#[test]
fn test_boundary_edges_of_two_blocks() {
    let mesh = assemble(
        &[patch("a", DVec2::ZERO, 3, 2), patch("b", DVec2::X, 3, 2)],
        1e-6,
    )
    .unwrap();
    // 2 x 2 cells: perimeter of 8 unit edges
    let edges = mesh.boundary_edges();
    assert_eq!(edges.len(), 8);
    let interior = [mesh.vertex_index(0, 1, 1).unwrap(), mesh.vertex_index(1, 1, 0).unwrap()];
    assert_eq!(interior[0], interior[1]);
    assert!(edges.iter().all(|e| !e.contains(&interior[0])));
}

#[test]
fn test_quality_of_unit_lattice() {
    let mesh = assemble(&[patch("a", DVec2::ZERO, 3, 3)], 1e-6).unwrap();
    let quality = MeshQuality::evaluate(&mesh);
    assert_eq!(quality.cells, 4);
    assert!(quality.is_valid());
    assert_relative_eq!(quality.min_area, 1.0, epsilon = 1e-12);
    assert_relative_eq!(quality.max_aspect_ratio, 1.0, epsilon = 1e-12);
    assert!(quality.max_angle_deviation < 1e-6);
}

#[test]
fn test_quality_detects_fold() {
    let mut block = patch("a", DVec2::ZERO, 3, 3);
    // Push the centre node past its neighbours
    block.set_node(1, 1, DVec2::new(2.5, 1.0));
    let mesh = assemble(&[block], 1e-6).unwrap();
    let quality = MeshQuality::evaluate(&mesh);
    // Both cells past the node are bow-ties with a positive total area
    assert!((0..mesh.cells().len()).all(|c| mesh.cell_area(c) > 0.0));
    assert_eq!(quality.folded_cells, 2);
    assert!(!quality.is_valid());
}
