//! # Mesh Quality
//!
//! Cell-level diagnostics of a connected mesh.

use super::GlobalMesh;
use airfoil_contour::geometry::{angle_between, corner_areas};
use serde::Serialize;

/// Summary statistics over all cells.
///
/// Folded cells are those whose signed area has the opposite sign to the
/// mesh's total signed area (or is zero).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshQuality {
    /// Number of cells evaluated
    pub cells: usize,
    /// Smallest absolute cell area
    pub min_area: f64,
    /// Largest absolute cell area
    pub max_area: f64,
    /// Cells with a corner of flipped or zero orientation
    pub folded_cells: usize,
    /// Largest longest-edge / shortest-edge ratio
    pub max_aspect_ratio: f64,
    /// Largest deviation of a corner angle from 90 degrees
    pub max_angle_deviation: f64,
}

impl MeshQuality {
    /// Evaluates every cell of `mesh`.
    pub fn evaluate(mesh: &GlobalMesh) -> Self {
        let areas: Vec<f64> = (0..mesh.cells().len()).map(|c| mesh.cell_area(c)).collect();
        let orientation = areas.iter().sum::<f64>().signum();

        let mut quality = Self {
            cells: areas.len(),
            min_area: f64::INFINITY,
            max_area: 0.0,
            folded_cells: 0,
            max_aspect_ratio: 1.0,
            max_angle_deviation: 0.0,
        };

        for (cell, area) in mesh.cells().iter().zip(&areas) {
            quality.min_area = quality.min_area.min(area.abs());
            quality.max_area = quality.max_area.max(area.abs());

            let p = cell.map(|k| mesh.vertices()[k]);
            // A bow-tie keeps a positive total area; its corners do not
            if corner_areas(&p).iter().any(|a| a * orientation <= 0.0) {
                quality.folded_cells += 1;
            }
            let edges = [0, 1, 2, 3].map(|c| p[c].distance(p[(c + 1) % 4]));
            let longest = edges.iter().copied().fold(0.0, f64::max);
            let shortest = edges.iter().copied().fold(f64::INFINITY, f64::min);
            let aspect = if shortest > 0.0 { longest / shortest } else { f64::INFINITY };
            quality.max_aspect_ratio = quality.max_aspect_ratio.max(aspect);

            for c in 0..4 {
                let corner = angle_between(p[(c + 1) % 4] - p[c], p[(c + 3) % 4] - p[c])
                    .map_or(90.0, |angle| (angle - 90.0).abs());
                quality.max_angle_deviation = quality.max_angle_deviation.max(corner);
            }
        }

        if quality.cells == 0 {
            quality.min_area = 0.0;
        }
        quality
    }

    /// True when no cell is folded.
    pub fn is_valid(&self) -> bool {
        self.folded_cells == 0
    }
}
