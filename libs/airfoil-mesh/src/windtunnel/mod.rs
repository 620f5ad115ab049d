//! # Wind Tunnel
//!
//! The four-block C-type mesh around an airfoil: boundary layer, blunt
//! trailing edge, far-field tunnel and wake.
//!
//! ## Build Order
//!
//! ```text
//! contour → airfoil → trailing_edge → tunnel → smoothing → wake
//! ```
//!
//! Smoothing moves only interior tunnel nodes, so the wake still matches
//! the tunnel's side lines.

pub mod builders;

pub use builders::{airfoil_block, trailing_edge_block, tunnel_block, wake_block};

use crate::block::StructuredBlock;
use crate::connect::{assemble, GlobalMesh};
use crate::error::{MeshError, MeshResult};
use crate::settings::MeshSettings;
use crate::smooth::smooth;
use glam::DVec2;
use serde::Serialize;
use tracing::info;

// Block positions in `Windtunnel::blocks` and in the connected mesh
const AIRFOIL: usize = 0;
const TRAILING_EDGE: usize = 1;
const TUNNEL: usize = 2;
const WAKE: usize = 3;

/// Boundary edges of the connected mesh, as merged vertex pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundaryMarkers {
    /// Airfoil surface, including a blunt trailing edge
    pub airfoil: Vec<[usize; 2]>,
    /// Outer tunnel boundary, wake outflow and wake sides
    pub farfield: Vec<[usize; 2]>,
}

impl BoundaryMarkers {
    /// Markers as `(name, edges)` pairs, airfoil first.
    pub fn named(&self) -> [(&'static str, &[[usize; 2]]); 2] {
        [
            ("airfoil", self.airfoil.as_slice()),
            ("farfield", self.farfield.as_slice()),
        ]
    }
}

/// The blocks of a C-type airfoil mesh.
#[derive(Debug, Clone)]
pub struct Windtunnel {
    blocks: [StructuredBlock; 4],
    gap_segments: usize,
}

impl Windtunnel {
    /// Builds all blocks around a refined contour and smooths the tunnel.
    ///
    /// The contour must be counter-clockwise from the upper trailing edge,
    /// as produced by the contour crate.
    ///
    /// # Errors
    ///
    /// Propagates block construction and parameter errors. Smoothing that
    /// stops at its iteration cap is not an error.
    pub fn build(contour: &[DVec2], settings: &MeshSettings) -> MeshResult<Self> {
        let airfoil = airfoil_block(contour, &settings.airfoil)?;
        let (trailing_edge, gap_segments) = trailing_edge_block(&airfoil, &settings.trailing_edge)?;
        let mut tunnel = tunnel_block(&airfoil, &trailing_edge, &settings.tunnel)?;

        for stage in &settings.smoothing {
            let report = smooth(&tunnel, stage.smoother, &stage.selection, &stage.params)?;
            tunnel = report.block;
        }

        let wake = wake_block(&tunnel, &trailing_edge, &settings.wake)?;

        let windtunnel = Self {
            blocks: [airfoil, trailing_edge, tunnel, wake],
            gap_segments,
        };
        info!(
            nodes = windtunnel.blocks.iter().map(|b| b.nodes().len()).sum::<usize>(),
            cells = windtunnel.blocks.iter().map(StructuredBlock::cell_count).sum::<usize>(),
            "windtunnel built"
        );
        Ok(windtunnel)
    }

    /// Blocks in connection order: airfoil, trailing edge, tunnel, wake.
    pub fn blocks(&self) -> &[StructuredBlock] {
        &self.blocks
    }

    /// Boundary-layer block.
    pub fn airfoil(&self) -> &StructuredBlock {
        &self.blocks[AIRFOIL]
    }

    /// Trailing-edge block.
    pub fn trailing_edge(&self) -> &StructuredBlock {
        &self.blocks[TRAILING_EDGE]
    }

    /// Far-field block.
    pub fn tunnel(&self) -> &StructuredBlock {
        &self.blocks[TUNNEL]
    }

    /// Wake block.
    pub fn wake(&self) -> &StructuredBlock {
        &self.blocks[WAKE]
    }

    /// Cells across the blunt trailing edge (0 when sharp).
    pub fn gap_segments(&self) -> usize {
        self.gap_segments
    }

    /// Merges the blocks into one mesh.
    pub fn connect(&self, radius: f64) -> MeshResult<GlobalMesh> {
        assemble(&self.blocks, radius)
    }

    /// Airfoil and farfield edges of a mesh built by [`Windtunnel::connect`].
    ///
    /// # Errors
    ///
    /// `ConnectivityAmbiguity` if a boundary node is missing from `mesh`.
    pub fn boundary_markers(&self, mesh: &GlobalMesh) -> MeshResult<BoundaryMarkers> {
        let airfoil = self.airfoil();
        let tunnel = self.tunnel();
        let wake = self.wake();

        let mut markers = BoundaryMarkers::default();

        let surface = (0..airfoil.line_len()).map(|i| (i, 0));
        markers.airfoil.extend(edges(mesh, AIRFOIL, surface)?);
        if self.gap_segments > 0 {
            // Gap starts where the reversed lower V-line ends
            let start = airfoil.line_count() - 1;
            let gap = (start..=start + self.gap_segments).map(|i| (i, 0));
            markers.airfoil.extend(edges(mesh, TRAILING_EDGE, gap)?);
        }

        let outer = tunnel.line_count() - 1;
        markers
            .farfield
            .extend(edges(mesh, TUNNEL, (0..tunnel.line_len()).map(|i| (i, outer)))?);
        let outflow = wake.line_count() - 1;
        markers
            .farfield
            .extend(edges(mesh, WAKE, (0..wake.line_len()).map(|i| (i, outflow)))?);
        markers
            .farfield
            .extend(edges(mesh, WAKE, (0..wake.line_count()).map(|j| (0, j)))?);
        let top = wake.line_len() - 1;
        markers
            .farfield
            .extend(edges(mesh, WAKE, (0..wake.line_count()).map(|j| (top, j)))?);

        Ok(markers)
    }
}

/// Consecutive vertex pairs along a polyline of block nodes.
fn edges(
    mesh: &GlobalMesh,
    block: usize,
    nodes: impl IntoIterator<Item = (usize, usize)>,
) -> MeshResult<Vec<[usize; 2]>> {
    let vertices = mesh.map_nodes(block, nodes).ok_or_else(|| {
        MeshError::ambiguity(format!(
            "boundary of block {block} is not part of the connected mesh"
        ))
    })?;
    Ok(vertices
        .windows(2)
        .filter(|pair| pair[0] != pair[1])
        .map(|pair| [pair[0], pair[1]])
        .collect())
}
