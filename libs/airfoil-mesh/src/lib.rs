//! # Airfoil Mesh
//!
//! Structured multi-block C-type meshes around an airfoil contour.
//!
//! ## Architecture
//!
//! ```text
//! airfoil-contour (refined points) → windtunnel (4 blocks) → smooth (tunnel)
//!                                                  ↓
//!                              connect (GlobalMesh) → export (SU2, GMSH, FLMA, VTK)
//! ```
//!
//! ## Blocks
//!
//! - **airfoil**: boundary layer extruded along the contour normals
//! - **trailing_edge**: block behind the trailing edge, gap cells when blunt
//! - **tunnel**: C-shaped far field around both inner blocks
//! - **wake**: downstream block closing the domain
//!
//! ## Usage
//!
//! ```rust,no_run
//! use airfoil_contour::contour::read_contour;
//! use airfoil_contour::Contour;
//! use airfoil_mesh::export::{write_mesh_file, MeshFormat};
//! use airfoil_mesh::{generate_mesh, MeshSettings};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = read_contour(Path::new("naca0012.dat"), "#")?;
//! let contour = Contour::normalized(&raw)?;
//! let output = generate_mesh(&contour, &MeshSettings::default())?;
//! write_mesh_file("naca0012.su2", MeshFormat::Su2, &output.mesh, &output.markers)?;
//! # Ok(())
//! # }
//! ```

pub mod block;
pub mod connect;
pub mod error;
pub mod export;
pub mod settings;
pub mod smooth;
pub mod windtunnel;

pub use block::StructuredBlock;
pub use connect::{assemble, GlobalMesh, MeshQuality};
pub use error::{MeshError, MeshResult};
pub use export::MeshFormat;
pub use settings::MeshSettings;
pub use smooth::{smooth, NodeSelection, SmoothParams, Smoother};
pub use windtunnel::{BoundaryMarkers, Windtunnel};

use airfoil_contour::spline::fit_spline;
use airfoil_contour::spline::refine::{adaptive_refine, refine_trailing_edge};
use airfoil_contour::spline::trailing_edge::apply_thickness;
use airfoil_contour::Contour;
use config::constants::CONTOUR_SPLINE_DEGREE;
use glam::DVec2;
use tracing::info;

/// Everything produced by one run of [`generate_mesh`].
#[derive(Debug, Clone)]
pub struct MeshOutput {
    /// Refined (and optionally thickened) contour the blocks were built on
    pub contour: Vec<DVec2>,
    /// Blocks before connection
    pub windtunnel: Windtunnel,
    /// Connected mesh
    pub mesh: GlobalMesh,
    /// Airfoil and farfield edges of `mesh`
    pub markers: BoundaryMarkers,
    /// Cell quality summary of `mesh`
    pub quality: MeshQuality,
}

/// Runs the whole pipeline on a normalized contour.
///
/// Steps, in order: spline fit, adaptive refinement, optional trailing-edge
/// clustering, optional trailing-edge thickness, block construction with
/// tunnel smoothing, connection and boundary marking.
///
/// # Errors
///
/// Contour errors from fitting and refinement (wrapped in
/// [`MeshError::Contour`]) and any block, smoothing-parameter or
/// connectivity error.
pub fn generate_mesh(contour: &Contour, settings: &MeshSettings) -> MeshResult<MeshOutput> {
    let refine = &settings.refine;
    let (spline, sample) = fit_spline(contour.points(), CONTOUR_SPLINE_DEGREE, refine.points, false)?;
    let mut refined = adaptive_refine(&spline, &sample, refine)?;
    if let Some(te) = &refine.refine_trailing_edge {
        refined = refine_trailing_edge(&spline, &refined, te)?;
    }
    let points = match &settings.thickness {
        Some(thickness) => apply_thickness(&refined, thickness)?,
        None => refined.positions().to_vec(),
    };

    let windtunnel = Windtunnel::build(&points, settings)?;
    let mesh = windtunnel.connect(settings.merge_radius)?;
    let markers = windtunnel.boundary_markers(&mesh)?;
    let quality = MeshQuality::evaluate(&mesh);

    info!(
        contour = points.len(),
        vertices = mesh.vertices().len(),
        cells = mesh.cells().len(),
        folded = quality.folded_cells,
        "mesh generated"
    );
    Ok(MeshOutput {
        contour: points,
        windtunnel,
        mesh,
        markers,
        quality,
    })
}
