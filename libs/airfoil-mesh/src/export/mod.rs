//! # Mesh Export
//!
//! ASCII writers for the connected mesh and its boundary markers.
//!
//! | Format | Cells | Boundaries |
//! |--------|-------|------------|
//! | SU2 | quads (type 9) | `airfoil`, `farfield` line markers |
//! | GMSH 2.2 | quads (type 3) | lines with physical tags 1 and 2 |
//! | FLMA | hexahedra of a thin extruded layer | face selections |
//! | VTK legacy | quads (type 9) | none |
//!
//! ## Example
//!
//! ```rust
//! use airfoil_mesh::block::StructuredBlock;
//! use airfoil_mesh::connect::assemble;
//! use airfoil_mesh::export::{write_mesh, MeshFormat};
//! use airfoil_mesh::windtunnel::BoundaryMarkers;
//! use glam::DVec2;
//!
//! let nodes = vec![DVec2::new(0.0, 0.0), DVec2::new(0.0, 1.0), DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0)];
//! let block = StructuredBlock::from_nodes("cell", 2, nodes).unwrap();
//! let mesh = assemble(&[block], 1e-6).unwrap();
//!
//! let mut out = Vec::new();
//! write_mesh(&mut out, MeshFormat::Su2, &mesh, &BoundaryMarkers::default()).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("NDIME= 2"));
//! ```

mod flma;
mod gmsh;
mod su2;
mod vtk;

use crate::connect::GlobalMesh;
use crate::error::{MeshError, MeshResult};
use crate::windtunnel::BoundaryMarkers;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshFormat {
    /// SU2 native mesh
    Su2,
    /// GMSH 2.2 ASCII
    Gmsh,
    /// FLMA extruded hexahedral layer
    Flma,
    /// VTK legacy unstructured grid
    Vtk,
}

impl MeshFormat {
    /// All formats, in the order of the table above.
    pub const ALL: [MeshFormat; 4] = [Self::Su2, Self::Gmsh, Self::Flma, Self::Vtk];

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Su2 => "su2",
            Self::Gmsh => "msh",
            Self::Flma => "flma",
            Self::Vtk => "vtk",
        }
    }

    /// Format for a file extension, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }
}

/// Writes `mesh` in `format` to any writer.
///
/// The writer is buffered internally and flushed before returning.
pub fn write_mesh<W: Write>(
    writer: W,
    format: MeshFormat,
    mesh: &GlobalMesh,
    markers: &BoundaryMarkers,
) -> io::Result<()> {
    let mut out = BufWriter::new(writer);
    match format {
        MeshFormat::Su2 => su2::write(&mut out, mesh, markers)?,
        MeshFormat::Gmsh => gmsh::write(&mut out, mesh, markers)?,
        MeshFormat::Flma => flma::write(&mut out, mesh, markers)?,
        MeshFormat::Vtk => vtk::write(&mut out, mesh)?,
    }
    out.flush()
}

/// Creates `path` and writes `mesh` to it.
///
/// # Errors
///
/// `Io` naming `path` when the file cannot be created or written.
pub fn write_mesh_file(
    path: impl AsRef<Path>,
    format: MeshFormat,
    mesh: &GlobalMesh,
    markers: &BoundaryMarkers,
) -> MeshResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MeshError::io(path, e))?;
    write_mesh(file, format, mesh, markers).map_err(|e| MeshError::io(path, e))?;
    info!(
        path = %path.display(),
        ?format,
        vertices = mesh.vertices().len(),
        cells = mesh.cells().len(),
        "mesh written"
    );
    Ok(())
}
