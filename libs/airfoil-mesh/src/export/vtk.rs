//! VTK legacy ASCII unstructured grid.

use crate::connect::GlobalMesh;
use std::io::{self, Write};

const VTK_QUAD: u8 = 9;

pub(super) fn write<W: Write>(out: &mut W, mesh: &GlobalMesh) -> io::Result<()> {
    writeln!(out, "# vtk DataFile Version 3.0")?;
    writeln!(out, "airfoil mesh")?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET UNSTRUCTURED_GRID")?;

    writeln!(out, "POINTS {} double", mesh.vertices().len())?;
    for p in mesh.vertices() {
        writeln!(out, "{:.15e} {:.15e} 0", p.x, p.y)?;
    }

    let cells = mesh.cells();
    writeln!(out, "CELLS {} {}", cells.len(), cells.len() * 5)?;
    for [a, b, c, d] in cells {
        writeln!(out, "4 {a} {b} {c} {d}")?;
    }
    writeln!(out, "CELL_TYPES {}", cells.len())?;
    for _ in cells {
        writeln!(out, "{VTK_QUAD}")?;
    }
    Ok(())
}
