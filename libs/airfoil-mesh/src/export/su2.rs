//! SU2 native ASCII mesh.

use crate::connect::GlobalMesh;
use crate::windtunnel::BoundaryMarkers;
use std::io::{self, Write};

const QUADRILATERAL: u8 = 9;
const LINE: u8 = 3;

pub(super) fn write<W: Write>(
    out: &mut W,
    mesh: &GlobalMesh,
    markers: &BoundaryMarkers,
) -> io::Result<()> {
    writeln!(out, "NDIME= 2")?;

    writeln!(out, "NELEM= {}", mesh.cells().len())?;
    for (index, [a, b, c, d]) in mesh.cells().iter().enumerate() {
        writeln!(out, "{QUADRILATERAL} {a} {b} {c} {d} {index}")?;
    }

    writeln!(out, "NPOIN= {}", mesh.vertices().len())?;
    for (index, p) in mesh.vertices().iter().enumerate() {
        writeln!(out, "{:.15e} {:.15e} {index}", p.x, p.y)?;
    }

    let named = markers.named();
    writeln!(out, "NMARK= {}", named.len())?;
    for (name, edges) in named {
        writeln!(out, "MARKER_TAG= {name}")?;
        writeln!(out, "MARKER_ELEMS= {}", edges.len())?;
        for [a, b] in edges {
            writeln!(out, "{LINE} {a} {b}")?;
        }
    }
    Ok(())
}
