//! GMSH 2.2 ASCII mesh with 1-based numbering.

use crate::connect::GlobalMesh;
use crate::windtunnel::BoundaryMarkers;
use std::io::{self, Write};

const LINE: u8 = 1;
const QUADRILATERAL: u8 = 3;
/// Physical tag of the cells, after the two boundary tags
const FLUID_TAG: usize = 3;

pub(super) fn write<W: Write>(
    out: &mut W,
    mesh: &GlobalMesh,
    markers: &BoundaryMarkers,
) -> io::Result<()> {
    let named = markers.named();

    writeln!(out, "$MeshFormat")?;
    writeln!(out, "2.2 0 8")?;
    writeln!(out, "$EndMeshFormat")?;

    writeln!(out, "$PhysicalNames")?;
    writeln!(out, "{}", named.len() + 1)?;
    for (tag, (name, _)) in (1..).zip(named.iter()) {
        writeln!(out, "1 {tag} \"{name}\"")?;
    }
    writeln!(out, "2 {FLUID_TAG} \"fluid\"")?;
    writeln!(out, "$EndPhysicalNames")?;

    writeln!(out, "$Nodes")?;
    writeln!(out, "{}", mesh.vertices().len())?;
    for (index, p) in mesh.vertices().iter().enumerate() {
        writeln!(out, "{} {:.15e} {:.15e} 0", index + 1, p.x, p.y)?;
    }
    writeln!(out, "$EndNodes")?;

    let line_count: usize = named.iter().map(|(_, edges)| edges.len()).sum();
    writeln!(out, "$Elements")?;
    writeln!(out, "{}", line_count + mesh.cells().len())?;

    // Element: id type tag-count physical geometrical nodes...
    let mut id = 1;
    for (tag, (_, edges)) in (1..).zip(named.iter()) {
        for [a, b] in edges.iter() {
            writeln!(out, "{id} {LINE} 2 {tag} {tag} {} {}", a + 1, b + 1)?;
            id += 1;
        }
    }
    for [a, b, c, d] in mesh.cells() {
        writeln!(
            out,
            "{id} {QUADRILATERAL} 2 {FLUID_TAG} {FLUID_TAG} {} {} {} {}",
            a + 1,
            b + 1,
            c + 1,
            d + 1
        )?;
        id += 1;
    }
    writeln!(out, "$EndElements")?;
    Ok(())
}
