//! FLMA ASCII mesh: the 2D mesh extruded into one layer of hexahedra.
//!
//! ```text
//! <vertex count>
//! x y z                  back layer first, then front layer
//! <cell count>
//! 8 n0 .. n7             back quad, then front quad
//! <cell count>
//! 12                     element type per cell
//! <selection count>
//! <name>
//! <face count>
//! cell face              face 0 back, 1 front, 2 + k side over edge k
//! ```

use crate::connect::GlobalMesh;
use crate::windtunnel::BoundaryMarkers;
use config::constants::FLMA_LAYER_DEPTH;
use std::collections::HashMap;
use std::io::{self, Write};

const HEXAHEDRON: u8 = 12;
const BACK_FACE: usize = 0;
const FRONT_FACE: usize = 1;
const FIRST_SIDE_FACE: usize = 2;

pub(super) fn write<W: Write>(
    out: &mut W,
    mesh: &GlobalMesh,
    markers: &BoundaryMarkers,
) -> io::Result<()> {
    let vertices = mesh.vertices();
    let cells = mesh.cells();
    let layer = vertices.len();
    let half = 0.5 * FLMA_LAYER_DEPTH;

    writeln!(out, "{}", 2 * layer)?;
    for z in [-half, half] {
        for p in vertices {
            writeln!(out, "{:.15e} {:.15e} {:.15e}", p.x, p.y, z)?;
        }
    }

    writeln!(out, "{}", cells.len())?;
    for [a, b, c, d] in cells {
        writeln!(
            out,
            "8 {a} {b} {c} {d} {} {} {} {}",
            a + layer,
            b + layer,
            c + layer,
            d + layer
        )?;
    }

    writeln!(out, "{}", cells.len())?;
    for _ in cells {
        writeln!(out, "{HEXAHEDRON}")?;
    }

    let sides = side_faces(cells);
    let named = markers.named();
    writeln!(out, "{}", named.len() + 2)?;
    for (name, face) in [("front", FRONT_FACE), ("back", BACK_FACE)] {
        writeln!(out, "{name}")?;
        writeln!(out, "{}", cells.len())?;
        for cell in 0..cells.len() {
            writeln!(out, "{cell} {face}")?;
        }
    }
    for (name, edges) in named {
        writeln!(out, "{name}")?;
        writeln!(out, "{}", edges.len())?;
        for &[a, b] in edges {
            let (cell, face) = sides.get(&edge_key(a, b)).copied().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("marker '{name}' edge {a}-{b} is not a cell side"),
                )
            })?;
            writeln!(out, "{cell} {face}")?;
        }
    }
    Ok(())
}

/// Side face of every cell edge, keyed by its sorted vertex pair.
fn side_faces(cells: &[[usize; 4]]) -> HashMap<[usize; 2], (usize, usize)> {
    let mut faces = HashMap::with_capacity(4 * cells.len());
    for (index, cell) in cells.iter().enumerate() {
        for k in 0..4 {
            let key = edge_key(cell[k], cell[(k + 1) % 4]);
            faces.entry(key).or_insert((index, FIRST_SIDE_FACE + k));
        }
    }
    faces
}

fn edge_key(a: usize, b: usize) -> [usize; 2] {
    [a.min(b), a.max(b)]
}
