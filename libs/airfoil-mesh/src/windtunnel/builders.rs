//! # Block Builders
//!
//! One function per block of the C-type topology:
//!
//! ```text
//!            tunnel (C-shaped far field)
//!      ┌──────────────────────────────┬────────┐
//!      │        ┌──────────┐          │        │
//!      │        │ airfoil  ├─ TE ─────┤  wake  │
//!      │        └──────────┘          │        │
//!      └──────────────────────────────┴────────┘
//! ```
//!
//! All blocks are oriented so that their cells wind counter-clockwise.

use crate::block::{interpolate, Boundary, ExtrudeDirection, StructuredBlock};
use crate::error::{MeshError, MeshResult};
use crate::settings::{
    AirfoilBlockParams, TrailingEdgeBlockParams, TunnelBlockParams, WakeBlockParams,
};
use airfoil_contour::geometry::{arc_length_parameters, corner_areas, smoothed_normals, spacing};
use config::constants::MERGE_RADIUS;
use glam::DVec2;
use std::f64::consts::PI;
use tracing::{debug, info};

/// Halvings of the normal-offset weight tried on a folding tunnel line.
const MAX_BLEND_REDUCTIONS: usize = 6;

/// Normal smoothing window for the outer-boundary rays, in tunnel heights.
const OUTER_RAY_WINDOW: f64 = 0.5;

/// Share of the inner arc-length fraction in the outer point distribution.
const OUTER_ARC_BLEND: f64 = 0.5;

/// Boundary-layer block: the contour extruded along its normals.
///
/// U-line 0 is the contour; U-line `divisions` lies `thickness` away.
pub fn airfoil_block(contour: &[DVec2], params: &AirfoilBlockParams) -> MeshResult<StructuredBlock> {
    if contour.len() < 3 {
        return Err(MeshError::invalid(
            "contour",
            format!("need at least 3 points, got {}", contour.len()),
        ));
    }
    let mut block = StructuredBlock::new("airfoil");
    block.extrude(
        contour,
        ExtrudeDirection::Normals,
        params.thickness,
        params.divisions,
        params.ratio,
    )?;
    info!(
        points = block.line_len(),
        lines = block.line_count(),
        "airfoil block built"
    );
    Ok(block)
}

/// Trailing-edge block, extruded downstream from the airfoil block's
/// trailing-edge V-lines.
///
/// The base line runs bottom to top: the lower V-line reversed, the points
/// across a blunt trailing-edge gap, then the upper V-line. Returns the
/// block and the number of gap segments (0 for a sharp trailing edge).
pub fn trailing_edge_block(
    airfoil: &StructuredBlock,
    params: &TrailingEdgeBlockParams,
) -> MeshResult<(StructuredBlock, usize)> {
    let Some(mut lower) = airfoil.last_v_line() else {
        return Err(MeshError::block_shape("airfoil", "block is empty"));
    };
    lower.reverse();
    let upper = airfoil.v_line(0);

    let te_lower = lower[lower.len() - 1];
    let te_upper = upper[0];
    let sharp = te_lower.distance(te_upper) <= MERGE_RADIUS;

    let mut base = lower;
    let gap_segments = if sharp {
        0
    } else {
        if params.te_divisions == 0 {
            return Err(MeshError::invalid("te_divisions", "must be at least 1"));
        }
        for k in 1..params.te_divisions {
            base.push(te_lower.lerp(te_upper, k as f64 / params.te_divisions as f64));
        }
        params.te_divisions
    };
    base.extend_from_slice(if sharp { &upper[1..] } else { &upper[..] });

    let mut block = StructuredBlock::new("trailing_edge");
    block.extrude(
        &base,
        ExtrudeDirection::MeanNormal,
        params.length,
        params.divisions,
        params.ratio,
    )?;
    info!(
        points = block.line_len(),
        lines = block.line_count(),
        gap_segments,
        "trailing-edge block built"
    );
    Ok((block, gap_segments))
}

/// C-shaped far-field block around the airfoil and trailing-edge blocks.
///
/// The inner line wraps both blocks counter-clockwise. Each inner point is
/// matched to the C-boundary of radius `height` where its smoothed normal
/// ray meets it, averaged with its own arc-length fraction so the outer
/// spacing stays ordered. The interior is a transfinite patch blended with
/// normal offsets of the inner line, weight `(1 - eta)^blend_exponent`.
/// Normals of each offset line are averaged over a window as wide as the
/// offset, which keeps the lines ordered at the concave corners where the
/// trailing-edge block meets the airfoil block.
///
/// # Errors
///
/// [`MeshError::BlockShape`] when a line still folds with the normal
/// blend switched off.
pub fn tunnel_block(
    airfoil: &StructuredBlock,
    trailing_edge: &StructuredBlock,
    params: &TunnelBlockParams,
) -> MeshResult<StructuredBlock> {
    let (Some(mut te_top), Some(outer_airfoil)) =
        (trailing_edge.last_v_line(), airfoil.last_u_line())
    else {
        return Err(MeshError::block_shape("tunnel", "inner blocks are empty"));
    };
    te_top.reverse();
    let te_bottom = trailing_edge.v_line(0);
    let inner = join_lines(&[&te_top, outer_airfoil, &te_bottom]);

    let height = params.height;
    let (start, end) = (inner[0], inner[inner.len() - 1]);
    if !(height > start.y.abs().max(end.y.abs())) || start.x <= 0.0 || end.x <= 0.0 {
        return Err(MeshError::invalid(
            "height",
            format!("tunnel height {height} does not enclose the inner blocks"),
        ));
    }

    let outer = outer_line(&inner, height);
    let left = graded_line(start, outer[0], params.divisions, params.ratio)?;
    let right = graded_line(end, outer[outer.len() - 1], params.divisions, params.ratio)?;

    let ni = inner.len();
    let nj = left.len();
    let tfi = interpolate(&Boundary {
        lower: inner.clone(),
        upper: outer,
        left,
        right,
    })?;

    // Normal offsets use the mean side-line distribution
    let left_side = tfi[0].distance(tfi[(nj - 1) * ni]);
    let right_side = tfi[ni - 1].distance(tfi[nj * ni - 1]);
    let side = 0.5 * (left_side + right_side);
    let offsets = spacing(side, params.divisions, params.ratio)?;

    let mut nodes = tfi.clone();
    let mut weight_cap: f64 = 1.0;
    for j in 1..nj - 1 {
        let normals = smoothed_normals(&inner, offsets[j]);
        let eta = offsets[j] / side;
        let mut weight = (1.0 - eta).powf(params.blend_exponent).min(weight_cap);

        let below = &nodes[(j - 1) * ni..j * ni];
        let mut line = blend_line(&tfi, &inner, &normals, offsets[j], weight, j, ni);
        let mut reductions = 0;
        while row_folds(below, &line) && weight > 0.0 {
            reductions += 1;
            weight = if reductions > MAX_BLEND_REDUCTIONS { 0.0 } else { 0.5 * weight };
            line = blend_line(&tfi, &inner, &normals, offsets[j], weight, j, ni);
        }
        if row_folds(below, &line) {
            return Err(MeshError::block_shape(
                "tunnel",
                format!("line {j} folds onto line {} with no normal blend left", j - 1),
            ));
        }
        if reductions > 0 {
            debug!(line = j, weight, "tunnel normal blend reduced to avoid folding");
        }
        weight_cap = weight;
        nodes[j * ni..(j + 1) * ni].copy_from_slice(&line);
    }
    if row_folds(&nodes[(nj - 2) * ni..(nj - 1) * ni], &nodes[(nj - 1) * ni..]) {
        return Err(MeshError::block_shape(
            "tunnel",
            "outermost cell row folds against the far field",
        ));
    }

    let block = StructuredBlock::from_nodes("tunnel", ni, nodes)?;
    info!(points = ni, lines = nj, height, "tunnel block built");
    Ok(block)
}

/// Outer C-boundary points matched to the inner line.
///
/// Each inner point casts a ray along its normal smoothed over
/// `OUTER_RAY_WINDOW * height`; rays that leave through the open end of
/// the C snap to the end on their side. The hit coordinates are made
/// non-decreasing and averaged with the inner arc-length fractions by
/// `OUTER_ARC_BLEND`.
fn outer_line(inner: &[DVec2], height: f64) -> Vec<DVec2> {
    let n = inner.len();
    let (x_top, x_bottom) = (inner[0].x, inner[n - 1].x);
    let total = x_top + PI * height + x_bottom;
    let normals = smoothed_normals(inner, OUTER_RAY_WINDOW * height);

    let mut hits: Vec<f64> = inner
        .iter()
        .zip(&normals)
        .map(|(&p, &dir)| {
            c_boundary_hit(p, dir, height, x_top, x_bottom)
                .unwrap_or(if (p + dir).y >= 0.0 { 0.0 } else { total })
        })
        .collect();
    hits[0] = 0.0;
    hits[n - 1] = total;
    for k in 1..n {
        hits[k] = hits[k].max(hits[k - 1]);
    }

    arc_length_parameters(inner)
        .iter()
        .zip(&hits)
        .map(|(&s, &hit)| {
            let d = (1.0 - OUTER_ARC_BLEND) * hit + OUTER_ARC_BLEND * s * total;
            c_boundary_point(d / total, height, x_top, x_bottom)
        })
        .collect()
}

/// Wake block downstream of the tunnel outflow.
///
/// The inflow line runs bottom to top along the tunnel's last V-line, the
/// trailing-edge block's last U-line and the tunnel's first V-line. It is
/// split at the first point whose arc-length fraction reaches
/// `params.divisor`; each half is filled by its own transfinite patch, so
/// the divisor line stays straight.
pub fn wake_block(
    tunnel: &StructuredBlock,
    trailing_edge: &StructuredBlock,
    params: &WakeBlockParams,
) -> MeshResult<StructuredBlock> {
    if !(params.length > 0.0) {
        return Err(MeshError::invalid("length", "wake length must be positive"));
    }
    if !(0.0..=1.0).contains(&params.spread) {
        return Err(MeshError::invalid(
            "spread",
            format!("must lie in [0, 1], got {}", params.spread),
        ));
    }
    if !(params.divisor > 0.0 && params.divisor < 1.0) {
        return Err(MeshError::invalid(
            "divisor",
            format!("must lie in (0, 1), got {}", params.divisor),
        ));
    }
    let (Some(mut bottom), Some(te_outflow)) =
        (tunnel.last_v_line(), trailing_edge.last_u_line())
    else {
        return Err(MeshError::block_shape("wake", "inner blocks are empty"));
    };
    bottom.reverse();
    let top = tunnel.v_line(0);
    let inflow = join_lines(&[&bottom, te_outflow, &top]);
    let n = inflow.len();

    if n < 3 {
        return Err(MeshError::block_shape(
            "wake",
            format!("inflow line of {n} points has no interior divisor"),
        ));
    }
    let divisor = wake_divisor(&inflow, params.divisor);

    let x_out = inflow.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max) + params.length;
    let lower_out = outflow_side(&inflow[..=divisor], x_out, params.spread);
    let upper_out = outflow_side(&inflow[divisor..], x_out, params.spread);

    let bottom_line = graded_line(inflow[0], lower_out[0], params.divisions, params.ratio)?;
    let divisor_line = graded_line(
        inflow[divisor],
        upper_out[0],
        params.divisions,
        params.ratio,
    )?;
    let top_line = graded_line(
        inflow[n - 1],
        upper_out[upper_out.len() - 1],
        params.divisions,
        params.ratio,
    )?;

    let lower = interpolate(&Boundary {
        lower: inflow[..=divisor].to_vec(),
        upper: lower_out,
        left: bottom_line,
        right: divisor_line.clone(),
    })?;
    let upper = interpolate(&Boundary {
        lower: inflow[divisor..].to_vec(),
        upper: upper_out,
        left: divisor_line,
        right: top_line,
    })?;

    let nj = params.divisions + 1;
    let (lower_len, upper_len) = (divisor + 1, n - divisor);
    let mut nodes = Vec::with_capacity(n * nj);
    for j in 0..nj {
        nodes.extend_from_slice(&lower[j * lower_len..(j + 1) * lower_len]);
        nodes.extend_from_slice(&upper[j * upper_len + 1..(j + 1) * upper_len]);
    }

    let block = StructuredBlock::from_nodes("wake", n, nodes)?;
    info!(points = n, lines = nj, divisor, x_out, "wake block built");
    Ok(block)
}

/// Index of the first interior inflow point whose arc-length fraction
/// reaches `fraction`. The inflow line needs at least 3 points.
pub(super) fn wake_divisor(inflow: &[DVec2], fraction: f64) -> usize {
    let last = inflow.len() - 2;
    arc_length_parameters(inflow)
        .iter()
        .position(|&s| s >= fraction)
        .unwrap_or(last)
        .clamp(1, last)
}

/// Concatenates polylines, dropping a start point that repeats the previous end.
fn join_lines(parts: &[&[DVec2]]) -> Vec<DVec2> {
    let mut line: Vec<DVec2> = Vec::new();
    for part in parts {
        let skip = match (line.last(), part.first()) {
            (Some(end), Some(start)) if end.distance(*start) <= MERGE_RADIUS => 1,
            _ => 0,
        };
        line.extend_from_slice(&part[skip.min(part.len())..]);
    }
    line
}

/// Straight line from `a` to `b` with geometrically graded points.
fn graded_line(a: DVec2, b: DVec2, divisions: usize, ratio: f64) -> MeshResult<Vec<DVec2>> {
    let length = a.distance(b);
    let offsets = spacing(length, divisions, ratio)?;
    let mut line: Vec<DVec2> = offsets
        .iter()
        .map(|d| if length > 0.0 { a.lerp(b, d / length) } else { a })
        .collect();
    if let Some(last) = line.last_mut() {
        *last = b;
    }
    Ok(line)
}

/// Point at arc-length fraction `s` of the C-boundary.
///
/// The boundary runs from `(x_top, h)` left to `(0, h)`, around the
/// half-circle of radius `h` through `(-h, 0)` and right to `(x_bottom, -h)`.
fn c_boundary_point(s: f64, h: f64, x_top: f64, x_bottom: f64) -> DVec2 {
    let arc = PI * h;
    let total = x_top + arc + x_bottom;
    let d = s.clamp(0.0, 1.0) * total;
    if d <= x_top {
        DVec2::new(x_top - d, h)
    } else if d <= x_top + arc {
        let angle = 0.5 * PI + (d - x_top) / h;
        DVec2::new(h * angle.cos(), h * angle.sin())
    } else {
        DVec2::new((d - x_top - arc).min(x_bottom), -h)
    }
}

/// Arc-length coordinate where the ray `p + t * dir`, `t > 0`, first meets
/// the C-boundary, or `None` when it leaves through the open end.
pub(super) fn c_boundary_hit(p: DVec2, dir: DVec2, h: f64, x_top: f64, x_bottom: f64) -> Option<f64> {
    let arc = PI * h;
    let mut best: Option<(f64, f64)> = None;
    let mut keep = |t: f64, d: f64| {
        if t > 0.0 && best.map_or(true, |(bt, _)| t < bt) {
            best = Some((t, d));
        }
    };

    if dir.y > 0.0 {
        let t = (h - p.y) / dir.y;
        let x = p.x + t * dir.x;
        if (0.0..=x_top).contains(&x) {
            keep(t, x_top - x);
        }
    } else if dir.y < 0.0 {
        let t = (-h - p.y) / dir.y;
        let x = p.x + t * dir.x;
        if (0.0..=x_bottom).contains(&x) {
            keep(t, x_top + arc + x);
        }
    }

    // Far root of |p + t dir| = h on the left half-plane
    let b = p.dot(dir);
    let disc = b * b - (p.length_squared() - h * h);
    if disc >= 0.0 {
        let t = -b + disc.sqrt();
        let q = p + dir * t;
        if q.x <= 0.0 {
            let angle = q.y.atan2(q.x).rem_euclid(2.0 * PI);
            keep(t, x_top + (angle - 0.5 * PI) * h);
        }
    }

    best.map(|(_, d)| d)
}

/// U-line `j` of the tunnel: normal offset blended into the transfinite field.
///
/// The side nodes keep their transfinite (straight side line) positions.
fn blend_line(
    tfi: &[DVec2],
    inner: &[DVec2],
    normals: &[DVec2],
    offset: f64,
    weight: f64,
    j: usize,
    ni: usize,
) -> Vec<DVec2> {
    (0..ni)
        .map(|i| {
            let field = tfi[j * ni + i];
            if i == 0 || i == ni - 1 {
                field
            } else {
                let normal = inner[i] + normals[i] * offset;
                normal * weight + field * (1.0 - weight)
            }
        })
        .collect()
}

/// True when a cell between two consecutive U-lines has a corner that is
/// not counter-clockwise. Catches bow-tie cells whose total area is
/// still positive.
fn row_folds(below: &[DVec2], above: &[DVec2]) -> bool {
    (0..below.len() - 1).any(|i| {
        let quad = [below[i], above[i], above[i + 1], below[i + 1]];
        corner_areas(&quad).iter().any(|&a| a <= 0.0)
    })
}

/// Outflow points for one side of the wake divisor.
///
/// The side's inflow arc-length fractions are relaxed toward uniform by
/// `spread` and mapped onto the vertical outflow segment.
fn outflow_side(inflow: &[DVec2], x_out: f64, spread: f64) -> Vec<DVec2> {
    let count = inflow.len();
    let (y0, y1) = (inflow[0].y, inflow[count - 1].y);
    arc_length_parameters(inflow)
        .iter()
        .enumerate()
        .map(|(k, f)| {
            let uniform = k as f64 / (count - 1) as f64;
            let fraction = (1.0 - spread) * f + spread * uniform;
            DVec2::new(x_out, y0 + fraction * (y1 - y0))
        })
        .collect()
}
