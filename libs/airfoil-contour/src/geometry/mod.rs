//! # Geometry Utilities
//!
//! Small 2D helpers shared by contour refinement and block construction.
//!
//! ## Conventions
//!
//! - Points and vectors are `glam::DVec2`
//! - Angles are returned in degrees
//! - Normals are tangents rotated by -90 degrees, `(tx, ty) -> (ty, -tx)`,
//!   which points outward for a counter-clockwise contour


use crate::error::{ContourError, ContourResult};
use config::constants::{approx_equal, growth_factor, EPSILON};
use glam::DVec2;

/// Returns the unit vector of `v`, or `None` for a zero-length vector.
#[inline]
pub fn unit(v: DVec2) -> Option<DVec2> {
    v.try_normalize()
}

/// Angle between two vectors in degrees, in `[0, 180]`.
///
/// Returns `None` when either vector has zero length.
///
/// # Example
///
/// ```rust
/// use airfoil_contour::geometry::angle_between;
/// use glam::DVec2;
///
/// let angle = angle_between(DVec2::X, DVec2::Y).unwrap();
/// assert!((angle - 90.0).abs() < 1e-12);
/// ```
pub fn angle_between(a: DVec2, b: DVec2) -> Option<f64> {
    let a = unit(a)?;
    let b = unit(b)?;
    Some(a.dot(b).clamp(-1.0, 1.0).acos().to_degrees())
}

/// Rotates a vector by -90 degrees.
#[inline]
pub fn rotate_cw(v: DVec2) -> DVec2 {
    DVec2::new(v.y, -v.x)
}

/// Cumulative offsets of a graded one-dimensional distribution.
///
/// Produces `divisions + 1` monotone offsets from `0` to `thickness`. Cell
/// sizes grow geometrically so that the last cell is `ratio` times the
/// first one.
///
/// # Arguments
///
/// * `thickness` - Total length to distribute
/// * `divisions` - Number of cells (at least 1)
/// * `ratio` - Last cell size over first cell size (positive)
///
/// # Example
///
/// ```rust
/// use airfoil_contour::geometry::spacing;
///
/// let offsets = spacing(0.04, 15, 3.0).unwrap();
/// assert_eq!(offsets.len(), 16);
/// assert_eq!(offsets[0], 0.0);
/// assert_eq!(offsets[15], 0.04);
/// ```
pub fn spacing(thickness: f64, divisions: usize, ratio: f64) -> ContourResult<Vec<f64>> {
    if divisions == 0 {
        return Err(ContourError::invalid("divisions", "must be at least 1"));
    }
    if !thickness.is_finite() || thickness < 0.0 {
        return Err(ContourError::invalid(
            "thickness",
            format!("must be finite and non-negative, got {thickness}"),
        ));
    }
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(ContourError::invalid(
            "ratio",
            format!("must be finite and positive, got {ratio}"),
        ));
    }

    let factor = if approx_equal(ratio, 1.0) {
        1.0
    } else {
        growth_factor(ratio, divisions)
    };
    let mut cells = Vec::with_capacity(divisions);
    let mut size = 1.0;
    for _ in 0..divisions {
        cells.push(size);
        size *= factor;
    }
    let total: f64 = cells.iter().sum();

    let mut offsets = Vec::with_capacity(divisions + 1);
    let mut position = 0.0;
    offsets.push(0.0);
    for cell in &cells[..divisions - 1] {
        position += thickness * cell / total;
        offsets.push(position);
    }
    // Last offset is pinned so rounding never leaves a sliver cell
    offsets.push(thickness);
    Ok(offsets)
}

/// Normalized cumulative chord-length parameters of a polyline.
///
/// The first parameter is 0 and the last is 1. A polyline of zero total
/// length falls back to index-uniform parameters.
pub fn arc_length_parameters(line: &[DVec2]) -> Vec<f64> {
    let n = line.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0.0];
    }

    let mut params = Vec::with_capacity(n);
    let mut total = 0.0;
    params.push(0.0);
    for pair in line.windows(2) {
        total += pair[0].distance(pair[1]);
        params.push(total);
    }

    if total < EPSILON {
        return (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
    }
    for p in params.iter_mut() {
        *p /= total;
    }
    params[n - 1] = 1.0;
    params
}

/// Outward unit normal at every point of a polyline.
///
/// The tangent is a central difference at interior points and one-sided at
/// the ends of an open line; a closed line wraps around. Degenerate
/// tangents yield a zero normal.
///
/// # Example
///
/// ```rust
/// use airfoil_contour::geometry::curve_normals;
/// use glam::DVec2;
///
/// // A line running in +x has normals pointing to -y
/// let line = [DVec2::ZERO, DVec2::X, DVec2::new(2.0, 0.0)];
/// let normals = curve_normals(&line, false);
/// assert!((normals[1] - DVec2::NEG_Y).length() < 1e-12);
/// ```
pub fn curve_normals(line: &[DVec2], closed: bool) -> Vec<DVec2> {
    let n = line.len();
    if n < 2 {
        return vec![DVec2::ZERO; n];
    }

    (0..n)
        .map(|i| {
            let tangent = if closed {
                line[(i + 1) % n] - line[(i + n - 1) % n]
            } else if i == 0 {
                line[1] - line[0]
            } else if i == n - 1 {
                line[n - 1] - line[n - 2]
            } else {
                line[i + 1] - line[i - 1]
            };
            rotate_cw(tangent).normalize_or_zero()
        })
        .collect()
}

/// Unit normal of the straight line joining the ends of a polyline.
///
/// Used where a whole line is pushed in one direction. `None` when both
/// ends coincide.
pub fn mean_normal(line: &[DVec2]) -> Option<DVec2> {
    let first = *line.first()?;
    let last = *line.last()?;
    unit(rotate_cw(last - first))
}

/// Linearly resamples a polyline at normalized arc-length parameters.
///
/// Parameters outside `[0, 1]` are clamped to the end points.
pub fn resample_polyline(line: &[DVec2], params: &[f64]) -> Vec<DVec2> {
    if line.len() < 2 {
        return params.iter().map(|_| line.first().copied().unwrap_or(DVec2::ZERO)).collect();
    }

    let cumulative = arc_length_parameters(line);
    params
        .iter()
        .map(|&s| {
            let s = s.clamp(0.0, 1.0);
            // First segment whose end parameter reaches s
            let k = cumulative
                .partition_point(|&c| c < s)
                .clamp(1, line.len() - 1);
            let (s0, s1) = (cumulative[k - 1], cumulative[k]);
            let local = if s1 - s0 > EPSILON { (s - s0) / (s1 - s0) } else { 0.0 };
            line[k - 1].lerp(line[k], local)
        })
        .collect()
}

/// Signed area of a closed polygon (shoelace). Positive when counter-clockwise.
pub fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum();
    0.5 * twice
}

/// Signed areas of the four corner triangles `(p[c-1], p[c], p[c+1])` of a
/// quadrilateral.
///
/// All four are positive exactly when the quadrilateral is strictly convex
/// and counter-clockwise. A bow-tie or a dart has at least one corner of
/// the wrong sign even when the total area keeps its sign.
pub fn corner_areas(quad: &[DVec2; 4]) -> [f64; 4] {
    [0, 1, 2, 3].map(|c| {
        let prev = quad[(c + 3) % 4];
        let next = quad[(c + 1) % 4];
        0.5 * (quad[c] - prev).perp_dot(next - quad[c])
    })
}

/// First pair of non-adjacent segments of a polyline that properly cross.
///
/// Segment `k` joins points `k` and `k + 1`. Segments that only touch at
/// an end point, such as the two ends of a closed contour, do not count.
pub fn first_crossing(line: &[DVec2]) -> Option<(usize, usize)> {
    let segments = line.len().checked_sub(1)?;
    for a in 0..segments {
        for b in a + 2..segments {
            if segments_cross(line[a], line[a + 1], line[b], line[b + 1]) {
                return Some((a, b));
            }
        }
    }
    None
}

/// First interior point where a polyline turns back along itself.
pub fn first_reversal(line: &[DVec2]) -> Option<usize> {
    (1..line.len().saturating_sub(1)).find(|&k| {
        let incoming = line[k] - line[k - 1];
        let outgoing = line[k + 1] - line[k];
        let scale = incoming.length() * outgoing.length();
        incoming.perp_dot(outgoing).abs() <= EPSILON * scale && incoming.dot(outgoing) < 0.0
    })
}

fn segments_cross(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    let side = |p: DVec2, q: DVec2, r: DVec2| (q - p).perp_dot(r - p);
    let (d1, d2) = (side(a, b, c), side(a, b, d));
    let (d3, d4) = (side(c, d, a), side(c, d, b));
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// Outward normals averaged over a window of arc length `radius`.
///
/// Each point takes the tent-weighted mean of the [`curve_normals`] within
/// `radius` along the line, each normal weighted by the line length it
/// covers. Offsets that are short against `radius` stay in order across a
/// concave kink, where offsets along the raw normals cross. A zero radius
/// returns the raw normals.
pub fn smoothed_normals(line: &[DVec2], radius: f64) -> Vec<DVec2> {
    let normals = curve_normals(line, false);
    let n = line.len();
    if !(radius > 0.0) || n < 3 {
        return normals;
    }

    let mut position = Vec::with_capacity(n);
    let mut total = 0.0;
    position.push(0.0);
    for pair in line.windows(2) {
        total += pair[0].distance(pair[1]);
        position.push(total);
    }
    // Length of line attributed to each point
    let share: Vec<f64> = (0..n)
        .map(|k| {
            let before = if k > 0 { position[k] - position[k - 1] } else { 0.0 };
            let after = if k + 1 < n { position[k + 1] - position[k] } else { 0.0 };
            0.5 * (before + after)
        })
        .collect();

    let mut start = 0;
    (0..n)
        .map(|i| {
            while position[i] - position[start] >= radius {
                start += 1;
            }
            let mut sum = DVec2::ZERO;
            for k in start..n {
                let distance = (position[k] - position[i]).abs();
                if position[k] - position[i] >= radius {
                    break;
                }
                sum += normals[k] * ((1.0 - distance / radius) * share[k]);
            }
            sum.try_normalize().unwrap_or(normals[i])
        })
        .collect()
}
