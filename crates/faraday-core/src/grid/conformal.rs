//! Classification and conformal correction.
//!
//! Every primal edge and face patch is classified against the conductor by
//! sampling the membership predicate. Cut entities get their residual
//! length/area computed from boundary crossing points located by bisection:
//! the conductor interface only answers point membership, so the crossing
//! is bracketed to machine precision and the surface is treated as straight
//! between crossings — exact for planar cuts, per-edge linear interpolation
//! otherwise.
//!
//! Membership is boundary-inclusive, so a conductor surface exactly
//! coincident with a grid line resolves as inside and the touching entities
//! collapse to zero measure instead of dividing by a near-zero area later.

use faraday_geometry::assembly::Conductor;

use super::{FaceRecord, PatchKind, StaggeredGrid};
use crate::types::GridScheme;

/// Bisection steps for boundary bracketing. 64 halvings put the bracket
/// width below 1 ulp of any practical domain size.
const BISECT_STEPS: usize = 64;

/// Locate the conductor boundary between an outside and an inside point.
fn crossing(conductor: &dyn Conductor, outside: [f64; 3], inside: [f64; 3]) -> [f64; 3] {
    let (mut a, mut b) = (outside, inside);
    for _ in 0..BISECT_STEPS {
        let mid = [
            0.5 * (a[0] + b[0]),
            0.5 * (a[1] + b[1]),
            0.5 * (a[2] + b[2]),
        ];
        if conductor.contains(mid[0], mid[1], mid[2]) {
            b = mid;
        } else {
            a = mid;
        }
    }
    [
        0.5 * (a[0] + b[0]),
        0.5 * (a[1] + b[1]),
        0.5 * (a[2] + b[2]),
    ]
}

/// Fraction of the straight segment `a → b` lying outside the conductor.
///
/// The segment is split at its midpoint so that a conductor sliver touching
/// only the middle of an edge is still seen at midpoint resolution.
pub(crate) fn outside_fraction(conductor: &dyn Conductor, a: [f64; 3], b: [f64; 3]) -> f64 {
    let mid = [
        0.5 * (a[0] + b[0]),
        0.5 * (a[1] + b[1]),
        0.5 * (a[2] + b[2]),
    ];
    0.5 * (half_fraction(conductor, a, mid) + half_fraction(conductor, mid, b))
}

/// Outside fraction of one sub-segment, endpoints classified individually.
fn half_fraction(conductor: &dyn Conductor, p: [f64; 3], q: [f64; 3]) -> f64 {
    let p_in = conductor.contains(p[0], p[1], p[2]);
    let q_in = conductor.contains(q[0], q[1], q[2]);
    match (p_in, q_in) {
        (false, false) => 1.0,
        (true, true) => 0.0,
        (false, true) => param_of(crossing(conductor, p, q), p, q),
        (true, false) => 1.0 - param_of(crossing(conductor, q, p), p, q),
    }
}

/// Parameter t of a point on the segment `p + t·(q − p)`.
fn param_of(point: [f64; 3], p: [f64; 3], q: [f64; 3]) -> f64 {
    // The segment is axis-aligned in practice; use the dominant axis.
    let mut axis = 0;
    let mut span = 0.0_f64;
    for c in 0..3 {
        let d = (q[c] - p[c]).abs();
        if d > span {
            span = d;
            axis = c;
        }
    }
    if span == 0.0 {
        return 0.0;
    }
    ((point[axis] - p[axis]) / (q[axis] - p[axis])).clamp(0.0, 1.0)
}

/// Classify one rectangular face patch and compute its residual area.
///
/// Samples the four corners and the four edge midpoints of the patch
/// boundary. A patch whose eight samples are all free is interior; all
/// inside, excluded. Otherwise the residual region is the polygon of
/// outside samples plus bisected boundary crossings, measured by the
/// shoelace formula.
pub(crate) fn classify_patch(
    conductor: &dyn Conductor,
    origin: [f64; 3],
    u_axis: usize,
    v_axis: usize,
    du: f64,
    dv: f64,
) -> (PatchKind, f64) {
    let nominal = du * dv;
    if nominal <= 0.0 {
        // Degenerate geometry is excluded outright.
        return (PatchKind::Excluded, 0.0);
    }

    // Boundary cycle: corner, midpoint, corner, ... counter-clockwise in
    // the (u, v) plane.
    const CYCLE: [(f64, f64); 8] = [
        (0.0, 0.0),
        (0.5, 0.0),
        (1.0, 0.0),
        (1.0, 0.5),
        (1.0, 1.0),
        (0.5, 1.0),
        (0.0, 1.0),
        (0.0, 0.5),
    ];

    let mut points = [[0.0_f64; 3]; 8];
    let mut inside = [false; 8];
    for (s, &(su, sv)) in CYCLE.iter().enumerate() {
        let mut p = origin;
        p[u_axis] += su * du;
        p[v_axis] += sv * dv;
        points[s] = p;
        inside[s] = conductor.contains(p[0], p[1], p[2]);
    }

    if inside.iter().all(|&m| !m) {
        return (PatchKind::Interior, nominal);
    }
    if inside.iter().all(|&m| m) {
        return (PatchKind::Excluded, 0.0);
    }

    // Walk the boundary of the residual (outside) region: keep free
    // samples, insert a bisected crossing wherever membership flips.
    let mut polygon: Vec<[f64; 2]> = Vec::with_capacity(12);
    for s in 0..8 {
        let n = (s + 1) % 8;
        if !inside[s] {
            polygon.push([points[s][u_axis], points[s][v_axis]]);
        }
        if inside[s] != inside[n] {
            let c = if inside[s] {
                crossing(conductor, points[n], points[s])
            } else {
                crossing(conductor, points[s], points[n])
            };
            polygon.push([c[u_axis], c[v_axis]]);
        }
    }

    let area = shoelace(&polygon).clamp(0.0, nominal);
    (PatchKind::Cut, area)
}

fn shoelace(polygon: &[[f64; 2]]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for s in 0..polygon.len() {
        let [x0, y0] = polygon[s];
        let [x1, y1] = polygon[(s + 1) % polygon.len()];
        twice += x0 * y1 - x1 * y0;
    }
    0.5 * twice.abs()
}

/// Compute conformal (or staircase) lengths for every primal edge.
pub(crate) fn classify_edges(grid: &mut StaggeredGrid, conductor: &dyn Conductor) {
    let (nx, ny, nz) = (grid.nx(), grid.ny(), grid.nz());
    let spacings = grid.spacings();
    let origin = [grid.bounds().xmin, grid.bounds().ymin, grid.bounds().zmin];
    let scheme = grid.scheme();

    for c in 0..3 {
        let lengths = &mut grid.edge_lengths_mut()[c];
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    let a = [
                        origin[0] + i as f64 * spacings[0],
                        origin[1] + j as f64 * spacings[1],
                        origin[2] + k as f64 * spacings[2],
                    ];
                    let mut b = a;
                    b[c] += spacings[c];

                    lengths[[i, j, k]] = match scheme {
                        GridScheme::Conformal => {
                            spacings[c] * outside_fraction(conductor, a, b)
                        }
                        GridScheme::Staircase => {
                            let mid = [
                                0.5 * (a[0] + b[0]),
                                0.5 * (a[1] + b[1]),
                                0.5 * (a[2] + b[2]),
                            ];
                            if conductor.contains(mid[0], mid[1], mid[2]) {
                                0.0
                            } else {
                                spacings[c]
                            }
                        }
                    };
                }
            }
        }
    }
}

/// Classify every face patch of every plane.
pub(crate) fn classify_faces(grid: &mut StaggeredGrid, conductor: &dyn Conductor) {
    let (nx, ny, nz) = (grid.nx(), grid.ny(), grid.nz());
    let spacings = grid.spacings();
    let origin = [grid.bounds().xmin, grid.bounds().ymin, grid.bounds().zmin];
    let scheme = grid.scheme();

    for plane in grid.face_planes_mut() {
        let (u_axis, v_axis) = (plane.u_axis, plane.v_axis);
        let (du, dv) = (plane.du, plane.dv);
        let nominal = du * dv;

        plane.records.clear();
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let p = [
                        origin[0] + i as f64 * spacings[0],
                        origin[1] + j as f64 * spacings[1],
                        origin[2] + k as f64 * spacings[2],
                    ];
                    let (kind, area) = match scheme {
                        GridScheme::Conformal => {
                            classify_patch(conductor, p, u_axis, v_axis, du, dv)
                        }
                        GridScheme::Staircase => {
                            let mut centre = p;
                            centre[u_axis] += 0.5 * du;
                            centre[v_axis] += 0.5 * dv;
                            if conductor.contains(centre[0], centre[1], centre[2]) {
                                (PatchKind::Excluded, 0.0)
                            } else {
                                (PatchKind::Interior, nominal)
                            }
                        }
                    };
                    plane.records.push(FaceRecord::new(kind, nominal, area));
                }
            }
        }
    }
}
