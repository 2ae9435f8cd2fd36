//! Validation against the analytic mode of a rotated resonant cavity.
//!
//! A 30³ grid spans a 1 m cube; a rectangular prism cavity rotated 45°
//! about z is carved out of a conductor block built from six inward-facing
//! half-spaces. H is initialised with the analytic TE(0,1,1) mode at
//! `t = -dt/2`; after one leapfrog step it must match the mode at
//! `t = +dt/2` within discretisation tolerance.

use std::f64::consts::{FRAC_PI_2, PI};

use faraday_core::cavity::CavityMode;
use faraday_core::grid::StaggeredGrid;
use faraday_core::solver::fit::FitSolver;
use faraday_core::types::{BoundaryConfig, GridBounds, GridScheme, StabilisationPolicy};
use faraday_geometry::assembly::ConductorAssembly;
use faraday_geometry::primitives::{HalfSpace, Solid};
use faraday_geometry::transform::Transform;

const N: usize = 30;
const THETA: f64 = PI / 4.0;

/// Cavity side length: the domain minus the conductor margin.
fn cavity_side() -> f64 {
    let dx = 1.0 / N as f64;
    let margin = dx * 8.0 - 0.1 * dx;
    1.0 - 2.0 * margin
}

/// Six half-spaces whose union is everything outside the rotated prism.
fn rotated_prism_conductor() -> ConductorAssembly {
    let l = cavity_side();
    let rot = Transform::rotation_z(THETA);
    let mut solids = Vec::new();

    // Side walls: outward normal of face q is at angle theta + q·π/2.
    let corners = [
        [l / 2.0, l / 2.0, 0.0],
        [-l / 2.0, l / 2.0, 0.0],
        [-l / 2.0, -l / 2.0, 0.0],
        [l / 2.0, -l / 2.0, 0.0],
    ];
    for (q, corner) in corners.iter().enumerate() {
        let phi = THETA + q as f64 * FRAC_PI_2;
        solids.push(Solid::HalfSpace(HalfSpace {
            point: rot.apply(corner),
            normal: [-phi.cos(), -phi.sin(), 0.0],
        }));
    }

    // Top and bottom caps.
    solids.push(Solid::HalfSpace(HalfSpace {
        point: [0.0, 0.0, l / 2.0],
        normal: [0.0, 0.0, -1.0],
    }));
    solids.push(Solid::HalfSpace(HalfSpace {
        point: [0.0, 0.0, -l / 2.0],
        normal: [0.0, 0.0, 1.0],
    }));

    ConductorAssembly::new(solids)
}

#[test]
fn test_rotated_cavity_mode_after_one_step() {
    let l = cavity_side();
    let mode = CavityMode {
        m: 0,
        n: 1,
        p: 1,
        lx: l,
        ly: l,
        lz: l,
        theta: THETA,
    };

    let grid = StaggeredGrid::new(
        GridBounds::centred_cube(1.0),
        N,
        N,
        N,
        &rotated_prism_conductor(),
        GridScheme::Conformal,
        StabilisationPolicy::default(),
    )
    .unwrap();

    // The rotated prism must actually cut the mesh.
    assert!(grid.faces_xy().counts().cut > 0);
    assert!(grid.faces_yz().counts().cut > 0);

    let (xmin, ymin, zmin) = {
        let b = grid.bounds();
        (b.xmin, b.ymin, b.zmin)
    };
    let (dx, dy, dz) = (grid.dx(), grid.dy(), grid.dz());

    let mut solver =
        FitSolver::new(grid, 1.0, BoundaryConfig::default(), (N / 2, N / 2, N / 2)).unwrap();
    let dt = solver.dt();
    let t0 = -0.5 * dt;

    // Initialise H with the analytic mode at t = -dt/2, each component at
    // its own staggered location.
    for i in 0..N {
        for j in 0..N {
            for k in 0..N {
                if !solver.grid().faces_xy().is_excluded(i, j, k) {
                    let x = (i as f64 + 0.5) * dx + xmin;
                    let y = (j as f64 + 0.5) * dy + ymin;
                    let z = k as f64 * dz + zmin;
                    let value = mode.hz(x, y, z, t0);
                    solver.fields_mut().set_hz(i, j, k, value);
                }
                if !solver.grid().faces_zx().is_excluded(i, j, k) {
                    let x = (i as f64 + 0.5) * dx + xmin;
                    let y = j as f64 * dy + ymin;
                    let z = (k as f64 + 0.5) * dz + zmin;
                    let value = mode.hy(x, y, z, t0);
                    solver.fields_mut().set_hy(i, j, k, value);
                }
                if !solver.grid().faces_yz().is_excluded(i, j, k) {
                    let x = i as f64 * dx + xmin;
                    let y = (j as f64 + 0.5) * dy + ymin;
                    let z = (k as f64 + 0.5) * dz + zmin;
                    let value = mode.hx(x, y, z, t0);
                    solver.fields_mut().set_hx(i, j, k, value);
                }
            }
        }
    }

    solver.advance();
    assert!(solver.fields().is_finite());

    // Compare H at t = +dt/2 against the analytic mode.
    let t1 = 0.5 * dt;
    let mut compared = 0_usize;
    for i in 0..N {
        for j in 0..N {
            for k in 0..N {
                if !solver.grid().faces_xy().is_excluded(i, j, k) {
                    let x = (i as f64 + 0.5) * dx + xmin;
                    let y = (j as f64 + 0.5) * dy + ymin;
                    let z = k as f64 * dz + zmin;
                    let expected = mode.hz(x, y, z, t1);
                    let got = solver.fields().hz(i, j, k);
                    assert!(
                        (got - expected).abs() <= 1e-2 * (1.0 + expected.abs()),
                        "Hz at ({i},{j},{k}): got {got}, expected {expected}"
                    );
                    compared += 1;
                }
                if !solver.grid().faces_zx().is_excluded(i, j, k) {
                    let x = (i as f64 + 0.5) * dx + xmin;
                    let y = j as f64 * dy + ymin;
                    let z = (k as f64 + 0.5) * dz + zmin;
                    let expected = mode.hy(x, y, z, t1);
                    let got = solver.fields().hy(i, j, k);
                    assert!(
                        (got - expected).abs() <= 1e-2 * (1.0 + expected.abs()),
                        "Hy at ({i},{j},{k}): got {got}, expected {expected}"
                    );
                    compared += 1;
                }
            }
        }
    }
    assert!(compared > 1000, "too few interior faces compared: {compared}");

    // The step must have generated an electric response to the mode.
    let mut e_max = 0.0_f64;
    for i in 0..N {
        for j in 0..N {
            for k in 0..N {
                let f = solver.fields();
                e_max = e_max
                    .max(f.ex(i, j, k).abs())
                    .max(f.ey(i, j, k).abs())
                    .max(f.ez(i, j, k).abs());
            }
        }
    }
    assert!(e_max > 0.0, "one step of a live mode must excite E");
}
