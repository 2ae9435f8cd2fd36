//! Conformal classification properties: corrected factors vanish inside
//! conductors, stay nominal outside, and the borrowing/lending relation is
//! conservative and local.

use faraday_core::grid::{PatchKind, StaggeredGrid};
use faraday_core::types::{GridBounds, GridScheme, StabilisationPolicy};
use faraday_geometry::assembly::ConductorAssembly;
use faraday_geometry::primitives::{Solid, Sphere};

fn unit_bounds() -> GridBounds {
    GridBounds::centred_cube(1.0)
}

fn sphere_assembly(radius: f64) -> ConductorAssembly {
    ConductorAssembly::new(vec![Solid::Sphere(Sphere {
        centre: [0.0, 0.0, 0.0],
        radius,
    })])
}

fn conformal_grid(n: usize, assembly: &ConductorAssembly) -> StaggeredGrid {
    StaggeredGrid::new(
        unit_bounds(),
        n,
        n,
        n,
        assembly,
        GridScheme::Conformal,
        StabilisationPolicy::default(),
    )
    .unwrap()
}

// ─────────────────────────────────────────────────────────────
// Inside / outside invariants
// ─────────────────────────────────────────────────────────────

#[test]
fn test_entities_inside_conductor_have_zero_measure() {
    let grid = conformal_grid(10, &sphere_assembly(0.3));

    // The cell at the domain centre sits well inside the sphere.
    let (i, j, k) = (5, 5, 5);
    assert_eq!(grid.edge_length_x(i, j, k), 0.0);
    assert_eq!(grid.edge_length_y(i, j, k), 0.0);
    assert_eq!(grid.edge_length_z(i, j, k), 0.0);

    for plane in [grid.faces_yz(), grid.faces_zx(), grid.faces_xy()] {
        let record = plane.record(i, j, k);
        assert_eq!(record.kind, PatchKind::Excluded);
        assert_eq!(record.area, 0.0);
        assert_eq!(record.stabilised, 0.0);
        assert!(record.is_excluded());
    }
}

#[test]
fn test_free_entities_keep_nominal_measure() {
    let grid = conformal_grid(10, &sphere_assembly(0.3));
    let (dx, dy, dz) = (grid.dx(), grid.dy(), grid.dz());

    // A corner cell is far outside the sphere.
    let (i, j, k) = (0, 0, 0);
    assert_eq!(grid.edge_length_x(i, j, k), dx);
    assert_eq!(grid.edge_length_y(i, j, k), dy);
    assert_eq!(grid.edge_length_z(i, j, k), dz);

    let record = grid.faces_xy().record(i, j, k);
    assert_eq!(record.kind, PatchKind::Interior);
    assert_eq!(record.area, dx * dy);
    assert_eq!(record.stabilised, dx * dy);
    assert!(record.borrowed.is_empty());
    assert!(!record.is_excluded());
}

#[test]
fn test_cut_faces_exist_and_are_bounded() {
    let grid = conformal_grid(12, &sphere_assembly(0.3));
    let mut cut_seen = 0;
    for plane in [grid.faces_yz(), grid.faces_zx(), grid.faces_xy()] {
        let counts = plane.counts();
        assert!(counts.cut > 0, "a sphere must cut some faces");
        cut_seen += counts.cut;
        for flat in 0..12 * 12 * 12 {
            let r = plane.record_at(flat);
            assert!(
                r.area >= 0.0 && r.area <= r.nominal + 1e-12,
                "area {} outside [0, {}]",
                r.area,
                r.nominal
            );
            assert!(r.stabilised >= r.area - 1e-15);
        }
    }
    assert!(cut_seen > 100);
}

// ─────────────────────────────────────────────────────────────
// Equivalence with the uncorrected grid
// ─────────────────────────────────────────────────────────────

#[test]
fn test_empty_and_far_assemblies_match_uncorrected_grid() {
    let n = 8;
    let empty = conformal_grid(n, &ConductorAssembly::empty());
    let far = conformal_grid(
        n,
        &ConductorAssembly::new(vec![Solid::Sphere(Sphere {
            centre: [10.0, 10.0, 10.0],
            radius: 0.5,
        })]),
    );
    let staircase = StaggeredGrid::new(
        unit_bounds(),
        n,
        n,
        n,
        &ConductorAssembly::empty(),
        GridScheme::Staircase,
        StabilisationPolicy::default(),
    )
    .unwrap();

    for grid in [&empty, &far, &staircase] {
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    assert_eq!(grid.edge_length_x(i, j, k), grid.dx());
                    assert_eq!(grid.edge_length_y(i, j, k), grid.dy());
                    assert_eq!(grid.edge_length_z(i, j, k), grid.dz());
                    for plane in [grid.faces_yz(), grid.faces_zx(), grid.faces_xy()] {
                        let r = plane.record(i, j, k);
                        assert_eq!(r.kind, PatchKind::Interior);
                        assert_eq!(r.area, r.nominal);
                        assert_eq!(r.stabilised, r.nominal);
                        assert!(r.borrowed.is_empty() && r.lent.is_empty());
                    }
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────
// Transfer relation: conservation and locality
// ─────────────────────────────────────────────────────────────

#[test]
fn test_transfers_are_conservative() {
    let grid = conformal_grid(14, &sphere_assembly(0.32));
    let n = 14 * 14 * 14;

    for plane in [grid.faces_yz(), grid.faces_zx(), grid.faces_xy()] {
        let mut total_borrowed = 0.0;
        let mut total_lent = 0.0;

        for flat in 0..n {
            let r = plane.record_at(flat);

            for &(lender, amount) in &r.borrowed {
                assert!(amount > 0.0);
                total_borrowed += amount;
                // The lender carries the mirror entry.
                let mirror = plane
                    .record_at(lender)
                    .lent
                    .iter()
                    .any(|&(to, amt)| to == flat && amt == amount);
                assert!(mirror, "transfer {} -> {} not mirrored", lender, flat);
            }
            for &(_, amount) in &r.lent {
                total_lent += amount;
            }

            // What a face borrowed is exactly its stabilised gain.
            let gained: f64 = r.borrowed.iter().map(|&(_, a)| a).sum();
            assert!(
                (r.stabilised - r.area - gained).abs() < 1e-12 * r.nominal.max(1e-30),
                "stabilised {} != area {} + borrowed {}",
                r.stabilised,
                r.area,
                gained
            );
        }

        assert!(
            (total_borrowed - total_lent).abs() < 1e-12,
            "borrowed {} != lent {}",
            total_borrowed,
            total_lent
        );
    }
}

#[test]
fn test_no_face_both_borrows_and_lends() {
    let grid = conformal_grid(14, &sphere_assembly(0.32));
    for plane in [grid.faces_yz(), grid.faces_zx(), grid.faces_xy()] {
        for flat in 0..14 * 14 * 14 {
            let r = plane.record_at(flat);
            assert!(
                r.borrowed.is_empty() || r.lent.is_empty(),
                "face {} both borrows and lends",
                flat
            );
        }
    }
}

#[test]
fn test_transfers_are_local_and_in_plane() {
    let radius = StabilisationPolicy::default().search_radius as i64;
    let grid = conformal_grid(14, &sphere_assembly(0.32));

    for plane in [grid.faces_yz(), grid.faces_zx(), grid.faces_xy()] {
        let (u_axis, v_axis) = plane.in_plane_axes();
        for flat in 0..14 * 14 * 14 {
            let r = plane.record_at(flat);
            let (bi, bj, bk) = plane.coords(flat);
            let b = [bi as i64, bj as i64, bk as i64];
            for &(lender, _) in &r.borrowed {
                let (li, lj, lk) = plane.coords(lender);
                let l = [li as i64, lj as i64, lk as i64];
                let delta = [l[0] - b[0], l[1] - b[1], l[2] - b[2]];
                let manhattan = delta[u_axis].abs() + delta[v_axis].abs();
                assert!(manhattan >= 1 && manhattan <= radius);
                // No transfer ever crosses planes.
                let normal = 3 - u_axis - v_axis;
                assert_eq!(delta[normal], 0);
            }
        }
    }
}
