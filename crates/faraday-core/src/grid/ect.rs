//! Enlarged Cell Technique: borrowing/lending area stabilisation.
//!
//! A severely cut face leaves a tiny area in the denominator of the
//! explicit H-update, which would force the global time step down to the
//! smallest fragment. The ECT pass raises each such face's *stabilised*
//! area to a threshold by transferring surplus from neighbouring faces in
//! the same plane. True conformal areas are never touched; only the derived
//! `stabilised` value moves, and every transfer is recorded on both sides
//! so the exchange is conserved and queryable.
//!
//! Faces that cannot reach the threshold within the search radius are
//! excluded from the update instead of being left unstable. Their partial
//! transfers are rolled back so the finalised relation stays conservative.

use super::FacePlane;
use crate::types::StabilisationPolicy;

/// Relative slack below which a residual debt counts as retired.
const DEBT_TOL: f64 = 1e-12;

/// Run the borrowing/lending pass over one plane.
///
/// Returns the number of faces excluded for want of lenders.
pub(crate) fn stabilise_plane(plane: &mut FacePlane, policy: &StabilisationPolicy) -> usize {
    let (nx, ny, nz) = plane.dims();
    let (u_axis, v_axis) = plane.in_plane_axes();
    let (du, dv) = plane.in_plane_spacings();
    let radius = policy.search_radius as i64;

    // Borrower set is fixed up front: a face below threshold may not lend,
    // a face at or above it may not borrow.
    let is_borrower: Vec<bool> = plane
        .records
        .iter()
        .map(|r| {
            r.kind == super::PatchKind::Cut && r.area < policy.area_threshold * r.nominal
        })
        .collect();

    // In-plane offsets within the search radius (Manhattan, so radius 1 is
    // exactly the 4-connected neighbourhood), nearest first.
    let mut offsets: Vec<(i64, i64, f64)> = Vec::new();
    for a in -radius..=radius {
        for b in -radius..=radius {
            if (a, b) == (0, 0) || a.abs() + b.abs() > radius {
                continue;
            }
            let dist = ((a as f64 * du).powi(2) + (b as f64 * dv).powi(2)).sqrt();
            offsets.push((a, b, dist));
        }
    }
    offsets.sort_by(|x, y| x.2.total_cmp(&y.2));

    let dims = [nx as i64, ny as i64, nz as i64];
    let mut excluded = 0_usize;

    // Deterministic visitation: ascending flat index.
    for b_flat in 0..plane.records.len() {
        if !is_borrower[b_flat] {
            continue;
        }
        let (bi, bj, bk) = plane.coords(b_flat);
        let target = policy.area_threshold * plane.records[b_flat].nominal;
        let mut debt = target - plane.records[b_flat].area;
        let tol = DEBT_TOL * plane.records[b_flat].nominal;

        // Candidate lenders, nearest first, flat-index tie-break.
        let mut candidates: Vec<(usize, f64)> = Vec::new();
        for &(a, b, dist) in &offsets {
            let mut coords = [bi as i64, bj as i64, bk as i64];
            coords[u_axis] += a;
            coords[v_axis] += b;
            if coords.iter().zip(&dims).any(|(&c, &n)| c < 0 || c >= n) {
                continue;
            }
            let flat =
                plane.flat_index(coords[0] as usize, coords[1] as usize, coords[2] as usize);
            candidates.push((flat, dist));
        }
        candidates.sort_by(|x, y| x.1.total_cmp(&y.1).then(x.0.cmp(&y.0)));

        for (l_flat, _) in candidates {
            if debt <= tol {
                break;
            }
            if is_borrower[l_flat] || plane.records[l_flat].is_excluded() {
                continue;
            }
            let surplus = plane.records[l_flat].stabilised
                - policy.area_threshold * plane.records[l_flat].nominal;
            if surplus <= tol {
                continue;
            }
            let amount = debt.min(surplus);
            plane.records[l_flat].stabilised -= amount;
            plane.records[l_flat].lent.push((b_flat, amount));
            plane.records[b_flat].stabilised += amount;
            plane.records[b_flat].borrowed.push((l_flat, amount));
            debt -= amount;
        }

        if debt > tol {
            // No way to reach the threshold: freeze the face rather than
            // leave it unstable, and undo its partial transfers.
            let transfers = std::mem::take(&mut plane.records[b_flat].borrowed);
            for (l_flat, amount) in transfers {
                plane.records[l_flat].stabilised += amount;
                if let Some(pos) = plane.records[l_flat]
                    .lent
                    .iter()
                    .rposition(|&(to, amt)| to == b_flat && amt == amount)
                {
                    plane.records[l_flat].lent.remove(pos);
                }
            }
            plane.records[b_flat].stabilised = plane.records[b_flat].area;
            plane.records[b_flat].excluded = true;
            excluded += 1;
            log::warn!(
                "face ({}, {}, {}) cut to {:.3e} of {:.3e} could not be stabilised \
                 within radius {}; excluding it from the update",
                bi,
                bj,
                bk,
                plane.records[b_flat].area,
                plane.records[b_flat].nominal,
                policy.search_radius,
            );
        }
    }

    if excluded > 0 {
        log::debug!(
            "stabilisation pass excluded {} face(s) in plane ({}, {})",
            excluded,
            u_axis,
            v_axis,
        );
    }
    excluded
}
