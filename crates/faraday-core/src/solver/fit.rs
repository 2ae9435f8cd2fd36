//! The explicit FIT leapfrog solver.
//!
//! State is held as integrated grid quantities on the staggered mesh: E
//! components along primal edges, H components through the faces they
//! pierce. The two update operators of the scheme,
//!
//! - H-advance: `tDs · (1/μ) · (1/Da) · C`
//! - E-advance: `(1/tDa) · (1/ε) · Ds · Cᵗ`
//!
//! are diagonal except for the curl `C`, whose every row touches exactly
//! two unit-coefficient neighbours. They are therefore applied as stencil
//! sweeps with all diagonal factors pre-multiplied into per-component
//! coefficient lattices — no global sparse matrices.
//!
//! The H-update divides by the *stabilised* face area from the ECT pass;
//! everything else uses the true conformal factors.

use ndarray::{Array3, Axis};

use crate::fields::FieldState;
use crate::grid::StaggeredGrid;
use crate::solver::ProbeSample;
use crate::types::{BoundaryConfig, BoundaryKind, ConfigError, C_LIGHT, EPS_0, MU_0};

/// Explicit leapfrog solver over a finalised staggered grid.
pub struct FitSolver {
    grid: StaggeredGrid,
    fields: FieldState,
    bc: BoundaryConfig,
    cfl: f64,
    dt: f64,
    time: f64,
    /// One-time cleanup of initial conditions pending.
    first_step: bool,
    probe: (usize, usize, usize),
    periodic: [bool; 3],
    /// H-advance coefficients per face component: `dt·tℓ/(μ·a*)`, zero on
    /// excluded faces, PMC row mask folded in.
    wh: [Array3<f64>; 3],
    /// E-advance coefficients per edge component: `dt·ℓ/(ε·ã)`, PEC row
    /// mask folded in.
    we: [Array3<f64>; 3],
    /// Source coefficients per edge component: `dt/ε`, zero inside
    /// conductors.
    wj: [Array3<f64>; 3],
    /// Column masks: E values read by the curl (PEC zeroes tangential E).
    em: [Array3<f64>; 3],
    /// Column masks: H values read by the transpose curl (PMC).
    hm: [Array3<f64>; 3],
}

impl FitSolver {
    /// Build the solver: validate the configuration, apply boundary
    /// masking, and precompute the two composite update operators.
    pub fn new(
        mut grid: StaggeredGrid,
        cfl: f64,
        bc: BoundaryConfig,
        probe: (usize, usize, usize),
    ) -> Result<Self, ConfigError> {
        if !(cfl > 0.0 && cfl <= 1.0) {
            return Err(ConfigError::InvalidCourant(cfl));
        }
        for axis in 0..3 {
            if bc.low[axis] == BoundaryKind::Pml || bc.high[axis] == BoundaryKind::Pml {
                return Err(ConfigError::UnsupportedPml);
            }
            // Periodic must pair with periodic across the axis; anything
            // else (PEC, PMC) opposite a periodic side is contradictory.
            if (bc.low[axis] == BoundaryKind::Periodic)
                != (bc.high[axis] == BoundaryKind::Periodic)
            {
                return Err(ConfigError::UnpairedPeriodic {
                    axis: ['x', 'y', 'z'][axis],
                    low: bc.low[axis],
                    high: bc.high[axis],
                });
            }
        }

        let (nx, ny, nz) = (grid.nx(), grid.ny(), grid.nz());
        let (pi, pj, pk) = probe;
        if pi >= nx || pj >= ny || pk >= nz {
            return Err(ConfigError::ProbeOutOfRange {
                i: pi,
                j: pj,
                k: pk,
                nx,
                ny,
                nz,
            });
        }

        let (dx, dy, dz) = (grid.dx(), grid.dy(), grid.dz());
        let dt = cfl
            / (C_LIGHT * (1.0 / (dx * dx) + 1.0 / (dy * dy) + 1.0 / (dz * dz)).sqrt());

        let periodic = [
            bc.low[0] == BoundaryKind::Periodic,
            bc.low[1] == BoundaryKind::Periodic,
            bc.low[2] == BoundaryKind::Periodic,
        ];

        apply_periodic_tying(&mut grid, periodic);
        let (em, hm) = boundary_masks(&grid, &bc);
        let (wh, we, wj) = update_coefficients(&grid, dt, &em, &hm);

        let fields = FieldState::new(nx, ny, nz);
        Ok(Self {
            grid,
            fields,
            bc,
            cfl,
            dt,
            time: 0.0,
            first_step: true,
            probe,
            periodic,
            wh,
            we,
            wj,
            em,
            hm,
        })
    }

    // ───────────────────────── stepping ─────────────────────────

    /// Advance H by one full step and E by one full step (leapfrog: H lives
    /// at half-integer times, E at integer times).
    ///
    /// The very first call zeroes ghost layers and every frozen component,
    /// cleaning up initial conditions that were applied where no degree of
    /// freedom exists. Numerical blow-up is not detected here; inspect the
    /// fields (`FieldState::is_finite`) from the driving loop.
    pub fn advance(&mut self) {
        if self.first_step {
            self.zero_ghosts();
            self.zero_frozen();
            self.first_step = false;
        }
        self.update_h();
        self.update_e();
        self.time += self.dt;
    }

    fn update_h(&mut self) {
        let (nx, ny, nz) = self.fields.dims();
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    // Hx: circulation of E around the yz face.
                    let w = self.wh[0][[i, j, k]];
                    if w != 0.0 {
                        let ez0 = self.fields.ez[[i, j, k]] * self.em[2][[i, j, k]];
                        let ez1 = match next(j, ny, self.periodic[1]) {
                            Some(j1) => self.fields.ez[[i, j1, k]] * self.em[2][[i, j1, k]],
                            None => 0.0,
                        };
                        let ey0 = self.fields.ey[[i, j, k]] * self.em[1][[i, j, k]];
                        let ey1 = match next(k, nz, self.periodic[2]) {
                            Some(k1) => self.fields.ey[[i, j, k1]] * self.em[1][[i, j, k1]],
                            None => 0.0,
                        };
                        self.fields.hx[[i, j, k]] -= w * ((ez1 - ez0) - (ey1 - ey0));
                    }

                    // Hy: circulation of E around the zx face.
                    let w = self.wh[1][[i, j, k]];
                    if w != 0.0 {
                        let ex0 = self.fields.ex[[i, j, k]] * self.em[0][[i, j, k]];
                        let ex1 = match next(k, nz, self.periodic[2]) {
                            Some(k1) => self.fields.ex[[i, j, k1]] * self.em[0][[i, j, k1]],
                            None => 0.0,
                        };
                        let ez0 = self.fields.ez[[i, j, k]] * self.em[2][[i, j, k]];
                        let ez1 = match next(i, nx, self.periodic[0]) {
                            Some(i1) => self.fields.ez[[i1, j, k]] * self.em[2][[i1, j, k]],
                            None => 0.0,
                        };
                        self.fields.hy[[i, j, k]] -= w * ((ex1 - ex0) - (ez1 - ez0));
                    }

                    // Hz: circulation of E around the xy face.
                    let w = self.wh[2][[i, j, k]];
                    if w != 0.0 {
                        let ey0 = self.fields.ey[[i, j, k]] * self.em[1][[i, j, k]];
                        let ey1 = match next(i, nx, self.periodic[0]) {
                            Some(i1) => self.fields.ey[[i1, j, k]] * self.em[1][[i1, j, k]],
                            None => 0.0,
                        };
                        let ex0 = self.fields.ex[[i, j, k]] * self.em[0][[i, j, k]];
                        let ex1 = match next(j, ny, self.periodic[1]) {
                            Some(j1) => self.fields.ex[[i, j1, k]] * self.em[0][[i, j1, k]],
                            None => 0.0,
                        };
                        self.fields.hz[[i, j, k]] -= w * ((ey1 - ey0) - (ex1 - ex0));
                    }
                }
            }
        }
    }

    fn update_e(&mut self) {
        let (nx, ny, nz) = self.fields.dims();
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    // Ex: transpose-curl of H plus the source term.
                    let w = self.we[0][[i, j, k]];
                    let curl = if w != 0.0 {
                        let hz0 = self.fields.hz[[i, j, k]] * self.hm[2][[i, j, k]];
                        let hz1 = match prev(j, ny, self.periodic[1]) {
                            Some(j0) => self.fields.hz[[i, j0, k]] * self.hm[2][[i, j0, k]],
                            None => 0.0,
                        };
                        let hy0 = self.fields.hy[[i, j, k]] * self.hm[1][[i, j, k]];
                        let hy1 = match prev(k, nz, self.periodic[2]) {
                            Some(k0) => self.fields.hy[[i, j, k0]] * self.hm[1][[i, j, k0]],
                            None => 0.0,
                        };
                        (hz0 - hz1) - (hy0 - hy1)
                    } else {
                        0.0
                    };
                    self.fields.ex[[i, j, k]] +=
                        w * curl - self.wj[0][[i, j, k]] * self.fields.jx[[i, j, k]];

                    // Ey.
                    let w = self.we[1][[i, j, k]];
                    let curl = if w != 0.0 {
                        let hx0 = self.fields.hx[[i, j, k]] * self.hm[0][[i, j, k]];
                        let hx1 = match prev(k, nz, self.periodic[2]) {
                            Some(k0) => self.fields.hx[[i, j, k0]] * self.hm[0][[i, j, k0]],
                            None => 0.0,
                        };
                        let hz0 = self.fields.hz[[i, j, k]] * self.hm[2][[i, j, k]];
                        let hz1 = match prev(i, nx, self.periodic[0]) {
                            Some(i0) => self.fields.hz[[i0, j, k]] * self.hm[2][[i0, j, k]],
                            None => 0.0,
                        };
                        (hx0 - hx1) - (hz0 - hz1)
                    } else {
                        0.0
                    };
                    self.fields.ey[[i, j, k]] +=
                        w * curl - self.wj[1][[i, j, k]] * self.fields.jy[[i, j, k]];

                    // Ez.
                    let w = self.we[2][[i, j, k]];
                    let curl = if w != 0.0 {
                        let hy0 = self.fields.hy[[i, j, k]] * self.hm[1][[i, j, k]];
                        let hy1 = match prev(i, nx, self.periodic[0]) {
                            Some(i0) => self.fields.hy[[i0, j, k]] * self.hm[1][[i0, j, k]],
                            None => 0.0,
                        };
                        let hx0 = self.fields.hx[[i, j, k]] * self.hm[0][[i, j, k]];
                        let hx1 = match prev(j, ny, self.periodic[1]) {
                            Some(j0) => self.fields.hx[[i, j0, k]] * self.hm[0][[i, j0, k]],
                            None => 0.0,
                        };
                        (hy0 - hy1) - (hx0 - hx1)
                    } else {
                        0.0
                    };
                    self.fields.ez[[i, j, k]] +=
                        w * curl - self.wj[2][[i, j, k]] * self.fields.jz[[i, j, k]];
                }
            }
        }
    }

    /// Zero field components on ghost layers of non-periodic axes.
    ///
    /// The last layer along each axis holds entities whose update stencil
    /// would reach outside the arrays; on a periodic axis the stencil wraps
    /// instead and the layer is real.
    fn zero_ghosts(&mut self) {
        let (nx, ny, nz) = self.fields.dims();
        if !self.periodic[0] {
            self.fields.ex.index_axis_mut(Axis(0), nx - 1).fill(0.0);
            self.fields.hy.index_axis_mut(Axis(0), nx - 1).fill(0.0);
            self.fields.hz.index_axis_mut(Axis(0), nx - 1).fill(0.0);
        }
        if !self.periodic[1] {
            self.fields.ey.index_axis_mut(Axis(1), ny - 1).fill(0.0);
            self.fields.hx.index_axis_mut(Axis(1), ny - 1).fill(0.0);
            self.fields.hz.index_axis_mut(Axis(1), ny - 1).fill(0.0);
        }
        if !self.periodic[2] {
            self.fields.ez.index_axis_mut(Axis(2), nz - 1).fill(0.0);
            self.fields.hx.index_axis_mut(Axis(2), nz - 1).fill(0.0);
            self.fields.hy.index_axis_mut(Axis(2), nz - 1).fill(0.0);
        }
    }

    /// Zero every component frozen by conductor classification or boundary
    /// masking, whatever the initial conditions put there.
    fn zero_frozen(&mut self) {
        let (nx, ny, nz) = self.fields.dims();
        let lengths = self.grid.edge_lengths();
        let planes = self.grid.face_planes();
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    if lengths[0][[i, j, k]] == 0.0 || self.em[0][[i, j, k]] == 0.0 {
                        self.fields.ex[[i, j, k]] = 0.0;
                    }
                    if lengths[1][[i, j, k]] == 0.0 || self.em[1][[i, j, k]] == 0.0 {
                        self.fields.ey[[i, j, k]] = 0.0;
                    }
                    if lengths[2][[i, j, k]] == 0.0 || self.em[2][[i, j, k]] == 0.0 {
                        self.fields.ez[[i, j, k]] = 0.0;
                    }
                    if planes[0].record(i, j, k).is_excluded() || self.hm[0][[i, j, k]] == 0.0 {
                        self.fields.hx[[i, j, k]] = 0.0;
                    }
                    if planes[1].record(i, j, k).is_excluded() || self.hm[1][[i, j, k]] == 0.0 {
                        self.fields.hy[[i, j, k]] = 0.0;
                    }
                    if planes[2].record(i, j, k).is_excluded() || self.hm[2][[i, j, k]] == 0.0 {
                        self.fields.hz[[i, j, k]] = 0.0;
                    }
                }
            }
        }
    }

    // ───────────────────────── diagnostics ─────────────────────────

    /// Discrete field energy, weighted by the true corrected geometric
    /// factors (never the stabilised areas, which exist only for the update
    /// denominator).
    ///
    /// For a lossless vacuum with periodic boundaries this is conserved up
    /// to the leapfrog's bounded oscillation.
    pub fn energy(&self) -> f64 {
        let (nx, ny, nz) = self.fields.dims();
        let lengths = self.grid.edge_lengths();
        let planes = self.grid.face_planes();
        let e_arrays = [&self.fields.ex, &self.fields.ey, &self.fields.ez];
        let h_arrays = [&self.fields.hx, &self.fields.hy, &self.fields.hz];

        let mut energy = 0.0;
        for c in 0..3 {
            for i in 0..nx {
                for j in 0..ny {
                    for k in 0..nz {
                        let l = lengths[c][[i, j, k]];
                        if l > 0.0 {
                            let e = e_arrays[c][[i, j, k]];
                            energy += 0.5 * EPS_0 * e * e * self.grid.ta[c][[i, j, k]] / l;
                        }
                        let record = planes[c].record(i, j, k);
                        let tl = self.grid.tl[c][[i, j, k]];
                        if record.area > 0.0 && tl > 0.0 {
                            let h = h_arrays[c][[i, j, k]];
                            energy += 0.5 * MU_0 * h * h * record.area / tl;
                        }
                    }
                }
            }
        }
        energy
    }

    /// Sample every field component at the configured probe cell.
    pub fn probe_sample(&self) -> ProbeSample {
        let (i, j, k) = self.probe;
        ProbeSample {
            time: self.time,
            ex: self.fields.ex(i, j, k),
            ey: self.fields.ey(i, j, k),
            ez: self.fields.ez(i, j, k),
            hx: self.fields.hx(i, j, k),
            hy: self.fields.hy(i, j, k),
            hz: self.fields.hz(i, j, k),
        }
    }

    // ───────────────────────── accessors ─────────────────────────

    pub fn grid(&self) -> &StaggeredGrid {
        &self.grid
    }

    /// Read access to the field state.
    pub fn fields(&self) -> &FieldState {
        &self.fields
    }

    /// Mutable access to the field state, for initial conditions and
    /// current injection between steps.
    pub fn fields_mut(&mut self) -> &mut FieldState {
        &mut self.fields
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn cfl(&self) -> f64 {
        self.cfl
    }

    /// Simulation time of the E fields.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn boundary_config(&self) -> &BoundaryConfig {
        &self.bc
    }

    pub fn probe(&self) -> (usize, usize, usize) {
        self.probe
    }
}

#[inline]
fn next(i: usize, n: usize, periodic: bool) -> Option<usize> {
    if i + 1 < n {
        Some(i + 1)
    } else if periodic {
        Some(0)
    } else {
        None
    }
}

#[inline]
fn prev(i: usize, n: usize, periodic: bool) -> Option<usize> {
    if i > 0 {
        Some(i - 1)
    } else if periodic {
        Some(n - 1)
    } else {
        None
    }
}

/// Tie the ghost layer's dual factors to the first layer on periodic axes,
/// so the wrap-around entities see the same corrected geometry as their
/// images.
fn apply_periodic_tying(grid: &mut StaggeredGrid, periodic: [bool; 3]) {
    let (nx, ny, nz) = (grid.nx(), grid.ny(), grid.nz());
    if periodic[0] {
        for j in 0..ny {
            for k in 0..nz {
                let l = grid.edge_length_x(0, j, k);
                grid.tl[0][[nx - 1, j, k]] = l;
                let a_zx = grid.faces_zx().stabilised_area(0, j, k);
                grid.ta[1][[nx - 1, j, k]] = a_zx;
                let a_xy = grid.faces_xy().stabilised_area(0, j, k);
                grid.ta[2][[nx - 1, j, k]] = a_xy;
            }
        }
    }
    if periodic[1] {
        for i in 0..nx {
            for k in 0..nz {
                let l = grid.edge_length_y(i, 0, k);
                grid.tl[1][[i, ny - 1, k]] = l;
                let a_yz = grid.faces_yz().stabilised_area(i, 0, k);
                grid.ta[0][[i, ny - 1, k]] = a_yz;
                let a_xy = grid.faces_xy().stabilised_area(i, 0, k);
                grid.ta[2][[i, ny - 1, k]] = a_xy;
            }
        }
    }
    if periodic[2] {
        for i in 0..nx {
            for j in 0..ny {
                let l = grid.edge_length_z(i, j, 0);
                grid.tl[2][[i, j, nz - 1]] = l;
                let a_yz = grid.faces_yz().stabilised_area(i, j, 0);
                grid.ta[0][[i, j, nz - 1]] = a_yz;
                let a_zx = grid.faces_zx().stabilised_area(i, j, 0);
                grid.ta[1][[i, j, nz - 1]] = a_zx;
            }
        }
    }
}

/// Build the PEC/PMC column masks: tangential components zeroed on the
/// configured boundary layers.
fn boundary_masks(
    grid: &StaggeredGrid,
    bc: &BoundaryConfig,
) -> ([Array3<f64>; 3], [Array3<f64>; 3]) {
    let dims = (grid.nx(), grid.ny(), grid.nz());
    let ones = || Array3::from_elem(dims, 1.0);
    let mut em = [ones(), ones(), ones()];
    let mut hm = [ones(), ones(), ones()];
    let n = [dims.0, dims.1, dims.2];

    for axis in 0..3 {
        for (kind, layer) in [(bc.low[axis], 0), (bc.high[axis], n[axis] - 1)] {
            match kind {
                BoundaryKind::Pec => {
                    for (c, mask) in em.iter_mut().enumerate() {
                        if c != axis {
                            mask.index_axis_mut(Axis(axis), layer).fill(0.0);
                        }
                    }
                }
                BoundaryKind::Pmc => {
                    for (c, mask) in hm.iter_mut().enumerate() {
                        if c != axis {
                            mask.index_axis_mut(Axis(axis), layer).fill(0.0);
                        }
                    }
                }
                BoundaryKind::Periodic | BoundaryKind::Pml => {}
            }
        }
    }
    (em, hm)
}

/// Fold geometry, material, and boundary factors into the per-component
/// update coefficients.
fn update_coefficients(
    grid: &StaggeredGrid,
    dt: f64,
    em: &[Array3<f64>; 3],
    hm: &[Array3<f64>; 3],
) -> ([Array3<f64>; 3], [Array3<f64>; 3], [Array3<f64>; 3]) {
    let dims = (grid.nx(), grid.ny(), grid.nz());
    let zeros = || Array3::zeros(dims);
    let mut wh = [zeros(), zeros(), zeros()];
    let mut we = [zeros(), zeros(), zeros()];
    let mut wj = [zeros(), zeros(), zeros()];

    let lengths = grid.edge_lengths();
    let planes = grid.face_planes();
    for c in 0..3 {
        for i in 0..dims.0 {
            for j in 0..dims.1 {
                for k in 0..dims.2 {
                    let record = planes[c].record(i, j, k);
                    // Inverse permeability is zeroed on faces inside a
                    // conductor; excluded faces freeze entirely.
                    if !record.is_excluded() && record.stabilised > 0.0 {
                        wh[c][[i, j, k]] = dt * grid.tl[c][[i, j, k]]
                            / (MU_0 * record.stabilised)
                            * hm[c][[i, j, k]];
                    }

                    let l = lengths[c][[i, j, k]];
                    let inv_eps = if l > 0.0 { 1.0 / EPS_0 } else { 0.0 };
                    let ta = grid.ta[c][[i, j, k]];
                    if ta > 0.0 {
                        we[c][[i, j, k]] = dt * l * inv_eps / ta * em[c][[i, j, k]];
                    }
                    wj[c][[i, j, k]] = dt * inv_eps;
                }
            }
        }
    }
    (wh, we, wj)
}
