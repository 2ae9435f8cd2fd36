//! Staggered-grid geometry engine.
//!
//! [`StaggeredGrid`] builds the Yee-type staggered mesh over a rectilinear
//! box, classifies every edge and face patch against a conductor, computes
//! the conformally corrected lengths and areas, and (for the
//! [`GridScheme::Conformal`] scheme) runs the ECT borrowing/lending
//! stabilisation pass. Pure geometry and topology; no time dependence.
//!
//! All lattices are `nx × ny × nz`, matching the field layout: the last
//! layer along each axis is the ghost layer, which becomes a real layer
//! when the solver wraps that axis periodically.
//!
//! - `conformal` — membership sampling, cut-fraction bisection, residual
//!   polygon areas.
//! - `ect` — the Enlarged Cell Technique stabilisation pass.

mod conformal;
mod ect;

use ndarray::Array3;

use faraday_geometry::assembly::Conductor;

use crate::types::{ConfigError, GridBounds, GridScheme, StabilisationPolicy};

/// Classification of a face patch relative to the conductor assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    /// Fully outside every conductor; area equals nominal.
    Interior,
    /// Intersected by a conductor surface; area is the residual fraction.
    Cut,
    /// Fully inside a conductor; area is zero and the face is frozen.
    Excluded,
}

/// Everything the grid knows about one face patch.
///
/// `area` is the true conformal area and never changes after
/// classification; `stabilised` is the derived value the solver may divide
/// by, raised by the ECT pass when the true area is dangerously small.
#[derive(Debug, Clone)]
pub struct FaceRecord {
    pub kind: PatchKind,
    /// Full face area of the un-cut grid.
    pub nominal: f64,
    /// Conformally corrected area, `0 <= area <= nominal`.
    pub area: f64,
    /// Area used in the time-update denominator, `>= area`.
    pub stabilised: f64,
    /// Set when the ECT pass could not raise this face to the stability
    /// threshold; the face is then treated as if inside a conductor.
    pub excluded: bool,
    /// `(lender flat index, amount)` transfers received.
    pub borrowed: Vec<(usize, f64)>,
    /// `(borrower flat index, amount)` transfers given.
    pub lent: Vec<(usize, f64)>,
}

impl FaceRecord {
    fn new(kind: PatchKind, nominal: f64, area: f64) -> Self {
        Self {
            kind,
            nominal,
            area,
            stabilised: area,
            excluded: false,
            borrowed: Vec::new(),
            lent: Vec::new(),
        }
    }

    /// Whether the solver must freeze the field component on this face.
    pub fn is_excluded(&self) -> bool {
        self.kind == PatchKind::Excluded || self.excluded
    }
}

/// Tallies of face classifications within one plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceCounts {
    pub interior: usize,
    pub cut: usize,
    pub excluded: usize,
}

/// The arena of face records for one orthogonal plane.
///
/// Records are flat-indexed by `i + nx·(j + ny·k)`; the two in-plane axes
/// (the axes spanning the patch) are fixed per plane, the third is the face
/// normal.
#[derive(Debug, Clone)]
pub struct FacePlane {
    nx: usize,
    ny: usize,
    nz: usize,
    /// In-plane axes (0 = x, 1 = y, 2 = z) and their spacings.
    u_axis: usize,
    v_axis: usize,
    du: f64,
    dv: f64,
    records: Vec<FaceRecord>,
}

impl FacePlane {
    fn new(nx: usize, ny: usize, nz: usize, u_axis: usize, v_axis: usize, du: f64, dv: f64) -> Self {
        Self {
            nx,
            ny,
            nz,
            u_axis,
            v_axis,
            du,
            dv,
            records: Vec::with_capacity(nx * ny * nz),
        }
    }

    /// Flat arena index of the face at `(i, j, k)`.
    #[inline]
    pub fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.nx * (j + self.ny * k)
    }

    /// `(i, j, k)` of a flat arena index.
    #[inline]
    pub fn coords(&self, flat: usize) -> (usize, usize, usize) {
        let i = flat % self.nx;
        let j = (flat / self.nx) % self.ny;
        let k = flat / (self.nx * self.ny);
        (i, j, k)
    }

    /// The record for the face at `(i, j, k)`.
    pub fn record(&self, i: usize, j: usize, k: usize) -> &FaceRecord {
        &self.records[self.flat_index(i, j, k)]
    }

    /// The record at a flat arena index.
    pub fn record_at(&self, flat: usize) -> &FaceRecord {
        &self.records[flat]
    }

    /// True conformal area at `(i, j, k)`.
    pub fn area(&self, i: usize, j: usize, k: usize) -> f64 {
        self.record(i, j, k).area
    }

    /// Stabilised area at `(i, j, k)`.
    pub fn stabilised_area(&self, i: usize, j: usize, k: usize) -> f64 {
        self.record(i, j, k).stabilised
    }

    /// Whether the face at `(i, j, k)` is frozen out of the update.
    pub fn is_excluded(&self, i: usize, j: usize, k: usize) -> bool {
        self.record(i, j, k).is_excluded()
    }

    /// Classification tallies over the whole plane.
    pub fn counts(&self) -> FaceCounts {
        let mut c = FaceCounts::default();
        for r in &self.records {
            match r.kind {
                PatchKind::Interior => c.interior += 1,
                PatchKind::Cut => c.cut += 1,
                PatchKind::Excluded => c.excluded += 1,
            }
        }
        c
    }

    pub(crate) fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// The two axes (0 = x, 1 = y, 2 = z) spanning this plane's patches.
    pub fn in_plane_axes(&self) -> (usize, usize) {
        (self.u_axis, self.v_axis)
    }

    pub(crate) fn in_plane_spacings(&self) -> (f64, f64) {
        (self.du, self.dv)
    }
}

/// The staggered mesh with conformal geometric factors.
#[derive(Debug, Clone)]
pub struct StaggeredGrid {
    bounds: GridBounds,
    nx: usize,
    ny: usize,
    nz: usize,
    dx: f64,
    dy: f64,
    dz: f64,
    scheme: GridScheme,
    policy: StabilisationPolicy,
    /// Conformal primal edge lengths, one lattice per direction.
    l: [Array3<f64>; 3],
    /// Dual edge lengths (nominal spacings; the solver ties the ghost layer
    /// on periodic axes).
    pub(crate) tl: [Array3<f64>; 3],
    /// Dual face areas pierced by each primal edge (nominal; same tying).
    pub(crate) ta: [Array3<f64>; 3],
    /// Face arenas indexed by normal axis: `[yz, zx, xy]`.
    faces: [FacePlane; 3],
}

impl StaggeredGrid {
    /// Build the mesh and classify it against `conductor`.
    ///
    /// The `Conformal` scheme computes cut-cell corrected lengths/areas and
    /// runs the ECT stabilisation pass; `Staircase` keeps or drops each
    /// entity whole. The finished grid is immutable.
    pub fn new(
        bounds: GridBounds,
        nx: usize,
        ny: usize,
        nz: usize,
        conductor: &dyn Conductor,
        scheme: GridScheme,
        policy: StabilisationPolicy,
    ) -> Result<Self, ConfigError> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(ConfigError::InvalidDimensions { nx, ny, nz });
        }
        for (axis, extent) in ['x', 'y', 'z'].into_iter().zip(bounds.extents()) {
            if extent <= 0.0 {
                return Err(ConfigError::InvalidExtent { axis, extent });
            }
        }
        if !(policy.area_threshold > 0.0 && policy.area_threshold < 1.0) {
            return Err(ConfigError::InvalidThreshold(policy.area_threshold));
        }

        let [lx, ly, lz] = bounds.extents();
        let (dx, dy, dz) = (lx / nx as f64, ly / ny as f64, lz / nz as f64);

        let mut grid = Self {
            bounds,
            nx,
            ny,
            nz,
            dx,
            dy,
            dz,
            scheme,
            policy,
            l: [
                Array3::zeros((nx, ny, nz)),
                Array3::zeros((nx, ny, nz)),
                Array3::zeros((nx, ny, nz)),
            ],
            tl: [
                Array3::from_elem((nx, ny, nz), dx),
                Array3::from_elem((nx, ny, nz), dy),
                Array3::from_elem((nx, ny, nz), dz),
            ],
            ta: [
                Array3::from_elem((nx, ny, nz), dy * dz),
                Array3::from_elem((nx, ny, nz), dz * dx),
                Array3::from_elem((nx, ny, nz), dx * dy),
            ],
            faces: [
                FacePlane::new(nx, ny, nz, 1, 2, dy, dz),
                FacePlane::new(nx, ny, nz, 2, 0, dz, dx),
                FacePlane::new(nx, ny, nz, 0, 1, dx, dy),
            ],
        };

        grid.classify(conductor);
        if scheme == GridScheme::Conformal {
            for plane in &mut grid.faces {
                ect::stabilise_plane(plane, &policy);
            }
        }

        Ok(grid)
    }

    fn classify(&mut self, conductor: &dyn Conductor) {
        conformal::classify_edges(self, conductor);
        conformal::classify_faces(self, conductor);
    }

    // ───────────────────────── coordinates ─────────────────────────

    /// x coordinate of node layer `i`.
    #[inline]
    pub fn node_x(&self, i: usize) -> f64 {
        self.bounds.xmin + i as f64 * self.dx
    }

    /// y coordinate of node layer `j`.
    #[inline]
    pub fn node_y(&self, j: usize) -> f64 {
        self.bounds.ymin + j as f64 * self.dy
    }

    /// z coordinate of node layer `k`.
    #[inline]
    pub fn node_z(&self, k: usize) -> f64 {
        self.bounds.zmin + k as f64 * self.dz
    }

    // ───────────────────────── accessors ─────────────────────────

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn dz(&self) -> f64 {
        self.dz
    }

    pub fn scheme(&self) -> GridScheme {
        self.scheme
    }

    pub fn policy(&self) -> &StabilisationPolicy {
        &self.policy
    }

    /// Conformal length of the x-directed edge starting at node `(i, j, k)`.
    #[inline]
    pub fn edge_length_x(&self, i: usize, j: usize, k: usize) -> f64 {
        self.l[0][[i, j, k]]
    }

    /// Conformal length of the y-directed edge starting at node `(i, j, k)`.
    #[inline]
    pub fn edge_length_y(&self, i: usize, j: usize, k: usize) -> f64 {
        self.l[1][[i, j, k]]
    }

    /// Conformal length of the z-directed edge starting at node `(i, j, k)`.
    #[inline]
    pub fn edge_length_z(&self, i: usize, j: usize, k: usize) -> f64 {
        self.l[2][[i, j, k]]
    }

    /// Faces normal to x (carrying Hx).
    pub fn faces_yz(&self) -> &FacePlane {
        &self.faces[0]
    }

    /// Faces normal to y (carrying Hy).
    pub fn faces_zx(&self) -> &FacePlane {
        &self.faces[1]
    }

    /// Faces normal to z (carrying Hz).
    pub fn faces_xy(&self) -> &FacePlane {
        &self.faces[2]
    }

    pub(crate) fn edge_lengths(&self) -> &[Array3<f64>; 3] {
        &self.l
    }

    pub(crate) fn edge_lengths_mut(&mut self) -> &mut [Array3<f64>; 3] {
        &mut self.l
    }

    pub(crate) fn face_planes(&self) -> &[FacePlane; 3] {
        &self.faces
    }

    pub(crate) fn face_planes_mut(&mut self) -> &mut [FacePlane; 3] {
        &mut self.faces
    }

    /// Nominal spacings indexed by axis.
    pub fn spacings(&self) -> [f64; 3] {
        [self.dx, self.dy, self.dz]
    }
}
