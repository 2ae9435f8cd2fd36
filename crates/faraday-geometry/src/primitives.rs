//! Parametric solid primitives.
//!
//! Each primitive defines a closed volume in 3D space with an inclusive
//! point-membership test. A point lying exactly on the boundary counts as
//! inside: the grid classifies coincident surfaces conservatively, so the
//! membership test must never report a boundary point as free space.

use serde::{Deserialize, Serialize};

/// A solid conductor volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Solid {
    Sphere(Sphere),
    Cuboid(Cuboid),
    HalfSpace(HalfSpace),
}

/// A sphere defined by its centre and radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sphere {
    /// Centre position (m).
    pub centre: [f64; 3],
    /// Radius (m).
    pub radius: f64,
}

/// An axis-aligned cuboid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cuboid {
    /// Centre position (m).
    pub centre: [f64; 3],
    /// Half-extents along x, y, z (m).
    pub half_extents: [f64; 3],
}

/// A half-space bounded by a plane.
///
/// The solid occupies the side the normal points *away* from: a point `q`
/// is inside when `(q - point) · normal <= 0`. Six half-spaces with inward
/// normals bound a (possibly rotated) prism-shaped cavity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalfSpace {
    /// A point on the bounding plane (m).
    pub point: [f64; 3],
    /// Plane normal, pointing out of the solid. Need not be normalised.
    pub normal: [f64; 3],
}

impl Solid {
    /// Check whether a point lies inside this solid (boundary inclusive).
    pub fn contains(&self, point: &[f64; 3]) -> bool {
        match self {
            Solid::Sphere(s) => {
                let dx = point[0] - s.centre[0];
                let dy = point[1] - s.centre[1];
                let dz = point[2] - s.centre[2];
                dx * dx + dy * dy + dz * dz <= s.radius * s.radius
            }
            Solid::Cuboid(c) => {
                (point[0] - c.centre[0]).abs() <= c.half_extents[0]
                    && (point[1] - c.centre[1]).abs() <= c.half_extents[1]
                    && (point[2] - c.centre[2]).abs() <= c.half_extents[2]
            }
            Solid::HalfSpace(h) => {
                let dx = point[0] - h.point[0];
                let dy = point[1] - h.point[1];
                let dz = point[2] - h.point[2];
                dx * h.normal[0] + dy * h.normal[1] + dz * h.normal[2] <= 0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_containment() {
        let s = Solid::Sphere(Sphere {
            centre: [1.0, 0.0, 0.0],
            radius: 0.5,
        });
        assert!(s.contains(&[1.0, 0.0, 0.0]));
        assert!(s.contains(&[1.4, 0.0, 0.0]));
        assert!(!s.contains(&[1.6, 0.0, 0.0]));
    }

    #[test]
    fn test_boundary_point_is_inside() {
        // Coincident surfaces classify as conductor, so <= not <.
        let s = Solid::Sphere(Sphere {
            centre: [0.0, 0.0, 0.0],
            radius: 1.0,
        });
        assert!(s.contains(&[1.0, 0.0, 0.0]));

        let c = Solid::Cuboid(Cuboid {
            centre: [0.0, 0.0, 0.0],
            half_extents: [1.0, 1.0, 1.0],
        });
        assert!(c.contains(&[1.0, 1.0, 1.0]));

        let h = Solid::HalfSpace(HalfSpace {
            point: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
        });
        assert!(h.contains(&[5.0, -2.0, 0.0]));
    }

    #[test]
    fn test_half_space_sides() {
        let h = Solid::HalfSpace(HalfSpace {
            point: [0.0, 0.0, 1.0],
            normal: [0.0, 0.0, 1.0],
        });
        assert!(h.contains(&[0.0, 0.0, 0.5]));
        assert!(!h.contains(&[0.0, 0.0, 1.5]));
    }

    #[test]
    fn test_solid_toml_round_trip() {
        let s = Solid::Cuboid(Cuboid {
            centre: [0.1, 0.2, 0.3],
            half_extents: [0.4, 0.5, 0.6],
        });
        let text = toml::to_string(&s).unwrap();
        let back: Solid = toml::from_str(&text).unwrap();
        match back {
            Solid::Cuboid(c) => {
                assert_eq!(c.centre, [0.1, 0.2, 0.3]);
                assert_eq!(c.half_extents, [0.4, 0.5, 0.6]);
            }
            other => panic!("expected cuboid, got {:?}", other),
        }
    }
}
