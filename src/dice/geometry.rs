//! Collision geometry for cubes in an open box
//!
//! The box is four walls plus a floor, each an axis-aligned plane with an
//! inward normal. Contact is found from the cube's support set: the rotated
//! corners that reach furthest against the plane normal.

use glam::{Quat, Vec3};
use thiserror::Error;

/// Corners of a unit cube in local space
pub const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

/// Corners within this fraction of the die size of the deepest one count
/// as touching (face and edge contacts)
const SUPPORT_TOLERANCE: f32 = 0.05;

/// A bounding plane: points with `p·normal >= offset` are inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the box
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    pub const fn new(normal: Vec3, offset: f32) -> Self {
        Self { normal, offset }
    }

    /// Signed distance from the plane to a point (positive inside)
    #[inline]
    pub fn distance(&self, p: Vec3) -> f32 {
        p.dot(self.normal) - self.offset
    }
}

/// The five planes of a `width` x `height` box: walls x=0, x=width, y=0,
/// y=height, then the floor z=0
pub fn box_planes(width: f32, height: f32) -> [Plane; 5] {
    [
        Plane::new(Vec3::X, 0.0),
        Plane::new(Vec3::NEG_X, -width),
        Plane::new(Vec3::Y, 0.0),
        Plane::new(Vec3::NEG_Y, -height),
        Plane::new(Vec3::Z, 0.0),
    ]
}

/// Contact information for a cube pressed against a plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Support {
    /// Centroid of the touching corners, relative to the cube centre
    pub point: Vec3,
    /// Projection of the deepest corner on the normal (negative)
    pub depth: f32,
}

/// Find the support set of a cube (half edge `size`, rotated by `rotation`)
/// against `normal`
pub fn support(rotation: Quat, size: f32, normal: Vec3) -> Support {
    let corners = CUBE_CORNERS.map(|c| rotation * (c * size));
    let depth = corners
        .iter()
        .map(|c| c.dot(normal))
        .fold(f32::INFINITY, f32::min);

    let tolerance = SUPPORT_TOLERANCE * size;
    let (sum, count) = corners
        .iter()
        .filter(|c| c.dot(normal) <= depth + tolerance)
        .fold((Vec3::ZERO, 0.0_f32), |(sum, n), c| (sum + *c, n + 1.0));

    Support {
        point: sum / count.max(1.0),
        depth,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Fractional power of a rotation failed
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PowerError {
    #[error("rotation {0:?} is not finite")]
    NonFiniteInput(Quat),
    #[error("rotation {rotation:?} raised to {exponent} is not a unit quaternion")]
    Degenerate { rotation: Quat, exponent: f32 },
}

/// Raise a rotation quaternion to a real power: same axis, angle scaled by
/// `t`. Uses the shortest arc, so `q` and `-q` give the same result.
pub fn quat_pow(q: Quat, t: f32) -> Result<Quat, PowerError> {
    if !q.is_finite() || !t.is_finite() {
        return Err(PowerError::NonFiniteInput(q));
    }
    let len = q.length();
    if len < 1e-6 {
        return Err(PowerError::Degenerate {
            rotation: q,
            exponent: t,
        });
    }
    let q = q / len;
    let q = if q.w < 0.0 { -q } else { q };

    let sin_half = q.xyz().length();
    if sin_half < 1e-7 {
        return Ok(Quat::IDENTITY);
    }
    let axis = q.xyz() / sin_half;
    let angle = 2.0 * sin_half.atan2(q.w);
    let out = Quat::from_axis_angle(axis, angle * t);

    if out.is_finite() && out.is_normalized() {
        Ok(out)
    } else {
        Err(PowerError::Degenerate {
            rotation: q,
            exponent: t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation_angle;
    use std::f32::consts::PI;

    #[test]
    fn test_plane_distance() {
        let planes = box_planes(100.0, 50.0);
        let p = Vec3::new(10.0, 20.0, 5.0);
        assert_eq!(planes[0].distance(p), 10.0);
        assert_eq!(planes[1].distance(p), 90.0);
        assert_eq!(planes[2].distance(p), 20.0);
        assert_eq!(planes[3].distance(p), 30.0);
        assert_eq!(planes[4].distance(p), 5.0);
    }

    #[test]
    fn test_reflect_velocity() {
        let v = Vec3::new(3.0, 0.0, -5.0);
        let r = reflect(v, Vec3::Z);
        assert!((r - Vec3::new(3.0, 0.0, 5.0)).length() < 1e-6);
    }

    #[test]
    fn test_support_face_contact_is_centered() {
        // Flat cube against the floor: whole bottom face touches
        let s = support(Quat::IDENTITY, 2.0, Vec3::Z);
        assert!((s.depth + 2.0).abs() < 1e-6);
        assert!((s.point - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_support_corner_contact() {
        // Tip the (1,1,1) corner straight down
        let rot = Quat::from_rotation_arc(Vec3::ONE.normalize(), Vec3::NEG_Z);
        let s = support(rot, 1.0, Vec3::Z);
        assert!((s.depth + 3.0_f32.sqrt()).abs() < 1e-5);
        // Single corner, directly below the centre
        assert!(s.point.truncate().length() < 1e-4);
    }

    #[test]
    fn test_quat_pow_scales_angle() {
        let q = Quat::from_rotation_y(1.2);
        let half = quat_pow(q, 0.5).unwrap();
        assert!((rotation_angle(half) - 0.6).abs() < 1e-5);
        assert!((half * half).abs_diff_eq(q, 1e-5));
    }

    #[test]
    fn test_quat_pow_identity_and_negated() {
        assert_eq!(quat_pow(Quat::IDENTITY, 0.3).unwrap(), Quat::IDENTITY);
        let q = Quat::from_rotation_x(0.8);
        let a = quat_pow(q, 0.25).unwrap();
        let b = quat_pow(-q, 0.25).unwrap();
        assert!(a.abs_diff_eq(b, 1e-6));
    }

    #[test]
    fn test_quat_pow_near_half_turn() {
        let q = Quat::from_rotation_z(PI - 1e-4);
        let out = quat_pow(q, 1.0 / 60.0).unwrap();
        assert!(out.is_normalized());
    }

    #[test]
    fn test_quat_pow_rejects_nan() {
        let q = Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0);
        assert!(matches!(quat_pow(q, 0.5), Err(PowerError::NonFiniteInput(_))));
        let zero = Quat::from_xyzw(0.0, 0.0, 0.0, 0.0);
        assert!(quat_pow(zero, 0.5).is_err());
    }
}
