//! Plane representation and point classification.

use nalgebra::{Point3, Vector3};

use crate::Real;

/// Tolerance for plane classification.
/// Points within this distance of the plane are considered "on" the plane.
pub const PLANE_EPSILON: Real = 0.0005;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Every vertex is in front of or on the plane
    Front,
    /// Every vertex is behind or on the plane
    Back,
    /// All vertices are on the plane (coplanar)
    Coplanar,
    /// Vertices are on both sides (spans the plane)
    Spanning,
}

/// A plane in 3D space, represented as `normal · point + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3D {
    normal: Vector3<Real>,
    d: Real,
}

impl Plane3D {
    /// Creates a new plane from a normal vector and offset.
    /// The normal (and offset) are rescaled so the normal has unit length.
    ///
    /// Returns `None` if the normal vector has zero length.
    pub fn new(normal: Vector3<Real>, d: Real) -> Option<Self> {
        let norm = normal.norm();
        if !norm.is_finite() || norm <= Real::EPSILON {
            return None;
        }
        Some(Self {
            normal: normal / norm,
            d: d / norm,
        })
    }

    /// Creates a plane through `point` with the given normal direction.
    ///
    /// Returns `None` if the normal vector has zero length.
    pub fn from_point_and_normal(point: Point3<Real>, normal: Vector3<Real>) -> Option<Self> {
        let unit_normal = normal.try_normalize(Real::EPSILON)?;
        Some(Self {
            normal: unit_normal,
            d: -unit_normal.dot(&point.coords),
        })
    }

    /// Creates a plane from three points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// Returns `None` if the points are collinear (or nearly so).
    pub fn from_three_points(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a));
        Self::from_point_and_normal(a, normal)
    }

    /// Wraps an already normalized normal and offset without checking them.
    pub(crate) fn from_raw_parts(normal: Vector3<Real>, d: Real) -> Self {
        Self { normal, d }
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Returns the plane offset `d`, so that `normal · p + d == 0` on the plane.
    #[inline]
    pub fn d(&self) -> Real {
        self.d
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: Point3<Real>) -> Real {
        self.normal.dot(&point.coords) + self.d
    }

    /// Classifies which side of the plane a point lies on, using [`PLANE_EPSILON`].
    pub fn classify_point(&self, point: Point3<Real>) -> PlaneSide {
        let behind = -self.d - self.normal.dot(&point.coords);
        if behind > PLANE_EPSILON {
            PlaneSide::Back
        } else if behind < -PLANE_EPSILON {
            PlaneSide::Front
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Projects a point onto the plane (finds the closest point on the plane).
    #[inline]
    pub fn project_point(&self, point: Point3<Real>) -> Point3<Real> {
        point - self.normal * self.signed_distance(point)
    }

    /// Intersects the line through `b` and `c` with the plane.
    ///
    /// The result is `c + t * (b - c)`. Returns `None` when the edge runs
    /// parallel to the plane.
    pub fn intersect_edge(&self, b: Point3<Real>, c: Point3<Real>) -> Option<Point3<Real>> {
        let edge = b - c;
        let denom = self.normal.dot(&edge);
        if denom.abs() < Real::EPSILON {
            return None;
        }

        let on_plane = self.normal * -self.d;
        let t = self.normal.dot(&(on_plane - c.coords)) / denom;
        Some(c + edge * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn z_plane() -> Plane3D {
        Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 0.0).unwrap()
    }

    #[test]
    fn new_normalizes_normal_and_offset() {
        let plane = Plane3D::new(Vector3::new(0.0, 2.0, 0.0), -4.0).unwrap();
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(plane.d(), -2.0);
        assert_eq!(plane.classify_point(Point3::new(5.0, 2.0, -3.0)), PlaneSide::OnPlane);
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(Plane3D::new(Vector3::zeros(), 1.0).is_none());
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(Plane3D::from_three_points(p, p, Point3::new(2.0, 2.0, 2.0)).is_none());
    }

    #[test]
    fn from_three_points_follows_winding() {
        let plane = Plane3D::from_three_points(
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
        )
        .unwrap();
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.d(), -2.0);
    }

    #[test]
    fn classify_point_sides() {
        let plane = z_plane();
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, 1.0)), PlaneSide::Front);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, -1.0)), PlaneSide::Back);
        assert_eq!(plane.classify_point(Point3::new(3.0, -2.0, 0.0)), PlaneSide::OnPlane);
    }

    #[test]
    fn classify_point_tolerance() {
        let plane = z_plane();
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, 0.0004)), PlaneSide::OnPlane);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, -0.0004)), PlaneSide::OnPlane);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, 0.0006)), PlaneSide::Front);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, -0.0006)), PlaneSide::Back);
    }

    #[test]
    fn project_point_lands_on_plane() {
        let plane = Plane3D::new(Vector3::new(1.0, 1.0, 0.0), -1.0).unwrap();
        let projected = plane.project_point(Point3::new(3.0, 2.0, 7.0));
        assert_relative_eq!(plane.signed_distance(projected), 0.0, epsilon = 1e-12);
        assert_relative_eq!(projected.z, 7.0);
    }

    #[test]
    fn intersect_edge_midpoint() {
        let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), -0.5).unwrap();
        let hit = plane
            .intersect_edge(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(hit, Point3::new(0.5, 0.0, 0.0), epsilon = 1e-12);

        let hit = plane
            .intersect_edge(Point3::new(1.0, 1.0, 0.0), Point3::new(-1.0, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(hit, Point3::new(0.5, 0.75, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn intersect_edge_parallel() {
        let plane = z_plane();
        assert!(
            plane
                .intersect_edge(Point3::new(0.0, 0.0, 1.0), Point3::new(5.0, 0.0, 1.0))
                .is_none()
        );
    }
}
