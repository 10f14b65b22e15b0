//! Plane-bearing polygon representation for BSP trees.

use nalgebra::{Point3, Vector3};

use crate::split::{split_polygon, Split};
use crate::{Classification, Plane3D, PlaneSide, PolygonError, Real};

/// The kind of primitive a [`Polygon`] stands for.
///
/// Only [`PrimitiveKind::Polygon`] can be cut by a plane. The other kinds keep
/// their anchor points for classification but are routed whole when they
/// span a partition plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// A flat, simple polygon loop (convex or not)
    Polygon,
    /// A single line segment
    Line,
    /// A polyline made of several segments
    MultiSegmentLine,
    /// Any other element anchored in the scene (label, marker, point cloud)
    Element,
}

impl PrimitiveKind {
    /// Minimum number of points a primitive of this kind needs.
    pub fn min_points(self) -> usize {
        match self {
            PrimitiveKind::Polygon => 3,
            PrimitiveKind::Line | PrimitiveKind::MultiSegmentLine => 2,
            PrimitiveKind::Element => 1,
        }
    }

    /// Returns `true` if primitives of this kind can be split by a plane.
    #[inline]
    pub fn is_splittable(self) -> bool {
        self == PrimitiveKind::Polygon
    }
}

/// A primitive in 3D space that carries its own plane.
///
/// For [`PrimitiveKind::Polygon`] the points form a planar loop, with the
/// closing edge from the last point back to the first implied. The plane is
/// stored as a unit normal and an offset `d` such that `normal · p + d ≈ 0`
/// for every point.
///
/// `S` holds the non-geometric attributes (colour, owner, ...) that fragments
/// inherit from the polygon they were cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<S = ()> {
    points: Vec<Point3<Real>>,
    normal: Vector3<Real>,
    d: Real,
    kind: PrimitiveKind,
    metadata: S,
}

impl<S: Clone> Polygon<S> {
    /// Creates a splittable polygon from a loop of points.
    ///
    /// The plane is derived from the first three points (right-hand rule).
    /// When those are collinear the loop's Newell normal is used instead.
    /// Fewer than three points, or a loop without area, leave a zero normal
    /// that [`Polygon::validate`] reports.
    pub fn new(points: Vec<Point3<Real>>, metadata: S) -> Self {
        let mut polygon = Self {
            points,
            normal: Vector3::zeros(),
            d: 0.0,
            kind: PrimitiveKind::Polygon,
            metadata,
        };
        if let &[p0, p1, p2, ..] = polygon.points.as_slice() {
            polygon.calc_normal(p0, p1, p2);
            if polygon.normal == Vector3::zeros() {
                if let Some(normal) = newell_normal(&polygon.points).try_normalize(Real::EPSILON) {
                    polygon.normal = normal;
                    polygon.recalc_offset();
                }
            }
        }
        polygon
    }

    /// Creates a line segment primitive lying in the plane with the given normal.
    pub fn line(start: Point3<Real>, end: Point3<Real>, normal: Vector3<Real>, metadata: S) -> Self {
        Self::with_normal(PrimitiveKind::Line, vec![start, end], normal, metadata)
    }

    /// Creates a polyline primitive lying in the plane with the given normal.
    pub fn multi_segment_line(points: Vec<Point3<Real>>, normal: Vector3<Real>, metadata: S) -> Self {
        Self::with_normal(PrimitiveKind::MultiSegmentLine, points, normal, metadata)
    }

    /// Creates a generic element anchored at `anchors`, facing along `normal`.
    pub fn element(anchors: Vec<Point3<Real>>, normal: Vector3<Real>, metadata: S) -> Self {
        Self::with_normal(PrimitiveKind::Element, anchors, normal, metadata)
    }

    fn with_normal(
        kind: PrimitiveKind,
        points: Vec<Point3<Real>>,
        normal: Vector3<Real>,
        metadata: S,
    ) -> Self {
        let mut polygon = Self {
            points,
            normal: normal.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros),
            d: 0.0,
            kind,
            metadata,
        };
        polygon.recalc_offset();
        polygon
    }

    /// Creates a fragment of `parent` from a new loop of points.
    ///
    /// The fragment keeps the parent's kind, metadata and normal direction;
    /// its offset is recomputed from its own first point.
    pub fn from_parent(points: Vec<Point3<Real>>, parent: &Polygon<S>) -> Self {
        let mut fragment = Self {
            points,
            normal: parent.normal,
            d: parent.d,
            kind: parent.kind,
            metadata: parent.metadata.clone(),
        };
        fragment.recalc_offset();
        fragment
    }

    /// Splits this polygon by a plane into back and front fragments.
    ///
    /// See [`split_polygon`].
    pub fn split(&self, plane: &Plane3D) -> Split<S> {
        split_polygon(self, plane)
    }
}

impl<S> Polygon<S> {
    /// Recomputes normal and offset from three points on the polygon.
    ///
    /// The normal is `(p1 - p0) × (p2 - p0)`, normalized; it is set to zero
    /// when the points are collinear.
    pub fn calc_normal(&mut self, p0: Point3<Real>, p1: Point3<Real>, p2: Point3<Real>) {
        self.normal = (p1 - p0)
            .cross(&(p2 - p0))
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        self.d = -self.normal.dot(&p0.coords);
    }

    /// Recomputes the offset from the current normal and the first point.
    pub fn recalc_offset(&mut self) {
        if let Some(first) = self.points.first() {
            self.d = -self.normal.dot(&first.coords);
        }
    }

    /// Checks that the polygon is usable as BSP geometry.
    pub fn validate(&self) -> Result<(), PolygonError> {
        let required = self.kind.min_points();
        if self.points.len() < required {
            return Err(PolygonError::TooFewPoints {
                kind: self.kind,
                found: self.points.len(),
                required,
            });
        }

        if let Some(index) = self
            .points
            .iter()
            .position(|p| p.coords.iter().any(|c| !c.is_finite()))
        {
            return Err(PolygonError::InvalidCoordinate { index });
        }

        let norm = self.normal.norm();
        if !norm.is_finite() || norm <= Real::EPSILON || !self.d.is_finite() {
            return Err(PolygonError::DegenerateNormal);
        }

        Ok(())
    }

    /// Returns `true` if the polygon cannot take part in a BSP tree.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.validate().is_err()
    }

    /// Returns the points of the polygon.
    #[inline]
    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the polygon has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the unit normal (zero for degenerate polygons).
    #[inline]
    pub fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Returns the plane offset `d`.
    #[inline]
    pub fn d(&self) -> Real {
        self.d
    }

    /// Returns the plane this polygon lies on.
    #[inline]
    pub fn plane(&self) -> Plane3D {
        Plane3D::from_raw_parts(self.normal, self.d)
    }

    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    #[inline]
    pub fn metadata(&self) -> &S {
        &self.metadata
    }

    /// Computes the centroid (average of the points).
    ///
    /// Returns the origin for an empty polygon.
    pub fn centroid(&self) -> Point3<Real> {
        if self.points.is_empty() {
            return Point3::origin();
        }
        let sum: Vector3<Real> = self.points.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.points.len() as Real)
    }

    /// Classifies this polygon relative to a plane.
    ///
    /// Returns:
    /// - `Coplanar` if all points lie on the plane
    /// - `Front` if every point is in front of or on the plane
    /// - `Back` if every point is behind or on the plane
    /// - `Spanning` if points are on both sides
    pub fn classify(&self, plane: &Plane3D) -> Classification {
        let mut front = 0;
        let mut back = 0;
        let mut on_plane = 0;

        for point in &self.points {
            match plane.classify_point(*point) {
                PlaneSide::Front => front += 1,
                PlaneSide::Back => back += 1,
                PlaneSide::OnPlane => on_plane += 1,
            }
            if front > 0 && back > 0 {
                return Classification::Spanning;
            }
        }

        let total = self.points.len();
        if on_plane == total {
            Classification::Coplanar
        } else if front + on_plane == total {
            Classification::Front
        } else {
            Classification::Back
        }
    }
}

/// Area-weighted normal of a point loop (Newell's method).
///
/// Its direction follows the loop's winding even for non-convex loops; its
/// length is twice the loop's area.
pub(crate) fn newell_normal(points: &[Point3<Real>]) -> Vector3<Real> {
    let mut normal = Vector3::zeros();
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

impl<S> From<&Polygon<S>> for Plane3D {
    fn from(polygon: &Polygon<S>) -> Self {
        polygon.plane()
    }
}
