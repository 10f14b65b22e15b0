//! Polygon splitting against a partition plane.
//!
//! The splitter handles non-convex polygons that cross the plane several
//! times. It walks the boundary once, inserting a vertex wherever an edge
//! crosses the plane, and collects the crossing vertices separately for the
//! back and the front side. Each list is sorted along the line where the
//! plane meets the polygon's own plane and paired two at a time, so every
//! pair bounds a chord that lies inside the polygon. Each side's loops are
//! then cut out of the ring by jumping across pairs and following the
//! boundary on that side.

use log::trace;
use nalgebra::{Point3, Vector3};

use crate::polygon::newell_normal;
use crate::{Plane3D, PlaneSide, Polygon, Real};

/// Fragments produced by splitting a polygon with a plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<S = ()> {
    /// Pieces behind the plane
    pub back: Vec<Polygon<S>>,
    /// Pieces in front of the plane
    pub front: Vec<Polygon<S>>,
}

/// Side of the plane a cut pass extracts loops for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CutSide {
    Back,
    Front,
}

impl CutSide {
    /// Vertices strictly on this side.
    fn side(self) -> PlaneSide {
        match self {
            CutSide::Back => PlaneSide::Back,
            CutSide::Front => PlaneSide::Front,
        }
    }

    /// Vertices a loop on this side must never include.
    fn excluded(self) -> PlaneSide {
        match self {
            CutSide::Back => PlaneSide::Front,
            CutSide::Front => PlaneSide::Back,
        }
    }
}

/// Per-side pairing state of a ring vertex.
#[derive(Debug, Clone, Copy, Default)]
struct CutState {
    /// Ring index of the paired crossing; `Some` marks a crossing vertex.
    pair: Option<usize>,
    consumed: bool,
}

/// A vertex of the augmented ring: the polygon's points plus inserted
/// plane crossings.
#[derive(Debug, Clone, Copy)]
struct RingVertex {
    point: Point3<Real>,
    side: PlaneSide,
    back: CutState,
    front: CutState,
}

impl RingVertex {
    fn new(point: Point3<Real>, side: PlaneSide) -> Self {
        Self {
            point,
            side,
            back: CutState::default(),
            front: CutState::default(),
        }
    }

    fn cut(&self, side: CutSide) -> &CutState {
        match side {
            CutSide::Back => &self.back,
            CutSide::Front => &self.front,
        }
    }

    fn cut_mut(&mut self, side: CutSide) -> &mut CutState {
        match side {
            CutSide::Back => &mut self.back,
            CutSide::Front => &mut self.front,
        }
    }
}

/// Splits a polygon by a plane into back and front fragments.
///
/// Primitives that cannot be split (lines, polylines, elements) are returned
/// whole on both sides. A polygon crossing the plane several times yields
/// several fragments per side. Fragments keep the parent's metadata and
/// facing; loops with fewer than three points or no area are dropped.
///
/// The result for a polygon lying entirely on one side of the plane is
/// unspecified; callers classify first and only split spanning polygons.
pub fn split_polygon<S: Clone>(polygon: &Polygon<S>, plane: &Plane3D) -> Split<S> {
    if !polygon.kind().is_splittable() {
        return Split {
            back: vec![polygon.clone()],
            front: vec![polygon.clone()],
        };
    }

    let points = polygon.points();
    let n = points.len();
    let sides: Vec<PlaneSide> = points.iter().map(|p| plane.classify_point(*p)).collect();

    let mut ring: Vec<RingVertex> = Vec::with_capacity(n + 4);
    let mut back_crossings = Vec::new();
    let mut front_crossings = Vec::new();

    for i in 0..n {
        let next = (i + 1) % n;
        let (b, c) = (sides[i], sides[next]);
        ring.push(RingVertex::new(points[i], b));

        if b != c && b != PlaneSide::OnPlane && c != PlaneSide::OnPlane {
            // Both ends are beyond the tolerance band, so the edge is never
            // parallel to the plane here; the guard only protects against
            // non-finite input.
            if let Some(hit) = plane.intersect_edge(points[i], points[next]) {
                back_crossings.push(ring.len());
                front_crossings.push(ring.len());
                ring.push(RingVertex::new(hit, PlaneSide::OnPlane));
            }
        } else if b == PlaneSide::OnPlane {
            let a = sides[(i + n - 1) % n];
            let index = ring.len() - 1;
            match (a, c) {
                (PlaneSide::OnPlane, PlaneSide::OnPlane) => {}
                (PlaneSide::OnPlane, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::OnPlane) => {
                    back_crossings.push(index)
                }
                (PlaneSide::OnPlane, PlaneSide::Front) | (PlaneSide::Front, PlaneSide::OnPlane) => {
                    front_crossings.push(index)
                }
                // touches the plane without crossing it
                (a, c) if a == c => {}
                _ => {
                    back_crossings.push(index);
                    front_crossings.push(index);
                }
            }
        }
    }

    let cut_direction = polygon.normal().cross(&plane.normal());
    pair_crossings(&mut ring, &back_crossings, CutSide::Back, &cut_direction);
    pair_crossings(&mut ring, &front_crossings, CutSide::Front, &cut_direction);

    let back = cut_out(&mut ring, &back_crossings, CutSide::Back, polygon);
    let front = cut_out(&mut ring, &front_crossings, CutSide::Front, polygon);

    trace!(
        "split {}-point polygon into {} back / {} front fragments (ring of {})",
        n,
        back.len(),
        front.len(),
        ring.len()
    );

    Split { back, front }
}

/// Pairs crossings two at a time in their order along `direction`.
///
/// Along the cut line a simple polygon's boundary alternates between
/// entering and leaving, so neighbouring crossings bound the chords.
/// A trailing unpaired crossing stays an ordinary vertex.
fn pair_crossings(
    ring: &mut [RingVertex],
    crossings: &[usize],
    side: CutSide,
    direction: &Vector3<Real>,
) {
    let position = |i: usize| direction.dot(&ring[i].point.coords);
    let mut ordered = crossings.to_vec();
    ordered.sort_by(|&a, &b| position(a).total_cmp(&position(b)));

    for pair in ordered.chunks_exact(2) {
        let (first, second) = (pair[0], pair[1]);
        ring[first].cut_mut(side).pair = Some(second);
        ring[second].cut_mut(side).pair = Some(first);
    }
}

/// Extracts every loop on `side`, starting from each not yet consumed crossing.
fn cut_out<S: Clone>(
    ring: &mut [RingVertex],
    crossings: &[usize],
    side: CutSide,
    parent: &Polygon<S>,
) -> Vec<Polygon<S>> {
    let mut fragments = Vec::new();

    for &start in crossings {
        let state = ring[start].cut(side);
        if state.pair.is_none() || state.consumed {
            continue;
        }

        let points = walk_loop(ring, start, side);
        if points.len() <= 2 {
            trace!("dropping {:?} loop with {} points", side, points.len());
            continue;
        }

        if let Some(fragment) = make_fragment(points, parent) {
            fragments.push(fragment);
        }
    }

    fragments
}

/// Walks one closed loop on `side` starting at a crossing vertex.
///
/// Every step consumes a vertex that was not consumed before, so the walk
/// ends after at most `ring.len()` steps.
fn walk_loop(ring: &mut [RingVertex], start: usize, side: CutSide) -> Vec<Point3<Real>> {
    let n = ring.len();
    let mut points = Vec::new();
    let mut current = start;

    loop {
        ring[current].cut_mut(side).consumed = true;
        points.push(ring[current].point);

        let prev = (current + n - 1) % n;
        let next = (current + 1) % n;
        let open = |i: usize| !ring[i].cut(side).consumed;

        let step = match ring[current].cut(side).pair {
            Some(partner) if open(partner) => Some(partner),
            Some(_) => [prev, next]
                .into_iter()
                .find(|&i| open(i) && ring[i].side == side.side()),
            None => [prev, next]
                .into_iter()
                .find(|&i| open(i) && ring[i].side != side.excluded()),
        };

        match step {
            Some(i) => current = i,
            None => break,
        }
    }

    points
}

/// Builds a fragment facing the same way as its parent, or `None` for a
/// loop without area.
fn make_fragment<S: Clone>(
    mut points: Vec<Point3<Real>>,
    parent: &Polygon<S>,
) -> Option<Polygon<S>> {
    let area_normal = newell_normal(&points);
    if area_normal.norm() <= Real::EPSILON {
        trace!("dropping zero-area loop with {} points", points.len());
        return None;
    }
    if area_normal.dot(&parent.normal()) < 0.0 {
        points.reverse();
    }

    let fragment = Polygon::from_parent(points, parent);
    match fragment.validate() {
        Ok(()) => Some(fragment),
        Err(err) => {
            trace!("dropping fragment: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Classification, PrimitiveKind};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn polygon_xy(points: &[(Real, Real)]) -> Polygon<&'static str> {
        Polygon::new(
            points.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect(),
            "parent",
        )
    }

    fn unit_square() -> Polygon<&'static str> {
        polygon_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    fn x_range<S>(polygon: &Polygon<S>) -> (Real, Real) {
        polygon
            .points()
            .iter()
            .fold((Real::INFINITY, Real::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            })
    }

    fn assert_fragments_valid<S>(split: &Split<S>, plane: &Plane3D) {
        for fragment in &split.back {
            assert!(fragment.len() >= 3);
            assert!(fragment.validate().is_ok());
            assert_ne!(fragment.classify(plane), Classification::Spanning);
            assert_ne!(fragment.classify(plane), Classification::Front);
        }
        for fragment in &split.front {
            assert!(fragment.len() >= 3);
            assert!(fragment.validate().is_ok());
            assert_ne!(fragment.classify(plane), Classification::Spanning);
            assert_ne!(fragment.classify(plane), Classification::Back);
        }
    }

    #[test]
    fn square_split_in_half() {
        let square = unit_square();
        let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), -0.5).unwrap();

        let split = square.split(&plane);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front.len(), 1);

        let back = &split.back[0];
        let front = &split.front[0];
        assert_eq!(back.len(), 4);
        assert_eq!(front.len(), 4);

        let (lo, hi) = x_range(back);
        assert_relative_eq!(lo, 0.0);
        assert_relative_eq!(hi, 0.5);
        let (lo, hi) = x_range(front);
        assert_relative_eq!(lo, 0.5);
        assert_relative_eq!(hi, 1.0);

        assert_fragments_valid(&split, &plane);
    }

    #[test]
    fn fragments_inherit_metadata_and_facing() {
        let square = unit_square();
        let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), -0.5).unwrap();

        let split = square.split(&plane);
        for fragment in split.back.iter().chain(split.front.iter()) {
            assert_eq!(*fragment.metadata(), "parent");
            assert_relative_eq!(fragment.normal(), square.normal());
            assert_relative_eq!(fragment.d(), square.d());
            assert!(newell_normal(fragment.points()).dot(&square.normal()) > 0.0);
        }
    }

    #[test]
    fn diagonal_split_through_vertices() {
        let square = unit_square();
        // x - y = 0 passes through (0,0) and (1,1)
        let plane = Plane3D::new(Vector3::new(1.0, -1.0, 0.0), 0.0).unwrap();

        let split = square.split(&plane);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front.len(), 1);
        assert_eq!(split.back[0].len(), 3);
        assert_eq!(split.front[0].len(), 3);

        assert!(split.back[0].points().contains(&Point3::new(0.0, 1.0, 0.0)));
        assert!(split.front[0].points().contains(&Point3::new(1.0, 0.0, 0.0)));
        assert_fragments_valid(&split, &plane);
    }

    #[test]
    fn triangle_with_vertex_on_plane() {
        // Apex on the plane x = 0, base crossing it.
        let triangle = polygon_xy(&[(0.0, 2.0), (-1.0, 0.0), (1.0, 0.0)]);
        let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 0.0).unwrap();

        let split = triangle.split(&plane);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front.len(), 1);
        assert_eq!(split.back[0].len(), 3);
        assert_eq!(split.front[0].len(), 3);
        assert_fragments_valid(&split, &plane);
    }

    #[test]
    fn edge_lying_on_plane() {
        // Pentagon whose edge (1,0)-(2,0) lies on y = 0.
        let pentagon = polygon_xy(&[(0.0, -1.0), (1.0, 0.0), (2.0, 0.0), (3.0, 1.0), (1.5, 2.0)]);
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0).unwrap();
        assert_eq!(pentagon.classify(&plane), Classification::Spanning);

        let split = pentagon.split(&plane);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front.len(), 1);
        assert_fragments_valid(&split, &plane);

        let back_ys: Vec<Real> = split.back[0].points().iter().map(|p| p.y).collect();
        assert!(back_ys.iter().all(|&y| y <= 1e-9));
        assert!(back_ys.contains(&-1.0));
    }

    #[test]
    fn non_convex_polygon_yields_several_front_loops() {
        // A "U": the plane y = 2 cuts both arms.
        let u_shape = polygon_xy(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 3.0),
            (2.0, 3.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (0.0, 3.0),
        ]);
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), -2.0).unwrap();

        let split = u_shape.split(&plane);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front.len(), 2);
        assert_eq!(split.back[0].len(), 8);
        for arm in &split.front {
            assert_eq!(arm.len(), 4);
            let area = newell_normal(arm.points()).norm() / 2.0;
            assert_relative_eq!(area, 1.0, epsilon = 1e-9);
        }

        let back_area = newell_normal(split.back[0].points()).norm() / 2.0;
        assert_relative_eq!(back_area, 5.0, epsilon = 1e-9);
        assert_fragments_valid(&split, &plane);
    }

    #[test]
    fn tilted_polygon_split_keeps_points_on_parent_plane() {
        let polygon: Polygon = Polygon::new(
            vec![
                Point3::new(-1.0, -1.0, -1.0),
                Point3::new(1.0, -1.0, 1.0),
                Point3::new(1.0, 1.0, 1.0),
                Point3::new(-1.0, 1.0, -1.0),
            ],
            (),
        );
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0).unwrap();

        let split = polygon.split(&plane);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front.len(), 1);
        for fragment in split.back.iter().chain(split.front.iter()) {
            for p in fragment.points() {
                assert_relative_eq!(polygon.plane().signed_distance(*p), 0.0, epsilon = 1e-9);
            }
        }
        assert_fragments_valid(&split, &plane);
    }

    fn area<S>(polygon: &Polygon<S>) -> Real {
        newell_normal(polygon.points()).norm() / 2.0
    }

    fn total_area<S>(fragments: &[Polygon<S>]) -> Real {
        fragments.iter().map(area).sum()
    }

    #[test]
    fn comb_starting_on_a_tooth_cuts_every_tooth() {
        // Three teeth on a 5x1 bar; the ring starts at the top of the first
        // tooth, so the first and last crossings found bound the same chord.
        let comb = polygon_xy(&[
            (0.0, 3.0),
            (0.0, 0.0),
            (5.0, 0.0),
            (5.0, 3.0),
            (4.0, 3.0),
            (4.0, 1.0),
            (3.0, 1.0),
            (3.0, 3.0),
            (2.0, 3.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
        ]);
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), -2.0).unwrap();

        let split = comb.split(&plane);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front.len(), 3);
        assert_eq!(split.back[0].len(), 12);
        assert_relative_eq!(area(&split.back[0]), 8.0, epsilon = 1e-9);
        for tooth in &split.front {
            assert_eq!(tooth.len(), 4);
            assert_relative_eq!(area(tooth), 1.0, epsilon = 1e-9);
        }
        assert_fragments_valid(&split, &plane);
    }

    #[test]
    fn u_shape_cut_through_vertices_keeps_area() {
        let u_shape = polygon_xy(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 3.0),
            (2.0, 3.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (0.0, 3.0),
        ]);
        // x - y = 0 runs through (0,0), (1,1) and (3,3), and across the notch
        let plane = Plane3D::new(Vector3::new(1.0, -1.0, 0.0), 0.0).unwrap();

        let split = u_shape.split(&plane);
        assert_eq!(split.back.len(), 2);
        assert_eq!(split.front.len(), 1);
        assert_relative_eq!(total_area(&split.back), 3.0, epsilon = 1e-9);
        assert_relative_eq!(area(&split.front[0]), 4.0, epsilon = 1e-9);
        assert_relative_eq!(
            total_area(&split.back) + total_area(&split.front),
            area(&u_shape),
            epsilon = 1e-9
        );
        assert_fragments_valid(&split, &plane);
    }

    #[test]
    fn non_splittable_primitives_go_to_both_sides() {
        let line = Polygon::line(
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Vector3::z(),
            7u8,
        );
        let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 0.0).unwrap();

        let split = line.split(&plane);
        assert_eq!(split.back, vec![line.clone()]);
        assert_eq!(split.front, vec![line.clone()]);

        let element = Polygon::element(
            vec![Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            Vector3::z(),
            7u8,
        );
        let split = element.split(&plane);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front.len(), 1);
        assert_eq!(split.back[0].kind(), PrimitiveKind::Element);
    }
}
