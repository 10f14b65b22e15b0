//! Partition polygon selection for BSP tree construction.
//!
//! The choice of partition polygon affects tree balance and the number of
//! polygon splits during construction.

use std::borrow::Cow;

use crate::Polygon;

/// Strategy for selecting which polygon's plane partitions a node.
pub trait PlaneSelector<S: Clone> {
    /// Returns the index of the polygon to partition with.
    ///
    /// Returns `None` if the slice is empty. An index past the end of the
    /// slice is treated the same way.
    fn select(&self, polygons: &[Cow<'_, Polygon<S>>]) -> Option<usize>;
}

/// Selects the first polygon in the list.
///
/// Simple and fast, and keeps the build a pure function of input order.
/// May produce unbalanced trees depending on that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygon;

impl<S: Clone> PlaneSelector<S> for FirstPolygon {
    fn select(&self, polygons: &[Cow<'_, Polygon<S>>]) -> Option<usize> {
        if polygons.is_empty() { None } else { Some(0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn make_triangle(z: f64) -> Polygon {
        Polygon::new(
            vec![
                Point3::new(0.0, 0.0, z),
                Point3::new(1.0, 0.0, z),
                Point3::new(0.0, 1.0, z),
            ],
            (),
        )
    }

    #[test]
    fn first_polygon_empty_list() {
        let polygons: Vec<Cow<'_, Polygon>> = vec![];
        assert!(FirstPolygon.select(&polygons).is_none());
    }

    #[test]
    fn first_polygon_multiple() {
        let poly1 = make_triangle(0.0);
        let poly2 = make_triangle(1.0);
        let polygons = vec![Cow::Borrowed(&poly1), Cow::Owned(poly2)];

        assert_eq!(FirstPolygon.select(&polygons), Some(0));
    }
}
