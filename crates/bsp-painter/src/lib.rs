//! Painter's-algorithm ordering of 3D polygons with a BSP tree.

pub mod bsp;
mod error;
mod plane;
mod polygon;
mod split;

/// Scalar type used for all geometry.
pub type Real = f64;

pub use bsp::{
    BspBuilder, BspNode, BspTree, BspVisitor, CollectingVisitor, FirstPolygon, FnVisitor,
    PlaneSelector,
};
pub use error::PolygonError;
pub use plane::{Classification, Plane3D, PlaneSide, PLANE_EPSILON};
pub use polygon::{Polygon, PrimitiveKind};
pub use split::{split_polygon, Split};
