//! Binary Space Partitioning tree for painter's-algorithm rendering.
//!
//! This module orders 3D polygons back-to-front for a given eye position so
//! they can be drawn without a depth buffer:
//!
//! - The scene keeps its polygons in a [`BspBuilder`]
//! - Each frame, [`BspBuilder::build`] partitions them into a [`BspTree`],
//!   splitting polygons that straddle a partition plane
//! - [`BspTree::traverse_back_to_front`] hands polygons to a [`BspVisitor`]
//!   in paint order
//!
//! # Example
//!
//! ```ignore
//! use bsp_painter::{BspBuilder, CollectingVisitor, Polygon};
//! use nalgebra::Point3;
//!
//! let mut builder = BspBuilder::new();
//! for polygon in scene_polygons {
//!     builder.add(polygon)?;
//! }
//!
//! let tree = builder.build();
//! let eye = Point3::new(0.0, 0.0, 10.0);  // The location of the viewer
//! let mut visitor = CollectingVisitor::new();
//! tree.traverse_back_to_front(eye, &mut visitor);
//!
//! // Draw in this order
//! let ordered_polygons = visitor.into_polygons();
//! ```
//!
//! # Architecture
//!
//! - [`BspBuilder`]: The scene's mutable polygon list
//! - [`BspTree`]: An immutable snapshot built from that list
//! - [`BspNode`]: One partition polygon with front and back subtrees
//! - [`PlaneSelector`]: Strategy trait for choosing partition polygons
//! - [`BspVisitor`]: Visitor trait receiving polygons in traversal order

mod builder;
mod node;
mod selector;
mod tree;
mod visitor;

// Re-export main types
pub use builder::BspBuilder;
pub use node::BspNode;
pub use selector::{FirstPolygon, PlaneSelector};
pub use tree::BspTree;
pub use visitor::{BspVisitor, CollectingVisitor, FnVisitor};
