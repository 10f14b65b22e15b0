//! BSP tree node implementation.

use std::borrow::Cow;

use crate::{Plane3D, Polygon};

/// A node in the BSP tree.
///
/// Each node partitions space with the plane of its polygon. Geometry in
/// front of (or coplanar with) that plane lives in the front subtree, geometry
/// behind it in the back subtree.
///
/// # Polygon ownership
///
/// The node polygon is borrowed from the list the tree was built from when
/// it reached the node unsplit, and owned when it is a fragment produced by
/// splitting during the build.
#[derive(Debug, Clone)]
pub struct BspNode<'a, S: Clone = ()> {
    /// The polygon whose plane partitions this node.
    polygon: Cow<'a, Polygon<S>>,

    /// Subtree containing polygons in FRONT of (or on) the partition plane.
    front: Option<Box<BspNode<'a, S>>>,

    /// Subtree containing polygons BEHIND the partition plane.
    back: Option<Box<BspNode<'a, S>>>,
}

impl<'a, S: Clone> BspNode<'a, S> {
    /// Creates a leaf node partitioned by `polygon`.
    pub fn new(polygon: Cow<'a, Polygon<S>>) -> Self {
        Self {
            polygon,
            front: None,
            back: None,
        }
    }

    /// Returns the partition polygon.
    #[inline]
    pub fn polygon(&self) -> &Polygon<S> {
        &self.polygon
    }

    /// Returns the partition plane.
    #[inline]
    pub fn plane(&self) -> Plane3D {
        self.polygon.plane()
    }

    /// Returns `true` if the node polygon was produced by splitting.
    #[inline]
    pub fn is_fragment(&self) -> bool {
        matches!(self.polygon, Cow::Owned(_))
    }

    /// Returns a reference to the front child subtree.
    #[inline]
    pub fn front(&self) -> Option<&BspNode<'a, S>> {
        self.front.as_deref()
    }

    /// Returns a reference to the back child subtree.
    #[inline]
    pub fn back(&self) -> Option<&BspNode<'a, S>> {
        self.back.as_deref()
    }

    /// Sets the front child subtree.
    #[inline]
    pub fn set_front(&mut self, node: Option<BspNode<'a, S>>) {
        self.front = node.map(Box::new);
    }

    /// Sets the back child subtree.
    #[inline]
    pub fn set_back(&mut self, node: Option<BspNode<'a, S>>) {
        self.back = node.map(Box::new);
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Returns the number of nodes in this subtree (including this one).
    ///
    /// Every node holds exactly one polygon, so this is also the number of
    /// polygons in the subtree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.front());
            stack.extend(node.back());
        }
        count
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.front().map(|n| (n, depth + 1)));
            stack.extend(node.back().map(|n| (n, depth + 1)));
        }
        max_depth
    }
}

// Unlinks children onto a heap stack so deep trees drop without recursion.
impl<'a, S: Clone> Drop for BspNode<'a, S> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<BspNode<'a, S>>> =
            self.front.take().into_iter().chain(self.back.take()).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
    }
}
