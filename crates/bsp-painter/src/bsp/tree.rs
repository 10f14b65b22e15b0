//! BSP tree container, construction and traversal.

use std::borrow::Cow;

use log::{debug, trace};
use nalgebra::Point3;

use crate::{Classification, Polygon, PrimitiveKind, Real, Split};

use super::node::BspNode;
use super::selector::{FirstPolygon, PlaneSelector};
use super::visitor::BspVisitor;

/// Remaining stack below which recursion switches to a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each stack segment allocated for deep trees.
const STACK_SEGMENT_SIZE: usize = 4 * 1024 * 1024;

/// A Binary Space Partitioning tree for painter's-algorithm ordering.
///
/// Each node holds one polygon whose plane partitions the remaining geometry.
/// Polygons spanning a partition plane are split while building, so no two
/// polygons in the tree interpenetrate and a back-to-front walk gives a
/// correct draw order without a depth buffer.
///
/// # Construction
///
/// ```ignore
/// use bsp_painter::{BspTree, Polygon};
///
/// let polygons: Vec<Polygon> = /* ... */;
/// let tree = BspTree::from_polygons(&polygons);
/// ```
///
/// The tree borrows unsplit polygons from the input slice; it is a snapshot
/// that stays valid until the input is dropped or mutated.
///
/// # Traversal
///
/// ```ignore
/// tree.traverse_back_to_front(eye_position, &mut visitor);
/// ```
#[derive(Debug, Clone)]
pub struct BspTree<'a, S: Clone = ()> {
    root: Option<Box<BspNode<'a, S>>>,
}

impl<S: Clone> Default for BspTree<'_, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters reported after a build.
#[derive(Debug, Default)]
struct BuildStats {
    nodes: usize,
    splits: usize,
    fragments: usize,
}

impl<'a, S: Clone> BspTree<'a, S> {
    /// Creates an empty BSP tree.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Builds a BSP tree from a slice of polygons.
    ///
    /// Uses the provided [`PlaneSelector`] to choose partition polygons.
    /// Degenerate polygons are skipped. Returns an empty tree if nothing
    /// usable remains.
    pub fn build<P: PlaneSelector<S>>(polygons: &'a [Polygon<S>], selector: &P) -> Self {
        let usable: Vec<Cow<'a, Polygon<S>>> = polygons
            .iter()
            .filter(|polygon| match polygon.validate() {
                Ok(()) => true,
                Err(err) => {
                    trace!("skipping degenerate polygon: {}", err);
                    false
                }
            })
            .map(Cow::Borrowed)
            .collect();

        let mut stats = BuildStats::default();
        let root = build_node(usable, selector, &mut stats).map(Box::new);

        debug!(
            "built BSP tree from {} polygons: {} nodes, {} splits, {} fragments",
            polygons.len(),
            stats.nodes,
            stats.splits,
            stats.fragments
        );

        Self { root }
    }

    /// Builds a BSP tree partitioning each node by its first polygon.
    pub fn from_polygons(polygons: &'a [Polygon<S>]) -> Self {
        Self::build(polygons, &FirstPolygon)
    }

    /// Returns `true` if the tree contains no polygons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a reference to the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<&BspNode<'a, S>> {
        self.root.as_deref()
    }

    /// Returns the number of nodes in the tree (0 for an empty tree).
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.node_count())
    }

    /// Returns the total number of polygons in the tree, fragments included.
    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.node_count()
    }

    /// Returns the maximum depth of the tree (0 for empty tree).
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.depth())
    }

    /// Traverses the tree back-to-front relative to the given viewpoint.
    ///
    /// This is the painter's algorithm order: at every node the subtree on
    /// the far side of the partition plane is visited first, then the node
    /// polygon, then the subtree on the eye's side. Drawing polygons in
    /// visit order lets nearer polygons overwrite farther ones.
    pub fn traverse_back_to_front<V: BspVisitor<S>>(&self, eye: Point3<Real>, visitor: &mut V) {
        if let Some(root) = self.root.as_deref() {
            back_to_front(root, eye, visitor);
        }
    }

    /// Traverses the tree front-to-back relative to the given viewpoint.
    ///
    /// This is the reverse of back-to-front traversal, useful when the
    /// nearest polygon should be seen first (e.g., picking).
    pub fn traverse_front_to_back<V: BspVisitor<S>>(&self, eye: Point3<Real>, visitor: &mut V) {
        if let Some(root) = self.root.as_deref() {
            front_to_back(root, eye, visitor);
        }
    }

    /// Collects all polygons in the tree into a vector.
    ///
    /// The order of polygons is not guaranteed.
    pub fn collect_polygons(&self) -> Vec<Polygon<S>> {
        let mut result = Vec::with_capacity(self.polygon_count());
        let mut stack: Vec<&BspNode<'a, S>> = self.root.as_deref().into_iter().collect();

        while let Some(node) = stack.pop() {
            result.push(node.polygon().clone());
            stack.extend(node.front());
            stack.extend(node.back());
        }

        result
    }
}

impl<S: Clone> BspNode<'_, S> {
    /// Traverses this subtree back-to-front relative to the given viewpoint.
    pub fn traverse_back_to_front<V: BspVisitor<S>>(&self, eye: Point3<Real>, visitor: &mut V) {
        back_to_front(self, eye, visitor);
    }

    /// Traverses this subtree front-to-back relative to the given viewpoint.
    pub fn traverse_front_to_back<V: BspVisitor<S>>(&self, eye: Point3<Real>, visitor: &mut V) {
        front_to_back(self, eye, visitor);
    }
}

/// Recursively builds a BSP node from a list of polygons.
fn build_node<'a, S: Clone, P: PlaneSelector<S>>(
    mut polygons: Vec<Cow<'a, Polygon<S>>>,
    selector: &P,
    stats: &mut BuildStats,
) -> Option<BspNode<'a, S>> {
    let index = selector
        .select(&polygons)
        .filter(|&index| index < polygons.len())?;

    // `remove` keeps the remaining polygons in input order
    let partition = polygons.remove(index);
    let plane = partition.plane();

    let mut front_list = Vec::new();
    let mut back_list = Vec::new();

    for polygon in polygons {
        match polygon.classify(&plane) {
            Classification::Front | Classification::Coplanar => front_list.push(polygon),
            Classification::Back => back_list.push(polygon),
            Classification::Spanning => match polygon.kind() {
                PrimitiveKind::Line => back_list.push(polygon),
                PrimitiveKind::MultiSegmentLine => front_list.push(polygon),
                PrimitiveKind::Polygon | PrimitiveKind::Element => {
                    let Split { back, front } = polygon.split(&plane);
                    stats.splits += 1;
                    stats.fragments += back.len() + front.len();
                    back_list.extend(back.into_iter().map(Cow::Owned));
                    front_list.extend(front.into_iter().map(Cow::Owned));
                }
            },
        }
    }

    stats.nodes += 1;
    let mut node = BspNode::new(partition);
    if !back_list.is_empty() {
        let back = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || {
            build_node(back_list, selector, stats)
        });
        node.set_back(back);
    }
    if !front_list.is_empty() {
        let front = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || {
            build_node(front_list, selector, stats)
        });
        node.set_front(front);
    }

    Some(node)
}

/// Walks a subtree back-to-front, looping down the eye's side instead of
/// recursing into it.
fn back_to_front<S: Clone, V: BspVisitor<S>>(
    mut node: &BspNode<'_, S>,
    eye: Point3<Real>,
    visitor: &mut V,
) {
    loop {
        // Eye behind the plane: the front subtree is farther away
        let (far, near) = if node.plane().signed_distance(eye) < 0.0 {
            (node.front(), node.back())
        } else {
            (node.back(), node.front())
        };

        if let Some(far) = far {
            stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || {
                back_to_front(far, eye, visitor)
            });
        }
        visitor.visit(node.polygon());

        match near {
            Some(next) => node = next,
            None => break,
        }
    }
}

/// Walks a subtree front-to-back, looping down the far side.
fn front_to_back<S: Clone, V: BspVisitor<S>>(
    mut node: &BspNode<'_, S>,
    eye: Point3<Real>,
    visitor: &mut V,
) {
    loop {
        let (far, near) = if node.plane().signed_distance(eye) < 0.0 {
            (node.front(), node.back())
        } else {
            (node.back(), node.front())
        };

        if let Some(near) = near {
            stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || {
                front_to_back(near, eye, visitor)
            });
        }
        visitor.visit(node.polygon());

        match far {
            Some(next) => node = next,
            None => break,
        }
    }
}
