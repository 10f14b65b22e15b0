//! Mutable polygon list that BSP trees are built from.

use std::ops::Index;

use log::debug;

use crate::{Polygon, PolygonError};

use super::selector::PlaneSelector;
use super::tree::BspTree;

/// Ordered list of scene polygons, rebuilt into a [`BspTree`] each frame.
///
/// The owning scene adds and removes polygons between frames and calls
/// [`BspBuilder::build`] to get a fresh tree. Degenerate polygons are
/// rejected on [`BspBuilder::add`] and never reach a tree.
///
/// The tree borrows the list, so the list cannot change while a tree built
/// from it is alive.
#[derive(Debug, Clone)]
pub struct BspBuilder<S = ()> {
    polygons: Vec<Polygon<S>>,
}

impl<S> Default for BspBuilder<S> {
    fn default() -> Self {
        Self {
            polygons: Vec::new(),
        }
    }
}

impl<S: Clone> BspBuilder<S> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a polygon and returns its index.
    ///
    /// Fails without changing the list if the polygon is degenerate.
    pub fn add(&mut self, polygon: Polygon<S>) -> Result<usize, PolygonError> {
        if let Err(err) = polygon.validate() {
            debug!("rejecting polygon: {}", err);
            return Err(err);
        }
        self.polygons.push(polygon);
        Ok(self.polygons.len() - 1)
    }

    /// Removes the first polygon equal to `polygon`.
    /// Returns `true` if one was found.
    pub fn remove(&mut self, polygon: &Polygon<S>) -> bool
    where
        S: PartialEq,
    {
        match self.polygons.iter().position(|p| p == polygon) {
            Some(index) => {
                self.polygons.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the polygon at `index`, shifting later polygons down.
    pub fn remove_at(&mut self, index: usize) -> Option<Polygon<S>> {
        (index < self.polygons.len()).then(|| self.polygons.remove(index))
    }

    /// Removes every polygon.
    pub fn clear(&mut self) {
        self.polygons.clear();
    }

    /// Returns the number of polygons.
    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Polygon<S>> {
        self.polygons.get(index)
    }

    /// Returns the polygons in insertion order.
    #[inline]
    pub fn polygons(&self) -> &[Polygon<S>] {
        &self.polygons
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon<S>> {
        self.polygons.iter()
    }

    /// Builds a BSP tree from the current polygons, partitioning each node
    /// by its first polygon.
    ///
    /// Returns an empty tree when the list is empty. The list itself is not
    /// modified.
    pub fn build(&self) -> BspTree<'_, S> {
        BspTree::from_polygons(&self.polygons)
    }

    /// Builds a BSP tree using a custom [`PlaneSelector`].
    pub fn build_with<P: PlaneSelector<S>>(&self, selector: &P) -> BspTree<'_, S> {
        BspTree::build(&self.polygons, selector)
    }
}

impl<S> Index<usize> for BspBuilder<S> {
    type Output = Polygon<S>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.polygons[index]
    }
}

impl<'b, S> IntoIterator for &'b BspBuilder<S> {
    type Item = &'b Polygon<S>;
    type IntoIter = std::slice::Iter<'b, Polygon<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}
