//! Visitor pattern for BSP tree traversal.
//!
//! Visitors let the caller draw, collect or inspect polygons in paint order
//! without coupling traversal logic to a renderer.

use crate::Polygon;

/// Visitor for processing polygons during BSP tree traversal.
pub trait BspVisitor<S> {
    /// Called once per polygon, in traversal order.
    fn visit(&mut self, polygon: &Polygon<S>);
}

/// A visitor that collects clones of all visited polygons, in order.
#[derive(Debug)]
pub struct CollectingVisitor<S = ()> {
    collected: Vec<Polygon<S>>,
}

impl<S> Default for CollectingVisitor<S> {
    fn default() -> Self {
        Self {
            collected: Vec::new(),
        }
    }
}

impl<S> CollectingVisitor<S> {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected polygons.
    pub fn into_polygons(self) -> Vec<Polygon<S>> {
        self.collected
    }

    /// Returns a reference to the collected polygons.
    pub fn polygons(&self) -> &[Polygon<S>] {
        &self.collected
    }
}

impl<S: Clone> BspVisitor<S> for CollectingVisitor<S> {
    fn visit(&mut self, polygon: &Polygon<S>) {
        self.collected.push(polygon.clone());
    }
}

/// A visitor that calls a closure for each polygon.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<S, F> BspVisitor<S> for FnVisitor<F>
where
    F: FnMut(&Polygon<S>),
{
    fn visit(&mut self, polygon: &Polygon<S>) {
        (self.func)(polygon);
    }
}
