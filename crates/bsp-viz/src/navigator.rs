//! BSP tree navigation utilities for interactive visualization.

use bsp_painter::{BspNode, BspTree};
use macroquad::prelude::*;
use nalgebra::Point3;

use crate::RenderVisitor;

/// Direction taken at each node in the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Front,
    Back,
}

/// Interactive navigator that restricts drawing to one subtree.
pub struct TreeNavigator {
    path: Vec<Direction>,
}

impl Default for TreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to navigate to the front child. Returns true if successful.
    pub fn go_front(&mut self, tree: &BspTree<'_, Color>) -> bool {
        self.descend(tree, Direction::Front)
    }

    /// Attempts to navigate to the back child. Returns true if successful.
    pub fn go_back(&mut self, tree: &BspTree<'_, Color>) -> bool {
        self.descend(tree, Direction::Back)
    }

    fn descend(&mut self, tree: &BspTree<'_, Color>, direction: Direction) -> bool {
        let has_child = self.current_node(tree).is_some_and(|node| match direction {
            Direction::Front => node.front().is_some(),
            Direction::Back => node.back().is_some(),
        });
        if has_child {
            self.path.push(direction);
        }
        has_child
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Drops path steps that no longer exist after the tree was rebuilt.
    pub fn revalidate(&mut self, tree: &BspTree<'_, Color>) {
        while !self.path.is_empty() && self.current_node(tree).is_none() {
            self.path.pop();
        }
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update(&mut self, tree: &BspTree<'_, Color>) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::F) {
            changed = self.go_front(tree);
        }
        if is_key_pressed(KeyCode::B) {
            changed = self.go_back(tree);
        }
        if is_key_pressed(KeyCode::P) {
            changed = self.go_parent();
        }
        if is_key_pressed(KeyCode::R) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        changed
    }

    /// Returns the node at the end of the current path, if it exists.
    pub fn current_node<'t, 'a>(
        &self,
        tree: &'t BspTree<'a, Color>,
    ) -> Option<&'t BspNode<'a, Color>> {
        tree.root().and_then(|root| node_at_path(root, &self.path))
    }

    /// Draws the current subtree in painter's order and returns the number
    /// of primitives drawn.
    pub fn render(&self, tree: &BspTree<'_, Color>, eye: Point3<f64>) -> usize {
        let mut visitor = RenderVisitor::new();
        if let Some(node) = self.current_node(tree) {
            node.traverse_back_to_front(eye, &mut visitor);
        }
        visitor.drawn()
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, tree: &BspTree<'_, Color>, y_offset: f32) {
        let node = self.current_node(tree);
        let subtree_nodes = node.map_or(0, |n| n.node_count());
        let is_leaf = node.is_none_or(|n| n.is_leaf());

        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|d| match d {
                    Direction::Front => "F",
                    Direction::Back => "B",
                })
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        let partition = match node {
            Some(n) if n.is_fragment() => format!("{:?} (fragment)", n.polygon().kind()),
            Some(n) => format!("{:?}", n.polygon().kind()),
            None => "-".to_string(),
        };

        draw_text(
            &format!("Subtree: {} nodes | Partition: {}", subtree_nodes, partition),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            &format!(
                "Children: {}{}{}",
                if node.is_some_and(|n| n.front().is_some()) { "[F]ront " } else { "" },
                if node.is_some_and(|n| n.back().is_some()) { "[B]ack " } else { "" },
                if is_leaf { "(leaf)" } else { "" }
            ),
            10.0,
            y_offset + 40.0,
            18.0,
            if is_leaf { ORANGE } else { GREEN },
        );
        draw_text("[P]arent | [R]oot", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }
}

/// Follows `path` from `root`; `None` if a step leads nowhere.
fn node_at_path<'t, 'a>(
    root: &'t BspNode<'a, Color>,
    path: &[Direction],
) -> Option<&'t BspNode<'a, Color>> {
    let mut current = root;
    for dir in path {
        current = match dir {
            Direction::Front => current.front()?,
            Direction::Back => current.back()?,
        };
    }
    Some(current)
}
