//! Shared visualization utilities for the painter's-algorithm demos.

use bsp_painter::{BspVisitor, Plane3D, Polygon, PrimitiveKind};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::{Point3, Rotation3, Vector3};

pub mod navigator;
pub use navigator::TreeNavigator;

/// Scene primitives carry their draw color; fragments inherit it on split.
pub type ScenePolygon = Polygon<Color>;

/// Radius of the marker drawn for elements with fewer than three anchors.
const ELEMENT_MARKER_RADIUS: f32 = 0.05;

const PALETTE: [Color; 8] = [
    Color::new(0.90, 0.30, 0.25, 1.0),
    Color::new(0.25, 0.65, 0.90, 1.0),
    Color::new(0.35, 0.80, 0.40, 1.0),
    Color::new(0.95, 0.75, 0.20, 1.0),
    Color::new(0.70, 0.40, 0.85, 1.0),
    Color::new(0.95, 0.55, 0.75, 1.0),
    Color::new(0.30, 0.85, 0.80, 1.0),
    Color::new(0.85, 0.85, 0.85, 1.0),
];

/// Picks a color from a fixed palette, cycling for large indices.
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Scales the RGB channels of `color`, keeping alpha.
pub fn shade(color: Color, factor: f32) -> Color {
    Color::new(
        (color.r * factor).clamp(0.0, 1.0),
        (color.g * factor).clamp(0.0, 1.0),
        (color.b * factor).clamp(0.0, 1.0),
        color.a,
    )
}

#[inline]
pub fn to_vec3(point: &Point3<f64>) -> Vec3 {
    vec3(point.x as f32, point.y as f32, point.z as f32)
}

/// Draws a single primitive in its metadata color.
///
/// Polygons are fan-triangulated into a mesh; lines and polylines are drawn
/// segment by segment.
pub fn draw_polygon(polygon: &ScenePolygon) {
    let color = *polygon.metadata();
    let points = polygon.points();

    match polygon.kind() {
        PrimitiveKind::Line | PrimitiveKind::MultiSegmentLine => {
            for segment in points.windows(2) {
                draw_line_3d(to_vec3(&segment[0]), to_vec3(&segment[1]), color);
            }
        }
        PrimitiveKind::Element if points.len() < 3 => {
            for anchor in points {
                draw_sphere(to_vec3(anchor), ELEMENT_MARKER_RADIUS, None, color);
            }
        }
        PrimitiveKind::Polygon | PrimitiveKind::Element => draw_fan(points, color),
    }
}

fn draw_fan(points: &[Point3<f64>], color: Color) {
    if points.len() < 3 {
        return;
    }

    let vertices: Vec<Vertex> = points
        .iter()
        .map(|p| Vertex::new2(to_vec3(p), vec2(0.0, 0.0), color))
        .collect();

    // Fan triangulation around the first point
    let mut indices: Vec<u16> = Vec::with_capacity((points.len() - 2) * 3);
    for i in 1..points.len() - 1 {
        indices.extend_from_slice(&[0, i as u16, (i + 1) as u16]);
    }

    draw_mesh(&Mesh {
        vertices,
        indices,
        texture: None,
    });
}

/// Visitor that draws primitives in the order it receives them.
#[derive(Debug, Default)]
pub struct RenderVisitor {
    drawn: usize,
}

impl RenderVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of primitives drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl BspVisitor<Color> for RenderVisitor {
    fn visit(&mut self, polygon: &ScenePolygon) {
        draw_polygon(polygon);
        self.drawn += 1;
    }
}

/// Corner indices of the 6 cube faces, counter-clockwise viewed from outside.
const CUBE_FACES: [[usize; 4]; 6] = [
    [4, 5, 6, 7], // front (+Z)
    [1, 0, 3, 2], // back (-Z)
    [0, 4, 7, 3], // left (-X)
    [5, 1, 2, 6], // right (+X)
    [7, 6, 2, 3], // top (+Y)
    [0, 1, 5, 4], // bottom (-Y)
];

/// Per-face brightness so adjacent faces are distinguishable.
const FACE_SHADES: [f32; 6] = [1.0, 0.55, 0.7, 0.85, 0.95, 0.45];

fn cube_corners(half: f64) -> [Vector3<f64>; 8] {
    [
        Vector3::new(-half, -half, -half), // 0: left-bottom-back
        Vector3::new(half, -half, -half),  // 1: right-bottom-back
        Vector3::new(half, half, -half),   // 2: right-top-back
        Vector3::new(-half, half, -half),  // 3: left-top-back
        Vector3::new(-half, -half, half),  // 4: left-bottom-front
        Vector3::new(half, -half, half),   // 5: right-bottom-front
        Vector3::new(half, half, half),    // 6: right-top-front
        Vector3::new(-half, half, half),   // 7: left-top-front
    ]
}

/// Generates the 6 face polygons of an axis-aligned cube.
pub fn generate_cube_polygons(center: Point3<f64>, size: f64, color: Color) -> Vec<ScenePolygon> {
    let corners = cube_corners(size / 2.0).map(|v| center + v);

    CUBE_FACES
        .iter()
        .zip(FACE_SHADES)
        .map(|(face, factor)| {
            Polygon::new(face.iter().map(|&i| corners[i]).collect(), shade(color, factor))
        })
        .collect()
}

/// Creates a quad with its 4th vertex projected onto the plane of the first three.
/// Rotated corners are not exactly coplanar in floating point.
fn make_coplanar_quad(corners: [Point3<f64>; 4], color: Color) -> ScenePolygon {
    let [p0, p1, p2, p3] = corners;
    let p3 = match Plane3D::from_three_points(p0, p1, p2) {
        Some(plane) => plane.project_point(p3),
        None => p3,
    };
    Polygon::new(vec![p0, p1, p2, p3], color)
}

/// Generates the 6 face polygons of a rotated cube.
pub fn generate_rotated_cube(
    center: Point3<f64>,
    size: f64,
    rotation: &Rotation3<f64>,
    color: Color,
) -> Vec<ScenePolygon> {
    let corners = cube_corners(size / 2.0).map(|v| center + rotation * v);

    CUBE_FACES
        .iter()
        .zip(FACE_SHADES)
        .map(|(face, factor)| {
            make_coplanar_quad(face.map(|i| corners[i]), shade(color, factor))
        })
        .collect()
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    /// Minimum distance from target
    pub min_distance: f32,
    /// Maximum distance from target
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 5.0,
            min_distance: 10.0,
            max_distance: 200.0,
        }
    }

    /// Sets the zoom speed and distance limits.
    pub fn with_zoom(mut self, speed: f32, min: f32, max: f32) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Updates camera state from mouse drag, scroll and arrow keys.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }

        // Stay clear of the poles
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = mouse_wheel().1;
        self.distance = (self.distance - scroll * self.zoom_speed)
            .clamp(self.min_distance, self.max_distance);
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }

    /// Returns the eye point in scene coordinates for BSP traversal.
    pub fn eye_point(&self) -> Point3<f64> {
        let pos = self.position();
        Point3::new(pos.x as f64, pos.y as f64, pos.z as f64)
    }
}
