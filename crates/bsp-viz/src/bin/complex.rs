use bsp_painter::{BspBuilder, Polygon};
use bsp_viz::{
    generate_cube_polygons, generate_rotated_cube, palette_color, OrbitCamera, ScenePolygon,
    TreeNavigator,
};
use log::{info, warn};
use macroquad::prelude::*;
use nalgebra::{Point3, Rotation3, Unit, Vector3};

/// Generates the complex scene with two cubes and a floor polygon.
fn generate_complex_scene() -> Vec<ScenePolygon> {
    let mut polygons = Vec::new();

    // First cube: rotated around all three axes
    let rot_x = Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::x()), 0.3);
    let rot_y = Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::y()), 0.4);
    let rot_z = Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::z()), 0.25);
    let rotation = rot_z * rot_y * rot_x;
    polygons.extend(generate_rotated_cube(
        Point3::new(-1.0, 0.0, 0.0),
        0.8,
        &rotation,
        palette_color(0),
    ));

    // Second cube: axis-aligned, overlapping the first
    polygons.extend(generate_cube_polygons(
        Point3::new(-0.4, 0.1, 0.2),
        0.8,
        palette_color(1),
    ));

    // Floor at y = -1
    polygons.push(Polygon::new(
        vec![
            Point3::new(-1.5, -1.0, -1.5),
            Point3::new(-1.5, -1.0, 1.5),
            Point3::new(1.5, -1.0, 1.5),
            Point3::new(1.5, -1.0, -1.5),
        ],
        palette_color(7),
    ));

    polygons
}

#[macroquad::main("BSP Complex Scene")]
async fn main() {
    env_logger::init();

    let mut builder = BspBuilder::new();
    for polygon in generate_complex_scene() {
        if let Err(err) = builder.add(polygon) {
            warn!("skipping scene polygon: {}", err);
        }
    }
    let polygon_count = builder.len();
    info!("created {} polygons (2 cubes + 1 floor)", polygon_count);

    let tree = builder.build();
    info!(
        "BSP tree built: {} nodes, depth {}",
        tree.node_count(),
        tree.depth()
    );

    let mut camera = OrbitCamera::new(5.0, 0.4, 0.4).with_zoom(0.5, 2.0, 20.0);
    let mut navigator = TreeNavigator::new();

    loop {
        camera.update();
        navigator.update(&tree);

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        navigator.render(&tree, camera.eye_point());

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), BLUE);

        set_default_camera();

        draw_text(
            &format!("BSP Complex Scene - Total: {} nodes", tree.node_count()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!("Tree depth: {} | Original: {}", tree.depth(), polygon_count),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(&tree, 70.0);

        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 155.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 175.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
