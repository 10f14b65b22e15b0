use bsp_painter::{BspBuilder, Polygon};
use bsp_viz::{palette_color, OrbitCamera, ScenePolygon, TreeNavigator};
use log::{info, warn};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};

/// Two quads crossing each other, plus a line and a polyline lying on the
/// planes they cut through.
fn intersecting_scene() -> Vec<ScenePolygon> {
    vec![
        Polygon::new(
            vec![
                Point3::new(-1.0, 0.0, -1.0),
                Point3::new(-1.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, -1.0),
            ],
            palette_color(0),
        ),
        Polygon::new(
            vec![
                Point3::new(-0.8, -0.8, 0.0),
                Point3::new(0.8, -0.8, 0.0),
                Point3::new(0.8, 0.8, 0.0),
                Point3::new(-0.8, 0.8, 0.0),
            ],
            palette_color(1),
        ),
        Polygon::line(
            Point3::new(0.0, -1.2, 0.5),
            Point3::new(0.0, 1.2, 0.5),
            Vector3::x(),
            YELLOW,
        ),
        Polygon::multi_segment_line(
            vec![
                Point3::new(-1.0, -0.5, -0.6),
                Point3::new(-0.3, 0.5, -0.6),
                Point3::new(0.3, -0.5, -0.6),
                Point3::new(1.0, 0.5, -0.6),
            ],
            Vector3::z(),
            WHITE,
        ),
    ]
}

/// Quad toggled in and out of the scene with the T key.
fn toggled_quad() -> ScenePolygon {
    Polygon::new(
        vec![
            Point3::new(0.3, -0.6, -0.9),
            Point3::new(0.3, 0.6, -0.9),
            Point3::new(0.3, 0.6, 0.9),
            Point3::new(0.3, -0.6, 0.9),
        ],
        palette_color(2),
    )
}

#[macroquad::main("BSP Visualization")]
async fn main() {
    env_logger::init();

    let mut builder = BspBuilder::new();
    for polygon in intersecting_scene() {
        if let Err(err) = builder.add(polygon) {
            warn!("skipping scene primitive: {}", err);
        }
    }
    info!("scene has {} primitives", builder.len());

    let mut camera = OrbitCamera::new(4.0, 0.6, 0.4).with_zoom(0.5, 2.0, 20.0);
    let mut navigator = TreeNavigator::new();

    loop {
        if is_key_pressed(KeyCode::T) {
            let quad = toggled_quad();
            if !builder.remove(&quad) {
                if let Err(err) = builder.add(quad) {
                    warn!("could not add quad: {}", err);
                }
            }
            info!("scene has {} primitives", builder.len());
        }

        // The tree is a per-frame snapshot of the builder
        let tree = builder.build();
        navigator.revalidate(&tree);

        camera.update();
        navigator.update(&tree);

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        let drawn = navigator.render(&tree, camera.eye_point());

        set_default_camera();

        draw_text(
            &format!(
                "Intersecting quads - {} primitives, {} nodes, depth {}",
                builder.len(),
                tree.node_count(),
                tree.depth()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(&format!("Drawn: {}", drawn), 10.0, 45.0, 18.0, GRAY);

        navigator.draw_ui(&tree, 70.0);

        draw_text(
            "Drag mouse to rotate, scroll to zoom, [T]oggle quad",
            10.0,
            155.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 175.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
