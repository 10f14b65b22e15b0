use bsp_painter::BspBuilder;
use bsp_viz::{generate_rotated_cube, palette_color, OrbitCamera, ScenePolygon, TreeNavigator};
use log::{info, warn};
use macroquad::prelude::*;
use nalgebra::{Point3, Rotation3, Unit, Vector3};
use ::rand::rngs::StdRng;
use ::rand::{Rng, SeedableRng};

const NUM_CUBES: usize = 10;
const WORLD_SIZE: f64 = 30.0;
const MIN_CUBE_SIZE: f64 = 3.0;
const MAX_CUBE_SIZE: f64 = 8.0;
const SEED: u64 = 42;

/// Generates randomly placed and rotated cubes; the same seed gives the same scene.
fn generate_random_rotated_cubes(seed: u64) -> Vec<ScenePolygon> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut polygons = Vec::with_capacity(NUM_CUBES * 6);
    let half_world = WORLD_SIZE / 2.0;

    for i in 0..NUM_CUBES {
        let center = Point3::new(
            rng.gen_range(-half_world..half_world),
            rng.gen_range(-half_world..half_world),
            rng.gen_range(-half_world..half_world),
        );
        let size = rng.gen_range(MIN_CUBE_SIZE..MAX_CUBE_SIZE);

        let axis = Vector3::new(
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-0.5..0.5),
        );
        let axis = Unit::try_new(axis, 0.01).unwrap_or_else(Vector3::x_axis);
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let rotation = Rotation3::from_axis_angle(&axis, angle);

        polygons.extend(generate_rotated_cube(center, size, &rotation, palette_color(i)));
    }

    polygons
}

#[macroquad::main("BSP Rotated Cubes")]
async fn main() {
    env_logger::init();

    info!("generating {} random rotated cubes", NUM_CUBES);
    let mut builder = BspBuilder::new();
    for polygon in generate_random_rotated_cubes(SEED) {
        if let Err(err) = builder.add(polygon) {
            warn!("skipping cube face: {}", err);
        }
    }
    let polygon_count = builder.len();

    let tree = builder.build();
    info!(
        "BSP tree built from {} polygons: {} nodes, depth {}",
        polygon_count,
        tree.node_count(),
        tree.depth()
    );

    let mut camera = OrbitCamera::new(50.0, 0.0, 0.3).with_zoom(3.0, 10.0, 150.0);
    let mut navigator = TreeNavigator::new();

    loop {
        camera.update();
        navigator.update(&tree);

        clear_background(Color::from_rgba(15, 15, 25, 255));
        set_camera(&camera.to_camera3d());

        navigator.render(&tree, camera.eye_point());

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(8.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 8.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 8.0), BLUE);

        set_default_camera();

        draw_text(
            &format!("BSP Rotated Cubes - Total: {} nodes", tree.node_count()),
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
