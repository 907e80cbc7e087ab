//! End-to-end exercise of the streaming and rendering pipeline: a camera
//! flight across an infinite ground plane, with slab reloads and per-frame
//! visibility traversal driven through the scene.

use std::cell::RefCell;
use std::rc::Rc;

use cgmath::Point3;

use voxelstream::content::{shape_generator, Shape, ShapeExtent};
use voxelstream::rendering::primitive::{CountingPrimitive, RecordingPrimitive};
use voxelstream::rendering::render_info::FaceSet;
use voxelstream::rendering::{PerspectiveRenderer, VoxelType};
use voxelstream::resources::texture::Texture;
use voxelstream::resources::ResourcePool;
use voxelstream::scene::camera::Camera;
use voxelstream::scene::{Scene, SharedComponent};
use voxelstream::streaming::StreamingComponent;
use voxelstream::voxels::EMPTY_VOXEL;

struct Pipeline {
    scene: Scene,
    streamer: Rc<RefCell<StreamingComponent>>,
    renderer: Rc<RefCell<PerspectiveRenderer>>,
    voxel: u8,
}

fn build_pipeline(camera: Camera) -> Pipeline {
    let mut pool = ResourcePool::new();
    pool.insert_texture("surface", Texture::checkerboard(16));
    pool.insert_texture("relief", Texture::checkerboard(16));

    let mut scene = Scene::new(camera);
    let streamer = Rc::new(RefCell::new(StreamingComponent::new()));
    let renderer = Rc::new(RefCell::new(
        PerspectiveRenderer::new(&mut pool, 1200.0, 796.0).unwrap(),
    ));
    let voxel = renderer
        .borrow_mut()
        .insert_voxel_type(
            &mut pool,
            &VoxelType::new().with_surface("surface").with_relief("relief"),
        )
        .unwrap();
    scene.insert_component(streamer.clone() as SharedComponent);
    scene.insert_component(renderer.clone() as SharedComponent);
    Pipeline {
        scene,
        streamer,
        renderer,
        voxel,
    }
}

#[test]
fn flight_over_a_plane_keeps_the_window_fresh_and_visible() {
    let camera = Camera::new(45.0, 0.0, Point3::new(-4.5, -4.5, 3.25));
    let mut pipeline = build_pipeline(camera);
    pipeline
        .streamer
        .borrow_mut()
        .set_generator(shape_generator(
            Shape::PlaneXy,
            ShapeExtent::Infinite,
            pipeline.voxel,
        ));
    pipeline
        .streamer
        .borrow_mut()
        .reset(pipeline.scene.context_mut());

    let mut primitive = CountingPrimitive::new();
    let dt = 1.0 / 60.0;
    for _ in 0..45 {
        pipeline.scene.context_mut().camera.move_forward(10.0);
        pipeline.scene.update(dt);
        let rendered = pipeline
            .renderer
            .borrow_mut()
            .render(pipeline.scene.context(), &mut primitive);
        assert!(rendered > 0, "ground plane vanished mid-flight");
    }

    // 450 cells of travel forced several reloads on x and y; the window
    // content around the camera must still be exactly the plane.
    let position = pipeline.scene.context().camera.position();
    let center = pipeline.streamer.borrow().center();
    let camera_cell = Point3::new(position.x.floor() as i32, position.y.floor() as i32, 0);
    assert!((camera_cell.x - center.x).abs() <= 96);
    assert!((camera_cell.y - center.y).abs() <= 96);
    let volume = &pipeline.scene.context().volume;
    for dy in -20..20 {
        for dx in -20..20 {
            let on_plane = Point3::new(camera_cell.x + dx, camera_cell.y + dy, 0);
            assert_eq!(
                volume.at(on_plane).kind,
                pipeline.voxel,
                "stale or missing plane cell at {on_plane:?}"
            );
            let above = Point3::new(on_plane.x, on_plane.y, 1);
            assert_eq!(volume.at(above).kind, EMPTY_VOXEL);
        }
    }
}

#[test]
fn scene_without_a_generator_renders_nothing() {
    let camera = Camera::new(0.0, 0.0, Point3::new(0.5, 0.5, 0.5));
    let mut pipeline = build_pipeline(camera);
    let mut primitive = CountingPrimitive::new();
    pipeline.scene.update(1.0 / 60.0);
    let rendered = pipeline
        .renderer
        .borrow_mut()
        .render(pipeline.scene.context(), &mut primitive);
    assert_eq!(rendered, 0);
    assert_eq!(primitive.voxels(), 0);
}

#[test]
fn single_voxel_world_emits_one_request_with_every_face() {
    let camera = Camera::new(180.0, 0.0, Point3::new(20.5, 0.5, 0.5));
    let mut pipeline = build_pipeline(camera);
    let voxel = pipeline.voxel;
    pipeline
        .streamer
        .borrow_mut()
        .set_generator(Box::new(
            move |lower: Point3<i32>,
                  upper: Point3<i32>,
                  offset: cgmath::Vector3<i32>,
                  volume: &mut voxelstream::voxels::volume::VoxelVolume| {
                for z in lower.z..upper.z {
                    for y in lower.y..upper.y {
                        for x in lower.x..upper.x {
                            let world =
                                Point3::new(x + offset.x, y + offset.y, z + offset.z);
                            let solid = world == Point3::new(0, 0, 0);
                            volume.at_mut(Point3::new(x, y, z)).kind =
                                if solid { voxel } else { EMPTY_VOXEL };
                        }
                    }
                }
            },
        ));
    pipeline
        .streamer
        .borrow_mut()
        .reset(pipeline.scene.context_mut());

    pipeline.scene.update(1.0 / 60.0);
    let mut recorder = RecordingPrimitive::new();
    let rendered = pipeline
        .renderer
        .borrow_mut()
        .render(pipeline.scene.context(), &mut recorder);
    assert_eq!(rendered, 1);
    assert_eq!(recorder.requests.len(), 1);
    assert_eq!(recorder.requests[0].faces, FaceSet::ALL);
    assert_eq!(recorder.requests[0].faces.bits(), 0x3f);
}
