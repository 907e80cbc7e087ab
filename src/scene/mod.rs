//! # Scene Module
//!
//! A renderable scene: one camera, one voxel volume, and an ordered list of
//! pluggable components that are updated once per tick.
//!
//! ## Architecture
//!
//! Components implement the [`SceneComponent`] capability and are attached
//! and detached through the scene, never directly. The shared state they
//! operate on (camera and volume) lives in a [`SceneContext`] owned by the
//! scene and is passed to every lifecycle call, so components hold no
//! hidden references into the scene. Components are stored behind shared
//! single-threaded handles so the embedding application can keep its own
//! handle to a component (for example to call into the renderer between
//! ticks) while the scene drives the update loop.

use std::cell::RefCell;
use std::rc::Rc;

use crate::scene::camera::Camera;
use crate::voxels::volume::VoxelVolume;

pub mod camera;

/// Scene state shared with every attached component: the camera that drives
/// streaming and rendering, and the voxel volume they operate on.
pub struct SceneContext {
    /// The camera observing the scene. Mutated externally between ticks.
    pub camera: Camera,
    /// The voxel window streamed around the camera.
    pub volume: VoxelVolume,
}

/// A pluggable, update-capable scene participant.
///
/// Attach and detach are mediated by [`Scene::insert_component`] and
/// [`Scene::erase_component`]; implementations must treat a second attach
/// without an intervening detach (or a detach while not attached) as a
/// programmer error and panic. A component may read scene-shared state only
/// between its attach and detach calls.
pub trait SceneComponent {
    /// Called once per scene tick with the elapsed time in seconds.
    fn on_update(&mut self, ctx: &mut SceneContext, dt: f32);

    /// Called when the component is inserted into a scene.
    fn on_attach(&mut self, _ctx: &mut SceneContext) {}

    /// Called when the component is removed from a scene.
    fn on_detach(&mut self, _ctx: &mut SceneContext) {}
}

/// Shared handle to a scene component.
pub type SharedComponent = Rc<RefCell<dyn SceneComponent>>;

/// A renderable scene owning the shared context and the component list.
pub struct Scene {
    context: SceneContext,
    components: Vec<SharedComponent>,
}

impl Scene {
    /// Creates a scene around `camera` with an empty voxel volume.
    pub fn new(camera: Camera) -> Self {
        Scene {
            context: SceneContext {
                camera,
                volume: VoxelVolume::new(),
            },
            components: Vec::new(),
        }
    }

    /// Read access to the shared camera and volume.
    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    /// Mutable access to the shared camera and volume.
    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    /// Updates every component in insertion order.
    ///
    /// # Arguments
    /// * `dt` - Elapsed time since the previous tick, in seconds.
    pub fn update(&mut self, dt: f32) {
        for component in &self.components {
            component.borrow_mut().on_update(&mut self.context, dt);
        }
    }

    /// Attaches `component` and appends it to the update list.
    pub fn insert_component(&mut self, component: SharedComponent) {
        component.borrow_mut().on_attach(&mut self.context);
        self.components.push(component);
    }

    /// Detaches `component` and removes it from the update list. Does
    /// nothing if the handle is not part of this scene.
    pub fn erase_component(&mut self, component: &SharedComponent) {
        if let Some(index) = self
            .components
            .iter()
            .position(|c| Rc::ptr_eq(c, component))
        {
            let removed = self.components.remove(index);
            removed.borrow_mut().on_detach(&mut self.context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    struct ProbeComponent {
        attached: bool,
        updates: u32,
    }

    impl ProbeComponent {
        fn new() -> Self {
            ProbeComponent {
                attached: false,
                updates: 0,
            }
        }
    }

    impl SceneComponent for ProbeComponent {
        fn on_update(&mut self, _ctx: &mut SceneContext, _dt: f32) {
            assert!(self.attached, "update on a detached component");
            self.updates += 1;
        }

        fn on_attach(&mut self, _ctx: &mut SceneContext) {
            assert!(!self.attached, "component attached twice");
            self.attached = true;
        }

        fn on_detach(&mut self, _ctx: &mut SceneContext) {
            assert!(self.attached, "component detached twice");
            self.attached = false;
        }
    }

    fn test_scene() -> Scene {
        Scene::new(Camera::new(0.0, 0.0, Point3::new(0.0, 0.0, 0.0)))
    }

    #[test]
    fn inserted_components_receive_updates() {
        let mut scene = test_scene();
        let probe = Rc::new(RefCell::new(ProbeComponent::new()));
        scene.insert_component(probe.clone());
        scene.update(0.016);
        scene.update(0.016);
        assert_eq!(probe.borrow().updates, 2);
    }

    #[test]
    fn erased_components_stop_updating() {
        let mut scene = test_scene();
        let probe = Rc::new(RefCell::new(ProbeComponent::new()));
        let handle: SharedComponent = probe.clone();
        scene.insert_component(handle.clone());
        scene.update(0.016);
        scene.erase_component(&handle);
        assert!(!probe.borrow().attached);
        scene.update(0.016);
        assert_eq!(probe.borrow().updates, 1);
    }

    #[test]
    #[should_panic(expected = "attached twice")]
    fn double_attach_panics() {
        let mut scene = test_scene();
        let probe: SharedComponent = Rc::new(RefCell::new(ProbeComponent::new()));
        scene.insert_component(probe.clone());
        scene.insert_component(probe);
    }
}
