use std::hash::Hash;

use crate::Transform;

/// Handle to an in-flight asynchronous scene load
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadHandle(u64);

impl LoadHandle {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// Reference to a loaded scene graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneRef(u64);

impl SceneRef {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// Destination of [`SceneGraph::move_object`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneTarget {
    /// Transitional area that belongs to no scene and survives scene unloads
    Holding,
    Scene(SceneRef),
}

/// The scene/world-graph primitive that loads, activates and holds content.
///
/// A load started with [`SceneGraph::load_async`] must never report completion
/// from within the call that started it: [`SceneGraph::poll_load`] can only
/// return the loaded scene on a later call. Loading a scene replaces every
/// scene currently loaded; objects in [`SceneTarget::Holding`] survive.
pub trait SceneGraph<E: Copy + Eq + Hash> {
    fn load_async(&mut self, scene_name: &str) -> LoadHandle;

    /// Returns the loaded scene once the load behind `handle` has finished
    fn poll_load(&mut self, handle: &LoadHandle) -> Option<SceneRef>;

    fn load_sync(&mut self, scene_name: &str) -> SceneRef;

    fn active_scene(&self) -> Option<SceneRef>;

    fn scene_name(&self, scene: &SceneRef) -> Option<String>;

    fn set_active(&mut self, scene: &SceneRef);

    fn move_object(&mut self, object: &E, target: SceneTarget);

    fn parent(&self, object: &E) -> Option<E>;

    fn set_parent(&mut self, object: &E, parent: Option<&E>);

    fn transform(&self, object: &E) -> Transform;

    fn active_scene_name(&self) -> Option<String> {
        self.active_scene()
            .and_then(|scene| self.scene_name(&scene))
    }
}
