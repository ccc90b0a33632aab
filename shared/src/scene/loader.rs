use std::hash::Hash;

use log::{debug, warn};

use crate::{
    scene::migration::{migrate_in, migrate_out},
    LoadHandle, SceneWorld, SwitchMode,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// No load has been started
    Idle,
    Loading,
    /// The target scene is active and persistent objects are in place
    Loaded,
}

/// Strategy that carries a participant from the outgoing scene into the
/// target scene. Chosen once from [`SwitchMode`].
pub trait SceneLoader<E: Copy + Eq + Hash> {
    /// Starts the transition to `scene_name`. Completion is only ever
    /// observed through a later [`SceneLoader::poll_load`].
    fn begin_load(&mut self, world: &mut dyn SceneWorld<E>, scene_name: &str);

    fn poll_load(&mut self, world: &mut dyn SceneWorld<E>) -> LoadStatus;

    /// Called when application code reports an externally handled transition
    /// as done. Returns `false` if this loader does not accept such reports
    /// or nothing is pending.
    fn complete_external(&mut self) -> bool;

    /// Whether the new scene's unspawned content is spawned and snapshotted
    fn populates_scene(&self) -> bool;

    /// Whether persistent objects currently sit in the holding area
    fn migration_pending(&self) -> bool;
}

pub fn loader_for<E: Copy + Eq + Hash + 'static>(mode: SwitchMode) -> Box<dyn SceneLoader<E>> {
    match mode {
        SwitchMode::BuiltIn => Box::new(BuiltInLoader::new()),
        SwitchMode::External => Box::new(ExternalLoader::new()),
    }
}

// BuiltInLoader

/// Drives the scene graph directly
pub struct BuiltInLoader<E: Copy + Eq + Hash> {
    load: Option<LoadHandle>,
    migrating: Vec<E>,
}

impl<E: Copy + Eq + Hash> BuiltInLoader<E> {
    pub fn new() -> Self {
        Self {
            load: None,
            migrating: Vec::new(),
        }
    }
}

impl<E: Copy + Eq + Hash> Default for BuiltInLoader<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Eq + Hash> SceneLoader<E> for BuiltInLoader<E> {
    fn begin_load(&mut self, world: &mut dyn SceneWorld<E>, scene_name: &str) {
        if self.load.is_some() {
            debug!("superseding unfinished load with `{}`", scene_name);
        }

        world.destroy_scene_scoped_objects();

        // objects already held from a superseded load stay tracked
        for object in world.spawned_objects() {
            if !self.migrating.contains(&object) {
                self.migrating.push(object);
            }
        }
        migrate_out(world, &self.migrating);

        self.load = Some(world.load_async(scene_name));
    }

    fn poll_load(&mut self, world: &mut dyn SceneWorld<E>) -> LoadStatus {
        let Some(handle) = self.load else {
            return LoadStatus::Idle;
        };
        let Some(scene) = world.poll_load(&handle) else {
            return LoadStatus::Loading;
        };

        world.set_active(&scene);
        migrate_in(world, &self.migrating, &scene);
        self.migrating.clear();
        self.load = None;

        LoadStatus::Loaded
    }

    fn complete_external(&mut self) -> bool {
        warn!("complete_switch was called, but scenes are loaded by the built-in loader");
        false
    }

    fn populates_scene(&self) -> bool {
        true
    }

    fn migration_pending(&self) -> bool {
        self.load.is_some()
    }
}

// ExternalLoader

/// Leaves loading to application code and waits for its report
pub struct ExternalLoader {
    requested: Option<String>,
    completed: bool,
}

impl ExternalLoader {
    pub fn new() -> Self {
        Self {
            requested: None,
            completed: false,
        }
    }
}

impl Default for ExternalLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Eq + Hash> SceneLoader<E> for ExternalLoader {
    fn begin_load(&mut self, _world: &mut dyn SceneWorld<E>, scene_name: &str) {
        self.requested = Some(scene_name.to_string());
        self.completed = false;
    }

    fn poll_load(&mut self, _world: &mut dyn SceneWorld<E>) -> LoadStatus {
        match (&self.requested, self.completed) {
            (None, _) => LoadStatus::Idle,
            (Some(_), false) => LoadStatus::Loading,
            (Some(_), true) => {
                self.requested = None;
                self.completed = false;
                LoadStatus::Loaded
            }
        }
    }

    fn complete_external(&mut self) -> bool {
        if self.requested.is_none() {
            return false;
        }
        self.completed = true;
        true
    }

    fn populates_scene(&self) -> bool {
        false
    }

    fn migration_pending(&self) -> bool {
        false
    }
}
