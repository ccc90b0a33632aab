use std::default::Default;

/// Which template reference identifies an object in a snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    /// Objects are recreated from a prefab hash plus a transform
    PrefabHash,
    /// Objects are matched to an instance already present in the loaded scene
    SceneInstance,
}

/// Who performs scene loading and unloading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchMode {
    /// The scene graph is driven directly: objects are destroyed, migrated and
    /// the target scene is loaded asynchronously
    BuiltIn,
    /// Application code loads and unloads scenes itself and reports back
    /// through `complete_switch`. Only ids and acknowledgements are handled.
    External,
}

/// Scene settings that must be identical on the Server and every Client
#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Scenes registered at startup. Indices are assigned in order, from 0.
    pub scenes: Vec<String>,
    /// Allows the Server to register additional scenes after startup
    pub allow_runtime_scene_changes: bool,
    /// Template reference variant written into snapshots
    pub sync_mode: SyncMode,
    /// Appends each object's opaque field data to its snapshot record
    pub variable_replication: bool,
    /// Scene loading strategy
    pub switch_mode: SwitchMode,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scenes: Vec::new(),
            allow_runtime_scene_changes: false,
            sync_mode: SyncMode::PrefabHash,
            variable_replication: true,
            switch_mode: SwitchMode::BuiltIn,
        }
    }
}

impl SceneConfig {
    pub fn with_scenes<I, S>(scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scenes: scenes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}
