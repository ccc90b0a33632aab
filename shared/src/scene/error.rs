use thiserror::Error;

use crate::SceneIndex;

/// Errors that can occur while registering scenes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneRegistryError {
    /// A scene with the same name is already registered
    #[error("Scene `{name}` is already registered")]
    DuplicateName { name: String },

    /// The requested index already belongs to another scene
    #[error("Scene index {index} is already used by scene `{existing}`")]
    DuplicateIndex { index: SceneIndex, existing: String },

    /// Runtime registration was attempted while `allow_runtime_scene_changes` is off
    #[error("Cannot register scene `{name}` at runtime: runtime scene changes are disabled in SceneConfig")]
    RuntimeChangesDisabled { name: String },

    /// Only the Server may register scenes at runtime
    #[error("Cannot register scene `{name}`: only the Server may register scenes at runtime")]
    NotAuthority { name: String },

    /// No index is left to assign
    #[error("Scene registry is full")]
    IndicesExhausted,
}
