use std::default::Default;

use sceneshift_shared::SceneConfig;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Scene settings. Must match the Server's `SceneConfig`.
    pub scenes: SceneConfig,
}
