use std::{default::Default, time::Duration};

use sceneshift_shared::SceneConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone)]
pub struct ServerConfig {
    /// Scene settings. Must match the `SceneConfig` of every Client.
    pub scenes: SceneConfig,
    /// How long Clients have to acknowledge a switch once its snapshots are
    /// sent. Clients still silent after that are dropped from the attempt.
    /// `None` waits for as long as they stay connected.
    pub switch_timeout: Option<Duration>,
    /// The Server process also runs a local Client that shares its world.
    /// Its acknowledgement is recorded directly, under `EndpointId::SERVER`.
    pub host_mode: bool,
    /// Whether objects without a scope override appear in a Client's snapshot
    pub objects_visible_by_default: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            scenes: SceneConfig::default(),
            switch_timeout: Some(Duration::from_secs(30)),
            host_mode: false,
            objects_visible_by_default: true,
        }
    }
}
