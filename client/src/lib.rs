//! # Sceneshift Client
//! Follows the Server through scene switches: loads the announced scene,
//! recreates the objects in its snapshot and acknowledges each switch.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use sceneshift_shared::{
        EndpointId, MessageChannel, MessageSender, NetworkId, SceneConfig, SceneIndex,
        ScenePolicy, SceneWorld, SwitchId, SwitchMode, SwitchPhase, SyncMode, TransportError,
    };
}

mod client;
mod error;
mod events;

pub use client::{ClientConfig, SceneClient};
pub use error::SceneClientError;
pub use events::{ClientEvent, ClientEvents, ErrorEvent, ExternalSwitchEvent, SceneSwitchedEvent};
