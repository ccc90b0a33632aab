//! # Sceneshift Server
//! The authority side of scene switching: starts switches, moves persistent
//! objects across the scene swap, sends every connected Client a snapshot of
//! the objects it must recreate, and tracks which Clients have finished.

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

mod error;
mod events;
mod object_scope;
mod scope_map;
mod server;
mod switch;

pub use error::SceneServerError;
pub use events::{
    ClientSwitchedEvent, ErrorEvent, ExternalSwitchEvent, SceneEvent, SceneEvents,
    SceneSwitchedEvent, SwitchOutcome, SwitchStartedEvent,
};
pub use object_scope::{ObjectScopeMut, ObjectScopeRef};
pub use server::{SceneServer, ServerConfig};
pub use switch::progress::{SwitchProgress, SwitchTracker};
