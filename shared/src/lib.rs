//! # Sceneshift Shared
//! Common functionality shared between sceneshift-server & sceneshift-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use sceneshift_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr,
};

mod messages;
mod scene;
mod snapshot;
mod switch_id;
mod transport;
mod types;
mod world;

pub use messages::{
    channel::MessageChannel,
    switch_scene::{SwitchCompletedMessage, SwitchSceneMessage},
};
pub use scene::{
    config::{SceneConfig, SwitchMode, SyncMode},
    error::SceneRegistryError,
    external::ExternalSwitch,
    loader::{loader_for, BuiltInLoader, ExternalLoader, LoadStatus, SceneLoader},
    migration::{migrate_in, migrate_out},
    policy::{DefaultScenePolicy, ScenePolicy},
    registry::SceneRegistry,
    transition::{SwitchPhase, TransitionState},
};
pub use snapshot::{
    codec::SnapshotCodec,
    error::SnapshotError,
    record::{ObjectRecord, TemplateRef},
    transform::{
        Position, PositionComponent, Rotation, RotationComponent, Transform, POSITION_LIMIT,
    },
};
pub use switch_id::SwitchId;
pub use transport::{MessageSender, TransportError};
pub use types::{EndpointId, HostType, NetworkId, SceneIndex};
pub use world::{
    scene_graph::{LoadHandle, SceneGraph, SceneRef, SceneTarget},
    scene_world::SceneWorld,
    spawn_registry::{ObjectDescriptor, SpawnRegistry, SpawnRequest},
};
