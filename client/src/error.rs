use thiserror::Error;

use sceneshift_shared::{
    MessageChannel, NetworkId, SceneIndex, SceneRegistryError, SnapshotError, TransportError,
};

/// Errors raised by the [`SceneClient`](crate::SceneClient)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneClientError {
    /// The action is reserved for the Server
    #[error("Only the Server may {action}")]
    NotAuthority { action: &'static str },

    /// Scene registration failed
    #[error("Scene registration failed: {0}")]
    Registry(#[from] SceneRegistryError),

    /// A scene index this Client does not know was handed to
    /// `sync_initial_scene`. The scene configurations of Server and Client differ.
    #[error("Scene index {scene_index} is not registered on this Client")]
    UnknownSceneIndex { scene_index: SceneIndex },

    /// The Server sent bytes that do not decode
    #[error("Malformed {channel} message from the Server: {source}")]
    MalformedMessage {
        channel: MessageChannel,
        source: SnapshotError,
    },

    /// The Server sent a message on a channel only Clients write to
    #[error("The Server sent a message on {channel}, which only Clients may send")]
    UnexpectedChannel { channel: MessageChannel },

    /// The spawn registry could not build an object from its template
    #[error("No local object could be created for object {network_id}")]
    PlaceholderUnavailable { network_id: NetworkId },

    /// The transport refused a message
    #[error("Could not send {channel} to the Server: {source}")]
    Transport {
        channel: MessageChannel,
        source: TransportError,
    },

    /// A message was due before [`SceneClient::io_load`](crate::SceneClient::io_load) was called
    #[error("Cannot send {channel} to the Server: no transport is loaded")]
    TransportNotLoaded { channel: MessageChannel },
}
