use thiserror::Error;

use sceneshift_shared::{
    EndpointId, MessageChannel, SceneRegistryError, SerdeErr, SnapshotError, TransportError,
};

/// Errors raised by the [`SceneServer`](crate::SceneServer).
///
/// Registration and startup failures are returned to the caller. Failures
/// while handling traffic are pushed as [`ErrorEvent`](crate::ErrorEvent)s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneServerError {
    /// Scene registration failed
    #[error("Scene registration failed: {0}")]
    Registry(#[from] SceneRegistryError),

    /// The scene name is not registered
    #[error("Scene `{name}` is not registered")]
    UnknownScene { name: String },

    /// The request needs an idle server
    #[error("Cannot start scene `{name}` while a scene switch is in progress")]
    SwitchInProgress { name: String },

    /// A Client sent bytes that do not decode
    #[error("Malformed message from endpoint {from} on {channel}: {source}")]
    MalformedMessage {
        from: EndpointId,
        channel: MessageChannel,
        source: SerdeErr,
    },

    /// A Client sent a message on a channel only the Server writes to
    #[error("Endpoint {from} sent a message on {channel}, which only the Server may send")]
    UnexpectedChannel {
        from: EndpointId,
        channel: MessageChannel,
    },

    /// The snapshot for a Client could not be encoded
    #[error("Could not encode the snapshot for endpoint {endpoint}: {source}")]
    Snapshot {
        endpoint: EndpointId,
        source: SnapshotError,
    },

    /// The transport refused a message
    #[error("Could not send {channel} to endpoint {endpoint}: {source}")]
    Transport {
        endpoint: EndpointId,
        channel: MessageChannel,
        source: TransportError,
    },

    /// Messages were due before [`SceneServer::io_load`](crate::SceneServer::io_load) was called
    #[error("Cannot send {channel} to endpoint {endpoint}: no transport is loaded")]
    TransportNotLoaded {
        endpoint: EndpointId,
        channel: MessageChannel,
    },
}
