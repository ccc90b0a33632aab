use thiserror::Error;

use crate::EndpointId;

/// Errors a [`MessageSender`](crate::MessageSender) can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The target endpoint is unknown or has disconnected
    #[error("Endpoint {endpoint} is not connected")]
    EndpointNotConnected { endpoint: EndpointId },

    /// The underlying channel can no longer carry messages
    #[error("Message channel is closed")]
    ChannelClosed,
}
