pub mod error;

use crate::{EndpointId, MessageChannel};

pub use error::TransportError;

/// Reliable, ordered delivery of named byte payloads to one endpoint.
///
/// Acknowledgement bookkeeping relies on that ordering: a client never sees
/// a `SwitchScene` after a newer one from the same server.
pub trait MessageSender {
    fn send(
        &self,
        target: &EndpointId,
        channel: MessageChannel,
        payload: Box<[u8]>,
    ) -> Result<(), TransportError>;
}
