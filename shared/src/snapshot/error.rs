use thiserror::Error;

use sceneshift_serde::SerdeErr;

use crate::{NetworkId, SyncMode};

/// Errors that can occur while encoding or decoding object snapshots
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// A record's template reference does not use the configured variant
    #[error("Record for object {network_id} uses a {actual:?} template, but the sync mode is {expected:?}")]
    TemplateMismatch {
        network_id: NetworkId,
        expected: SyncMode,
        actual: SyncMode,
    },

    /// More records than a 32-bit count can describe
    #[error("Snapshot holds {count} records, more than a u32 count allows")]
    TooManyRecords { count: usize },

    /// The payload could not be read
    #[error("Malformed snapshot payload: {0}")]
    Serde(#[from] SerdeErr),
}
