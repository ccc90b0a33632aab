use crate::{EndpointId, NetworkId, SyncMode, Transform};

/// How a receiver finds or builds the local object for a record
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateRef {
    Prefab {
        prefab_hash: u64,
        transform: Transform,
    },
    /// Durable id of an instance placed in the scene's own content
    SceneInstance { instance_id: u64 },
}

impl TemplateRef {
    pub fn sync_mode(&self) -> SyncMode {
        match self {
            TemplateRef::Prefab { .. } => SyncMode::PrefabHash,
            TemplateRef::SceneInstance { .. } => SyncMode::SceneInstance,
        }
    }
}

/// The minimal data needed to recreate one replicated object after a switch
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectRecord {
    pub is_player_object: bool,
    pub network_id: NetworkId,
    pub owner: EndpointId,
    /// Resolved by network id once every record has been applied, so it may
    /// point at a record that comes later
    pub parent: Option<NetworkId>,
    pub template: TemplateRef,
    /// Only carried when variable replication is enabled
    pub field_data: Option<Box<[u8]>>,
}
