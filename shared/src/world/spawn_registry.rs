use std::hash::Hash;

use crate::{EndpointId, NetworkId, TemplateRef};

/// What the registry knows about a spawned object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub network_id: NetworkId,
    pub owner: EndpointId,
    pub is_player_object: bool,
    pub prefab_hash: u64,
    pub scene_instance_id: u64,
}

/// Parameters of [`SpawnRegistry::spawn_object`]
#[derive(Clone, Copy, Debug)]
pub struct SpawnRequest<'a> {
    /// `None` lets the registry assign a fresh identity (authority only)
    pub network_id: Option<NetworkId>,
    pub owner: EndpointId,
    pub is_player_object: bool,
    pub is_scene_object: bool,
    pub destroy_with_scene: bool,
    pub field_data: Option<&'a [u8]>,
}

impl SpawnRequest<'_> {
    /// A server-owned object that belongs to the scene it was loaded with
    pub fn scene_object() -> Self {
        Self {
            network_id: None,
            owner: EndpointId::SERVER,
            is_player_object: false,
            is_scene_object: true,
            destroy_with_scene: true,
            field_data: None,
        }
    }
}

/// The object spawn/destroy registry that tracks replicated objects and their
/// network identities
pub trait SpawnRegistry<E: Copy + Eq + Hash> {
    /// Destroys every spawned object that is scoped to its scene
    fn destroy_scene_scoped_objects(&mut self);

    /// Every spawned object, in spawn order
    fn spawned_objects(&self) -> Vec<E>;

    /// Replicated objects in the active scene's content that have not been
    /// spawned yet
    fn soft_sync_candidates(&self) -> Vec<E>;

    /// `None` if `object` is not spawned
    fn describe(&self, object: &E) -> Option<ObjectDescriptor>;

    fn object_by_network_id(&self, network_id: &NetworkId) -> Option<E>;

    /// Registers `object` as a tracked replica and returns its identity
    fn spawn_object(&mut self, object: &E, request: SpawnRequest<'_>) -> NetworkId;

    /// Materializes an unspawned local object from a snapshot template
    fn create_placeholder(
        &mut self,
        template: &TemplateRef,
        parent: Option<NetworkId>,
    ) -> Option<E>;

    /// Opaque replicated field data of `object`
    fn field_data(&self, object: &E) -> Box<[u8]>;
}
