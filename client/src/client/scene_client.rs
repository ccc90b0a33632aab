use std::{hash::Hash, mem};

use log::{debug, info, warn};

use sceneshift_shared::{
    loader_for, DefaultScenePolicy, EndpointId, ExternalSwitch, HostType, LoadStatus,
    MessageChannel, MessageSender, NetworkId, ObjectRecord, SceneIndex, SceneLoader, ScenePolicy,
    SceneRegistry, SceneWorld, SnapshotCodec, SpawnRequest, SwitchCompletedMessage, SwitchId,
    SwitchMode, SwitchPhase, SwitchSceneMessage, TransitionState,
};

use crate::{events::ClientEvents, ClientConfig, SceneClientError};

/// The non-authority side of scene switching. Follows every switch the
/// Server announces, recreates the objects in its snapshot and acknowledges
/// once the new scene is in place.
pub struct SceneClient<E: Copy + Eq + Hash + 'static> {
    client_config: ClientConfig,
    registry: SceneRegistry,
    codec: SnapshotCodec,
    policy: Box<dyn ScenePolicy>,
    io: Option<Box<dyn MessageSender>>,
    state: TransitionState,
    loader: Box<dyn SceneLoader<E>>,
    pending_snapshot: Vec<ObjectRecord>,
    events: ClientEvents,
}

impl<E: Copy + Eq + Hash + 'static> SceneClient<E> {
    /// Create a new SceneClient. Fails if the configured scene list holds a
    /// duplicate name.
    pub fn new(client_config: ClientConfig) -> Result<Self, SceneClientError> {
        let registry = SceneRegistry::new(&client_config.scenes)?;
        let codec = SnapshotCodec::new(&client_config.scenes);
        let loader = loader_for(client_config.scenes.switch_mode);

        Ok(Self {
            client_config,
            registry,
            codec,
            policy: Box::new(DefaultScenePolicy),
            io: None,
            state: TransitionState::new(),
            loader,
            pending_snapshot: Vec::new(),
            events: ClientEvents::new(),
        })
    }

    pub fn io_load(&mut self, sender: Box<dyn MessageSender>) {
        self.io = Some(sender);
    }

    pub fn is_io_loaded(&self) -> bool {
        self.io.is_some()
    }

    pub fn set_policy<P: ScenePolicy + 'static>(&mut self, policy: P) {
        self.policy = Box::new(policy);
    }

    /// Always fails: only the Server registers scenes at runtime
    pub fn register_scene(&mut self, scene_name: &str) -> Result<SceneIndex, SceneClientError> {
        Ok(self.registry.register(HostType::Client, scene_name)?)
    }

    /// Always fails: only the Server starts switches
    pub fn switch_scene(&mut self, _scene_name: &str) -> Result<SwitchId, SceneClientError> {
        Err(SceneClientError::NotAuthority {
            action: "switch scenes",
        })
    }

    pub fn scene_registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Loads the Server's active scene on connect, then acknowledges with
    /// [`SwitchId::EMPTY`] since no switch attempt exists yet
    pub fn sync_initial_scene<W: SceneWorld<E>>(
        &mut self,
        world: &mut W,
        scene_index: SceneIndex,
    ) -> Result<(), SceneClientError> {
        let Some(scene_name) = self.registry.name_of(&scene_index).map(str::to_string) else {
            return Err(SceneClientError::UnknownSceneIndex { scene_index });
        };

        // in external mode the application owns the scene graph
        if self.loader.populates_scene()
            && world.active_scene_name().as_deref() != Some(scene_name.as_str())
        {
            let scene = world.load_sync(&scene_name);
            world.set_active(&scene);
        }
        self.state.set_active_scene(scene_index);
        info!("synced initial scene `{}`", scene_name);

        self.send(
            MessageChannel::SwitchSceneCompleted,
            SwitchCompletedMessage::new(SwitchId::EMPTY).to_bytes(),
        )
    }

    /// Handles one message the Server sent
    pub fn receive_message<W: SceneWorld<E>>(
        &mut self,
        world: &mut W,
        channel: MessageChannel,
        payload: &[u8],
    ) {
        match channel {
            MessageChannel::SwitchScene => {
                match SwitchSceneMessage::from_bytes(&self.codec, payload) {
                    Ok(message) => self.begin_switch(world, message),
                    Err(source) => {
                        warn!("malformed {} from the Server: {}", channel, source);
                        self.events
                            .push_error(SceneClientError::MalformedMessage { channel, source });
                    }
                }
            }
            MessageChannel::SwitchSceneCompleted => {
                warn!("the Server sent {}, ignoring", channel);
                self.events
                    .push_error(SceneClientError::UnexpectedChannel { channel });
            }
        }
    }

    /// Reports that application code finished an external transition.
    /// The snapshot is applied on the next [`SceneClient::update`].
    pub fn complete_switch(&mut self, switch_id: &SwitchId) -> bool {
        if self.state.phase() != SwitchPhase::External || self.state.switch_id() != *switch_id {
            warn!("switch {} is not waiting on application code", switch_id);
            return false;
        }
        self.loader.complete_external()
    }

    /// Advances an in-flight switch. Once the target scene is in place the
    /// snapshot is applied and the Server is told.
    pub fn update<W: SceneWorld<E>>(&mut self, world: &mut W) {
        if !self.state.is_switching() {
            return;
        }
        let status = self.loader.poll_load(world);
        self.state
            .set_migration_pending(self.loader.migration_pending());
        if status == LoadStatus::Loaded {
            self.finish_switch(world);
        }
    }

    pub fn take_events(&mut self) -> ClientEvents {
        mem::replace(&mut self.events, ClientEvents::new())
    }

    pub fn active_scene(&self) -> Option<SceneIndex> {
        self.state.active_scene()
    }

    pub fn active_scene_name(&self) -> Option<&str> {
        self.state
            .active_scene()
            .and_then(|index| self.registry.name_of(&index))
    }

    /// Whether the Server reporting `remote_scene` is out of step with the
    /// local active scene, as decided by the installed [`ScenePolicy`]
    pub fn has_scene_mismatch(&self, remote_scene: SceneIndex) -> bool {
        self.policy
            .has_scene_mismatch(self.state.active_scene(), remote_scene)
    }

    pub fn is_switching(&self) -> bool {
        self.state.is_switching()
    }

    pub fn switch_phase(&self) -> SwitchPhase {
        self.state.phase()
    }

    pub fn current_switch(&self) -> Option<SwitchId> {
        self.state
            .is_switching()
            .then(|| self.state.switch_id())
    }

    // Private

    fn begin_switch<W: SceneWorld<E>>(&mut self, world: &mut W, message: SwitchSceneMessage) {
        let SwitchSceneMessage {
            scene_index,
            switch_id,
            snapshot,
        } = message;

        // A scene this Client cannot load is acknowledged anyway so the Server
        // does not wait on it. The Client stays where it is.
        let Some(scene_name) = self.registry.name_of(&scene_index).map(str::to_string) else {
            warn!(
                "switch {} targets scene index {}, which is not registered, acknowledging without loading",
                switch_id, scene_index
            );
            let acknowledgement = SwitchCompletedMessage::new(switch_id).to_bytes();
            if let Err(error) = self.send(MessageChannel::SwitchSceneCompleted, acknowledgement) {
                self.events.push_error(error);
            }
            return;
        };

        if self.state.is_switching() {
            debug!(
                "switch {} supersedes unfinished switch {}",
                switch_id,
                self.state.switch_id()
            );
        }

        let phase = match self.client_config.scenes.switch_mode {
            SwitchMode::BuiltIn => SwitchPhase::Loading,
            SwitchMode::External => SwitchPhase::External,
        };
        self.state.begin(switch_id, scene_index, &scene_name, phase);
        self.pending_snapshot = snapshot;
        self.loader.begin_load(world, &scene_name);
        self.state
            .set_migration_pending(self.loader.migration_pending());

        info!(
            "switch {} to scene `{}` started with {} objects to recreate",
            switch_id,
            scene_name,
            self.pending_snapshot.len()
        );
        if phase == SwitchPhase::External {
            self.events.push_external_switch(ExternalSwitch {
                switch_id,
                scene_index,
                scene_name,
            });
        }
    }

    fn finish_switch<W: SceneWorld<E>>(&mut self, world: &mut W) {
        let switch_id = self.state.switch_id();
        let Some(scene_index) = self.state.next_scene_index() else {
            warn!("switch {} finished loading without a target scene", switch_id);
            self.state.reset();
            return;
        };

        let records = mem::take(&mut self.pending_snapshot);
        self.apply_snapshot(world, &records);
        self.state.set_active_scene(scene_index);

        let acknowledgement = SwitchCompletedMessage::new(switch_id).to_bytes();
        if let Err(error) = self.send(MessageChannel::SwitchSceneCompleted, acknowledgement) {
            self.events.push_error(error);
        }

        self.state.reset();
        info!("switch {} to scene {} finished", switch_id, scene_index);
        self.events.push_scene_switch(switch_id, scene_index);
    }

    /// Recreates every record in order, then links parents by network id
    fn apply_snapshot<W: SceneWorld<E>>(&mut self, world: &mut W, records: &[ObjectRecord]) {
        let mut links: Vec<(E, NetworkId, NetworkId)> = Vec::new();

        for record in records {
            let Some(object) = world.create_placeholder(&record.template, record.parent) else {
                warn!("no local object could be created for object {}", record.network_id);
                self.events
                    .push_error(SceneClientError::PlaceholderUnavailable {
                        network_id: record.network_id,
                    });
                continue;
            };

            world.spawn_object(
                &object,
                SpawnRequest {
                    network_id: Some(record.network_id),
                    owner: record.owner,
                    is_player_object: record.is_player_object,
                    is_scene_object: true,
                    destroy_with_scene: !record.is_player_object,
                    field_data: record.field_data.as_deref(),
                },
            );

            if let Some(parent) = record.parent {
                links.push((object, record.network_id, parent));
            }
        }

        for (object, network_id, parent_id) in links {
            match world.object_by_network_id(&parent_id) {
                Some(parent) => world.set_parent(&object, Some(&parent)),
                None => warn!(
                    "parent {} of object {} does not exist, leaving it unparented",
                    parent_id, network_id
                ),
            }
        }
    }

    fn send(&self, channel: MessageChannel, payload: Box<[u8]>) -> Result<(), SceneClientError> {
        let Some(io) = &self.io else {
            warn!("cannot send {} to the Server, io is not loaded", channel);
            return Err(SceneClientError::TransportNotLoaded { channel });
        };
        io.send(&EndpointId::SERVER, channel, payload)
            .map_err(|source| SceneClientError::Transport { channel, source })
    }
}
