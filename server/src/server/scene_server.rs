use std::{collections::BTreeSet, hash::Hash, mem, time::Instant};

use log::{debug, info, warn};

use sceneshift_shared::{
    loader_for, DefaultScenePolicy, EndpointId, ExternalSwitch, HostType, LoadStatus,
    MessageChannel, MessageSender, ObjectRecord, SceneIndex, SceneLoader, ScenePolicy,
    SceneRegistry, SceneWorld, SnapshotCodec, SpawnRequest, SwitchCompletedMessage, SwitchId,
    SwitchMode, SwitchPhase, SwitchSceneMessage, SyncMode, TemplateRef, TransitionState,
};

use crate::{
    events::{SceneEvents, SwitchOutcome},
    object_scope::{ObjectScopeMut, ObjectScopeRef},
    scope_map::ObjectScopeMap,
    switch::progress::{SwitchProgress, SwitchTracker},
    SceneServerError, ServerConfig,
};

/// The authority side of scene switching. Starts switches, drives its own
/// world through them, sends every connected Client a snapshot of the objects
/// the new scene spawned, and reports once every Client has acknowledged.
///
/// Only one switch is in flight at a time. All state lives in this struct,
/// and every step runs inside a call made by the owning application.
pub struct SceneServer<E: Copy + Eq + Hash + 'static> {
    server_config: ServerConfig,
    registry: SceneRegistry,
    codec: SnapshotCodec,
    policy: Box<dyn ScenePolicy>,
    io: Option<Box<dyn MessageSender>>,
    // Switching
    state: TransitionState,
    loader: Box<dyn SceneLoader<E>>,
    tracker: SwitchTracker,
    snapshot_objects: Vec<E>,
    // Clients
    clients: BTreeSet<EndpointId>,
    scope: ObjectScopeMap<E>,
    // Events
    events: SceneEvents,
}

impl<E: Copy + Eq + Hash + 'static> SceneServer<E> {
    /// Create a new SceneServer. Fails if the configured scene list holds a
    /// duplicate name.
    pub fn new(server_config: ServerConfig) -> Result<Self, SceneServerError> {
        let registry = SceneRegistry::new(&server_config.scenes)?;
        let codec = SnapshotCodec::new(&server_config.scenes);
        let loader = loader_for(server_config.scenes.switch_mode);
        let scope = ObjectScopeMap::new(server_config.objects_visible_by_default);

        Ok(Self {
            server_config,
            registry,
            codec,
            policy: Box::new(DefaultScenePolicy),
            io: None,
            // Switching
            state: TransitionState::new(),
            loader,
            tracker: SwitchTracker::new(),
            snapshot_objects: Vec::new(),
            // Clients
            clients: BTreeSet::new(),
            scope,
            // Events
            events: SceneEvents::new(),
        })
    }

    pub fn io_load(&mut self, sender: Box<dyn MessageSender>) {
        self.io = Some(sender);
    }

    pub fn is_io_loaded(&self) -> bool {
        self.io.is_some()
    }

    /// Replaces the hooks consulted before a switch and by
    /// [`SceneServer::has_scene_mismatch`]
    pub fn set_policy<P: ScenePolicy + 'static>(&mut self, policy: P) {
        self.policy = Box::new(policy);
    }

    // Scenes

    /// Registers a scene under the next free index. Requires
    /// `allow_runtime_scene_changes`.
    pub fn register_scene(&mut self, scene_name: &str) -> Result<SceneIndex, SceneServerError> {
        Ok(self.registry.register(HostType::Server, scene_name)?)
    }

    /// Registers a scene under `scene_index`. Requires
    /// `allow_runtime_scene_changes`.
    pub fn register_scene_with_index(
        &mut self,
        scene_name: &str,
        scene_index: SceneIndex,
    ) -> Result<(), SceneServerError> {
        Ok(self
            .registry
            .register_with_index(HostType::Server, scene_name, scene_index)?)
    }

    pub fn scene_registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Makes `scene_name` the active scene without running a switch. Meant
    /// for startup, before Clients connect.
    pub fn start_scene<W: SceneWorld<E>>(
        &mut self,
        world: &mut W,
        scene_name: &str,
    ) -> Result<SceneIndex, SceneServerError> {
        if self.state.is_switching() {
            return Err(SceneServerError::SwitchInProgress {
                name: scene_name.to_string(),
            });
        }
        let Some(scene_index) = self.registry.index_of(scene_name) else {
            return Err(SceneServerError::UnknownScene {
                name: scene_name.to_string(),
            });
        };

        // in external mode the application owns the scene graph
        if self.loader.populates_scene() {
            if world.active_scene_name().as_deref() != Some(scene_name) {
                let scene = world.load_sync(scene_name);
                world.set_active(&scene);
            }
            for object in world.soft_sync_candidates() {
                world.spawn_object(&object, SpawnRequest::scene_object());
            }
        }

        self.state.set_active_scene(scene_index);
        info!("scene `{}` started as active scene", scene_name);
        Ok(scene_index)
    }

    pub fn active_scene(&self) -> Option<SceneIndex> {
        self.state.active_scene()
    }

    pub fn active_scene_name(&self) -> Option<&str> {
        self.state
            .active_scene()
            .and_then(|index| self.registry.name_of(&index))
    }

    /// Whether a Client reporting `remote_scene` is out of step with the
    /// active scene, as decided by the installed [`ScenePolicy`]
    pub fn has_scene_mismatch(&self, remote_scene: SceneIndex) -> bool {
        self.policy
            .has_scene_mismatch(self.state.active_scene(), remote_scene)
    }

    // Clients

    /// Starts tracking a connected Client. Returns the active scene, which
    /// the Client should load before anything else.
    pub fn connect_client(&mut self, endpoint: EndpointId) -> Option<SceneIndex> {
        if endpoint == EndpointId::SERVER {
            warn!("endpoint {} is reserved for the Server itself", endpoint);
            return None;
        }
        if self.clients.insert(endpoint) {
            debug!("endpoint {} connected", endpoint);
        }
        self.state.active_scene()
    }

    /// Stops tracking a Client. It no longer holds back any switch.
    pub fn disconnect_client(&mut self, endpoint: &EndpointId) {
        if !self.clients.remove(endpoint) {
            return;
        }
        debug!("endpoint {} disconnected", endpoint);

        self.scope.remove_endpoint(endpoint);
        self.tracker.remove_endpoint(endpoint);
        self.try_finalize();
    }

    pub fn connected_clients(&self) -> impl Iterator<Item = &EndpointId> {
        self.clients.iter()
    }

    pub fn object_scope(&self, endpoint: &EndpointId) -> ObjectScopeRef<'_, E> {
        ObjectScopeRef::new(self, endpoint)
    }

    pub fn object_scope_mut(&mut self, endpoint: &EndpointId) -> ObjectScopeMut<'_, E> {
        ObjectScopeMut::new(self, endpoint)
    }

    // Switching

    /// Starts a switch to `scene_name`. Returns `None`, with a warning, if a
    /// switch is already in flight, the scene is unregistered or already
    /// active, or the [`ScenePolicy`] refuses.
    pub fn switch_scene<W: SceneWorld<E>>(
        &mut self,
        world: &mut W,
        scene_name: &str,
    ) -> Option<SwitchId> {
        if self.state.is_switching() {
            warn!(
                "cannot switch to scene `{}`, switch {} is still in progress",
                scene_name,
                self.state.switch_id()
            );
            return None;
        }
        let Some(scene_index) = self.registry.index_of(scene_name) else {
            warn!("cannot switch to scene `{}`, it is not registered", scene_name);
            return None;
        };
        if self.state.active_scene() == Some(scene_index) {
            warn!("cannot switch to scene `{}`, it is already active", scene_name);
            return None;
        }
        if !self
            .policy
            .is_switch_allowed(self.active_scene_name(), scene_name)
        {
            warn!("switch to scene `{}` was refused by the scene policy", scene_name);
            return None;
        }

        let mut endpoints: Vec<EndpointId> = self.clients.iter().copied().collect();
        if self.server_config.host_mode {
            endpoints.push(EndpointId::SERVER);
        }
        let switch_id = self.tracker.begin(endpoints);

        let phase = match self.server_config.scenes.switch_mode {
            SwitchMode::BuiltIn => SwitchPhase::Loading,
            SwitchMode::External => SwitchPhase::External,
        };
        self.state.begin(switch_id, scene_index, scene_name, phase);
        self.loader.begin_load(world, scene_name);
        self.state
            .set_migration_pending(self.loader.migration_pending());

        info!(
            "switch {} to scene `{}` ({}) started",
            switch_id, scene_name, scene_index
        );
        self.events.push_switch_start(switch_id, scene_index);
        if phase == SwitchPhase::External {
            self.events.push_external_switch(ExternalSwitch {
                switch_id,
                scene_index,
                scene_name: scene_name.to_string(),
            });
        }

        Some(switch_id)
    }

    /// Reports that application code finished an external transition.
    /// The switch proceeds on the next [`SceneServer::update`].
    pub fn complete_switch(&mut self, switch_id: &SwitchId) -> bool {
        if self.state.phase() != SwitchPhase::External || self.state.switch_id() != *switch_id {
            warn!("switch {} is not waiting on application code", switch_id);
            return false;
        }
        self.loader.complete_external()
    }

    /// Handles one message a Client sent
    pub fn receive_message(&mut self, from: &EndpointId, channel: MessageChannel, payload: &[u8]) {
        match channel {
            MessageChannel::SwitchSceneCompleted => {
                match SwitchCompletedMessage::from_bytes(payload) {
                    Ok(message) => self.receive_completion(from, message.switch_id),
                    Err(source) => {
                        warn!("malformed {} from endpoint {}: {}", channel, from, source);
                        self.events.push_error(SceneServerError::MalformedMessage {
                            from: *from,
                            channel,
                            source,
                        });
                    }
                }
            }
            MessageChannel::SwitchScene => {
                warn!("endpoint {} sent {}, ignoring", from, channel);
                self.events.push_error(SceneServerError::UnexpectedChannel {
                    from: *from,
                    channel,
                });
            }
        }
    }

    /// Advances an in-flight switch: observes load completion, sends
    /// snapshots and drops Clients that missed the deadline
    pub fn update<W: SceneWorld<E>>(&mut self, world: &mut W, now: &Instant) {
        if matches!(
            self.state.phase(),
            SwitchPhase::Loading | SwitchPhase::External
        ) {
            let status = self.loader.poll_load(world);
            self.state
                .set_migration_pending(self.loader.migration_pending());
            if status == LoadStatus::Loaded {
                self.on_scene_loaded(world, now);
            }
        }

        if !self.tracker.expire(now).is_empty() {
            self.try_finalize();
        }
    }

    pub fn take_events(&mut self) -> SceneEvents {
        mem::replace(&mut self.events, SceneEvents::new())
    }

    pub fn is_switching(&self) -> bool {
        self.state.is_switching()
    }

    pub fn switch_phase(&self) -> SwitchPhase {
        self.state.phase()
    }

    /// The switch in flight, if any
    pub fn current_switch(&self) -> Option<SwitchId> {
        self.state
            .is_switching()
            .then(|| self.state.switch_id())
    }

    /// Acknowledgement state of a live switch
    pub fn switch_progress(&self, switch_id: &SwitchId) -> Option<&SwitchProgress> {
        self.tracker.get(switch_id)
    }

    // Scope

    pub(crate) fn scope_has_object(&self, endpoint: &EndpointId, object: &E) -> bool {
        self.scope.is_visible(endpoint, object)
    }

    pub(crate) fn scope_set_object(&mut self, endpoint: &EndpointId, object: &E, visible: bool) {
        self.scope.set(endpoint, object, visible);
    }

    pub(crate) fn scope_clear(&mut self, endpoint: &EndpointId) {
        self.scope.remove_endpoint(endpoint);
    }

    // Private

    fn on_scene_loaded<W: SceneWorld<E>>(&mut self, world: &mut W, now: &Instant) {
        let switch_id = self.state.switch_id();
        let Some(scene_index) = self.state.next_scene_index() else {
            warn!("switch {} finished loading without a target scene", switch_id);
            self.state.reset();
            return;
        };

        if self.loader.populates_scene() {
            for object in world.soft_sync_candidates() {
                world.spawn_object(&object, SpawnRequest::scene_object());
                self.snapshot_objects.push(object);
            }
        }

        self.state.set_active_scene(scene_index);
        self.state.set_phase(SwitchPhase::AwaitingClients);
        info!(
            "switch {} loaded scene {} with {} new objects",
            switch_id,
            scene_index,
            self.snapshot_objects.len()
        );

        self.send_snapshots(world, switch_id, scene_index);

        if let Some(timeout) = self.server_config.switch_timeout {
            self.tracker.set_deadline(&switch_id, *now + timeout);
        }

        if self.server_config.host_mode
            && self.tracker.mark_done(&switch_id, &EndpointId::SERVER)
        {
            self.events
                .push_client_switch(&EndpointId::SERVER, switch_id);
        }

        self.try_finalize();
    }

    fn send_snapshots<W: SceneWorld<E>>(
        &mut self,
        world: &W,
        switch_id: SwitchId,
        scene_index: SceneIndex,
    ) {
        let records: Vec<(E, ObjectRecord)> = self
            .snapshot_objects
            .iter()
            .filter_map(|object| {
                self.object_record(world, object)
                    .map(|record| (*object, record))
            })
            .collect();

        let recipients: Vec<EndpointId> = self.clients.iter().copied().collect();
        for endpoint in recipients {
            let snapshot: Vec<ObjectRecord> = records
                .iter()
                .filter(|(object, _)| self.scope.is_visible(&endpoint, object))
                .map(|(_, record)| record.clone())
                .collect();
            debug!(
                "sending {} objects of switch {} to endpoint {}",
                snapshot.len(),
                switch_id,
                endpoint
            );

            let message = SwitchSceneMessage {
                scene_index,
                switch_id,
                snapshot,
            };
            match message.to_bytes(&self.codec) {
                Ok(payload) => self.send(&endpoint, MessageChannel::SwitchScene, payload),
                Err(source) => {
                    warn!("snapshot for endpoint {} failed: {}", endpoint, source);
                    self.events
                        .push_error(SceneServerError::Snapshot { endpoint, source });
                }
            }
        }
    }

    fn object_record<W: SceneWorld<E>>(&self, world: &W, object: &E) -> Option<ObjectRecord> {
        let Some(descriptor) = world.describe(object) else {
            warn!("a scene object is not spawned, leaving it out of the snapshot");
            return None;
        };

        let parent = world.parent(object).and_then(|parent| {
            let network_id = world.describe(&parent).map(|parent| parent.network_id);
            if network_id.is_none() {
                warn!(
                    "parent of object {} is not spawned, the link is dropped",
                    descriptor.network_id
                );
            }
            network_id
        });

        let template = match self.codec.sync_mode() {
            SyncMode::PrefabHash => TemplateRef::Prefab {
                prefab_hash: descriptor.prefab_hash,
                transform: world.transform(object),
            },
            SyncMode::SceneInstance => TemplateRef::SceneInstance {
                instance_id: descriptor.scene_instance_id,
            },
        };

        let field_data = self
            .codec
            .variable_replication()
            .then(|| world.field_data(object));

        Some(ObjectRecord {
            is_player_object: descriptor.is_player_object,
            network_id: descriptor.network_id,
            owner: descriptor.owner,
            parent,
            template,
            field_data,
        })
    }

    fn receive_completion(&mut self, from: &EndpointId, switch_id: SwitchId) {
        if switch_id.is_empty() {
            debug!("endpoint {} acknowledged its initial scene", from);
            return;
        }
        if !self.tracker.mark_done(&switch_id, from) {
            debug!(
                "ignoring stale acknowledgement of switch {} from endpoint {}",
                switch_id, from
            );
            return;
        }

        debug!("endpoint {} finished switch {}", from, switch_id);
        self.events.push_client_switch(from, switch_id);
        self.try_finalize();
    }

    /// Ends the switch in flight once nobody is left to wait on. State is
    /// reset before the outcome is reported.
    fn try_finalize(&mut self) {
        if self.state.phase() != SwitchPhase::AwaitingClients {
            return;
        }
        let switch_id = self.state.switch_id();
        if !self.tracker.is_complete(&switch_id) {
            return;
        }

        let progress = self.tracker.finish(&switch_id);
        let scene_index = self.state.next_scene_index();
        let scene_name = self.state.next_scene_name().map(str::to_string);
        self.state.reset();
        self.snapshot_objects.clear();

        let (Some(progress), Some(scene_index), Some(scene_name)) =
            (progress, scene_index, scene_name)
        else {
            return;
        };
        info!("switch {} to scene `{}` finished", switch_id, scene_name);
        self.events.push_scene_switch(SwitchOutcome {
            switch_id,
            scene_index,
            scene_name,
            done: progress.done().clone(),
            timed_out: progress.timed_out().clone(),
        });
    }

    fn send(&mut self, endpoint: &EndpointId, channel: MessageChannel, payload: Box<[u8]>) {
        let Some(io) = &self.io else {
            warn!("cannot send {} to endpoint {}, io is not loaded", channel, endpoint);
            self.events.push_error(SceneServerError::TransportNotLoaded {
                endpoint: *endpoint,
                channel,
            });
            return;
        };
        if let Err(source) = io.send(endpoint, channel, payload) {
            warn!("sending {} to endpoint {} failed: {}", channel, endpoint, source);
            self.events.push_error(SceneServerError::Transport {
                endpoint: *endpoint,
                channel,
                source,
            });
        }
    }
}
