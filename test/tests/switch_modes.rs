//! External loading, host mode, scene-instance snapshots, scope filtering and
//! scene policies

use sceneshift_client::ExternalSwitchEvent as ClientExternalSwitchEvent;
use sceneshift_server::{
    ClientSwitchedEvent, ExternalSwitchEvent, SceneSwitchedEvent, ServerConfig,
};
use sceneshift_shared::{
    EndpointId, NetworkId, SceneConfig, SceneIndex, ScenePolicy, SwitchId, SwitchMode,
    SwitchPhase, SyncMode,
};
use sceneshift_test::{ContentObject, SceneContent, TestNetwork, TestObject, TestWorld};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config_with(scenes: SceneConfig) -> ServerConfig {
    ServerConfig {
        scenes,
        ..Default::default()
    }
}

fn scenes() -> SceneConfig {
    SceneConfig::with_scenes(["Lobby", "Arena", "Forest"])
}

fn arena_content() -> SceneContent {
    let mut content = SceneContent::new();
    content
        .add_replicated("Arena", 10, 0xB1, Default::default())
        .add_replicated("Arena", 11, 0xB2, Default::default());
    content
}

fn spawned_network_id(world: &TestWorld, instance_id: u64) -> Option<NetworkId> {
    world
        .objects()
        .filter(|(_, state)| state.scene_instance_id == instance_id)
        .find_map(|(_, state)| state.spawn.as_ref().map(|spawn| spawn.network_id))
}

#[test]
fn external_mode_waits_on_application_code() {
    init_logging();
    let scene_config = SceneConfig {
        switch_mode: SwitchMode::External,
        ..scenes()
    };
    let mut net = TestNetwork::new(config_with(scene_config), arena_content());
    net.start("Lobby");
    let c1 = net.connect(1);
    let c2 = net.connect(2);
    net.deliver();

    let switch_id = net
        .server
        .switch_scene(&mut net.server_world, "Arena")
        .unwrap();
    assert_eq!(net.server.switch_phase(), SwitchPhase::External);

    let external: Vec<_> = net.server.take_events().read::<ExternalSwitchEvent>().collect();
    assert_eq!(external.len(), 1);
    assert_eq!(external[0].switch_id, switch_id);
    assert_eq!(external[0].scene_index, SceneIndex::new(1));
    assert_eq!(external[0].scene_name, "Arena");

    // nothing moves until the application reports back
    for _ in 0..3 {
        net.tick();
    }
    assert_eq!(net.server.switch_phase(), SwitchPhase::External);
    assert_eq!(net.server_world.loads_started, 0);
    assert!(net.bus.is_empty());

    assert!(!net.server.complete_switch(&SwitchId::from_u128(99)));
    assert!(net.server.complete_switch(&switch_id));
    net.tick();
    assert_eq!(net.server.switch_phase(), SwitchPhase::AwaitingClients);

    for client in [c1, c2] {
        let peer = net.peer_mut(&client);
        assert_eq!(peer.client.switch_phase(), SwitchPhase::External);
        let external: Vec<_> = peer
            .client
            .take_events()
            .read::<ClientExternalSwitchEvent>()
            .collect();
        assert_eq!(external.len(), 1);
        assert_eq!(external[0].switch_id, switch_id);
        assert_eq!(external[0].scene_name, "Arena");
    }

    net.tick();
    assert!(net.server.is_switching());

    for client in [c1, c2] {
        assert!(net.peer_mut(&client).client.complete_switch(&switch_id));
    }
    assert!(net.settle(3));

    let outcomes: Vec<_> = net.server.take_events().read::<SceneSwitchedEvent>().collect();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].done.len(), 2);
    for client in [c1, c2] {
        let peer = net.peer(&client);
        assert_eq!(peer.client.active_scene_name(), Some("Arena"));
        assert_eq!(peer.world.loads_started, 0);
        assert_eq!(peer.world.objects().count(), 0);
    }
}

#[test]
fn host_mode_counts_the_server_as_a_participant() {
    init_logging();
    let config = ServerConfig {
        host_mode: true,
        ..config_with(scenes())
    };
    let mut net = TestNetwork::new(config, arena_content());
    net.start("Lobby");
    let c1 = net.connect(1);
    net.deliver();

    let switch_id = net
        .server
        .switch_scene(&mut net.server_world, "Arena")
        .unwrap();
    let pending = net.server.switch_progress(&switch_id).unwrap().pending().clone();
    assert!(pending.contains(&EndpointId::SERVER));
    assert!(pending.contains(&c1));

    // the local client is done as soon as the Server's own load finishes
    net.server_world.tick();
    let now = net.now();
    net.server.update(&mut net.server_world, &now);
    let progress = net.server.switch_progress(&switch_id).unwrap();
    assert!(progress.done().contains(&EndpointId::SERVER));
    assert!(progress.pending().contains(&c1));

    // only the remote Client gets a snapshot
    assert_eq!(net.bus.len(), 1);
    assert_eq!(net.bus.queued_for(&c1).len(), 1);

    assert!(net.settle(3));
    let mut events = net.server.take_events();
    let switched: Vec<EndpointId> = events
        .read::<ClientSwitchedEvent>()
        .map(|(endpoint, _)| endpoint)
        .collect();
    assert_eq!(switched, vec![EndpointId::SERVER, c1]);
    let outcomes: Vec<_> = events.read::<SceneSwitchedEvent>().collect();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(
        outcomes[0].done.iter().copied().collect::<Vec<_>>(),
        vec![EndpointId::SERVER, c1]
    );
}

#[test]
fn server_endpoint_cannot_connect_as_a_client() {
    init_logging();
    let mut net = TestNetwork::new(config_with(scenes()), SceneContent::new());
    net.start("Lobby");
    assert_eq!(net.server.connect_client(EndpointId::SERVER), None);
    assert_eq!(net.server.connected_clients().count(), 0);
}

#[test]
fn scene_instances_are_matched_and_reparented() {
    init_logging();
    let scene_config = SceneConfig {
        sync_mode: SyncMode::SceneInstance,
        ..scenes()
    };
    let mut content = SceneContent::new();
    content
        .add(
            "Arena",
            ContentObject {
                instance_id: 20,
                prefab_hash: 0xC1,
                transform: Default::default(),
                parent_instance: None,
                replicated: true,
            },
        )
        .add(
            "Arena",
            ContentObject {
                instance_id: 21,
                prefab_hash: 0xC2,
                transform: Default::default(),
                parent_instance: Some(20),
                replicated: true,
            },
        )
        .add(
            "Arena",
            ContentObject {
                instance_id: 22,
                prefab_hash: 0xC3,
                transform: Default::default(),
                parent_instance: None,
                replicated: false,
            },
        );

    let mut net = TestNetwork::new(config_with(scene_config), content);
    net.start("Lobby");
    let c1 = net.connect(1);
    net.deliver();

    net.server
        .switch_scene(&mut net.server_world, "Arena")
        .unwrap();
    assert!(net.settle(3));

    let parent_id = spawned_network_id(&net.server_world, 20).unwrap();
    let child_id = spawned_network_id(&net.server_world, 21).unwrap();
    assert!(spawned_network_id(&net.server_world, 22).is_none());

    let world = &net.peer(&c1).world;
    // the authored instances are reused, nothing new is created
    assert_eq!(world.objects().count(), 3);
    assert_eq!(spawned_network_id(world, 20), Some(parent_id));
    assert_eq!(spawned_network_id(world, 21), Some(child_id));
    assert_eq!(spawned_network_id(world, 22), None);

    let parent: TestObject = world
        .objects()
        .find(|(_, state)| state.scene_instance_id == 20)
        .map(|(object, _)| *object)
        .unwrap();
    let child = world.spawned_with(child_id).unwrap();
    assert_eq!(child.parent, Some(parent));
}

#[test]
fn hidden_objects_are_left_out_of_snapshots() {
    init_logging();
    let config = ServerConfig {
        objects_visible_by_default: false,
        ..config_with(scenes())
    };
    let mut net = TestNetwork::new(config, arena_content());
    net.start("Lobby");
    let c1 = net.connect(1);
    net.deliver();

    net.server
        .switch_scene(&mut net.server_world, "Arena")
        .unwrap();
    assert!(net.settle(3));

    assert!(spawned_network_id(&net.server_world, 10).is_some());
    let world = &net.peer(&c1).world;
    assert_eq!(world.objects().filter(|(_, state)| state.spawn.is_some()).count(), 0);
    assert_eq!(net.server.take_events().read::<SceneSwitchedEvent>().count(), 1);
}

#[test]
fn object_scope_overrides_apply_per_client() {
    init_logging();
    let mut net = TestNetwork::new(config_with(scenes()), SceneContent::new());
    net.start("Lobby");
    let c1 = net.connect(1);
    let c2 = net.connect(2);
    let (banner, _) = net
        .server_world
        .spawn_player(EndpointId::SERVER, None, Default::default());

    assert!(net.server.object_scope(&c1).has(&banner));
    net.server.object_scope_mut(&c1).exclude(&banner);
    assert!(!net.server.object_scope(&c1).has(&banner));
    assert!(net.server.object_scope(&c2).has(&banner));

    net.server.object_scope_mut(&c1).include(&banner).clear();
    assert!(net.server.object_scope(&c1).has(&banner));

    net.server.object_scope_mut(&c2).exclude(&banner);
    net.disconnect(&c2);
    assert!(net.server.object_scope(&c2).has(&banner));
}

struct NoForest;

impl ScenePolicy for NoForest {
    fn is_switch_allowed(&self, from: Option<&str>, to: &str) -> bool {
        !(from == Some("Arena") && to == "Forest")
    }

    fn has_scene_mismatch(&self, _local: Option<SceneIndex>, _remote: SceneIndex) -> bool {
        false
    }
}

#[test]
fn scene_policy_decides_what_is_allowed() {
    init_logging();
    let mut net = TestNetwork::new(config_with(scenes()), SceneContent::new());
    net.start("Lobby");
    assert!(net.server.has_scene_mismatch(SceneIndex::new(2)));
    assert!(!net.server.has_scene_mismatch(SceneIndex::new(0)));

    net.server.set_policy(NoForest);
    assert!(!net.server.has_scene_mismatch(SceneIndex::new(2)));

    assert!(net
        .server
        .switch_scene(&mut net.server_world, "Arena")
        .is_some());
    assert!(net.settle(3));
    assert!(net
        .server
        .switch_scene(&mut net.server_world, "Forest")
        .is_none());
    assert!(net
        .server
        .switch_scene(&mut net.server_world, "Lobby")
        .is_some());
}
