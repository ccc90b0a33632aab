//! Switches that lose Clients along the way, and messages that should never
//! have been sent

use std::time::Duration;

use sceneshift_client::{
    ClientConfig, ErrorEvent as ClientErrorEvent, SceneClientError,
    SceneSwitchedEvent as ClientSceneSwitchedEvent,
};
use sceneshift_server::{
    ErrorEvent, SceneServerError, SceneSwitchedEvent, ServerConfig, SwitchOutcome,
};
use sceneshift_shared::{
    EndpointId, MessageChannel, SceneConfig, SceneIndex, SceneRegistryError,
    SwitchCompletedMessage, SwitchId, SwitchSceneMessage, SnapshotCodec, SnapshotError,
};
use sceneshift_test::{SceneContent, TestNetwork};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scene_config() -> SceneConfig {
    SceneConfig::with_scenes(["Lobby", "Arena", "Forest"])
}

fn network(switch_timeout: Option<Duration>) -> (TestNetwork, EndpointId, EndpointId) {
    let config = ServerConfig {
        scenes: scene_config(),
        switch_timeout,
        ..Default::default()
    };
    let mut content = SceneContent::new();
    content.add_replicated("Arena", 10, 0xB1, Default::default());

    let mut net = TestNetwork::new(config, content);
    net.start("Lobby");
    let c1 = net.connect(1);
    let c2 = net.connect(2);
    net.deliver();
    (net, c1, c2)
}

fn single_outcome(net: &mut TestNetwork) -> SwitchOutcome {
    let outcomes: Vec<_> = net.server.take_events().read::<SceneSwitchedEvent>().collect();
    assert_eq!(outcomes.len(), 1, "expected exactly one finished switch");
    outcomes.into_iter().next().unwrap()
}

#[test]
fn client_leaving_during_load_is_not_waited_on() {
    init_logging();
    let (mut net, c1, c2) = network(None);
    let switch_id = net
        .server
        .switch_scene(&mut net.server_world, "Arena")
        .unwrap();

    net.disconnect(&c2);
    assert!(net.server.is_switching());

    assert!(net.settle(5));
    let outcome = single_outcome(&mut net);
    assert_eq!(outcome.switch_id, switch_id);
    assert_eq!(outcome.done.iter().copied().collect::<Vec<_>>(), vec![c1]);
    assert!(outcome.timed_out.is_empty());
}

#[test]
fn client_leaving_while_others_are_done_finishes_the_switch() {
    init_logging();
    let (mut net, c1, c2) = network(None);
    net.mute(c2);
    let switch_id = net
        .server
        .switch_scene(&mut net.server_world, "Arena")
        .unwrap();

    for _ in 0..5 {
        net.tick();
    }
    let progress = net.server.switch_progress(&switch_id).unwrap();
    assert!(progress.done().contains(&c1));
    assert!(progress.pending().contains(&c2));
    assert!(net.server.is_switching());

    // no deadline: the Server keeps waiting no matter how much time passes
    net.advance(Duration::from_secs(3600));
    net.tick();
    assert!(net.server.is_switching());

    net.disconnect(&c2);
    assert!(!net.server.is_switching());
    let outcome = single_outcome(&mut net);
    assert_eq!(outcome.done.iter().copied().collect::<Vec<_>>(), vec![c1]);
}

#[test]
fn silent_client_times_out() {
    init_logging();
    let (mut net, c1, c2) = network(Some(Duration::from_secs(5)));
    net.mute(c2);
    let switch_id = net
        .server
        .switch_scene(&mut net.server_world, "Arena")
        .unwrap();

    for _ in 0..3 {
        net.tick();
    }
    let deadline = net
        .server
        .switch_progress(&switch_id)
        .and_then(|progress| progress.deadline())
        .expect("deadline is set once snapshots are out");
    assert_eq!(deadline, net.now() + Duration::from_secs(5));

    net.advance(Duration::from_secs(4));
    net.tick();
    assert!(net.server.is_switching());

    net.advance(Duration::from_secs(1));
    net.tick();
    assert!(!net.server.is_switching());

    let outcome = single_outcome(&mut net);
    assert_eq!(outcome.switch_id, switch_id);
    assert_eq!(outcome.done.iter().copied().collect::<Vec<_>>(), vec![c1]);
    assert_eq!(outcome.timed_out.iter().copied().collect::<Vec<_>>(), vec![c2]);

    // the straggler's acknowledgement arrives after the attempt is gone
    let late_ack = SwitchCompletedMessage::new(switch_id).to_bytes();
    net.inject_to_server(&c2, MessageChannel::SwitchSceneCompleted, &late_ack);
    assert!(net.server.take_events().is_empty());
    assert!(net.server.switch_progress(&switch_id).is_none());
}

#[test]
fn switch_without_clients_finishes_once_loaded() {
    init_logging();
    let config = ServerConfig {
        scenes: scene_config(),
        ..Default::default()
    };
    let mut net = TestNetwork::new(config, SceneContent::new());
    net.start("Lobby");

    let switch_id = net
        .server
        .switch_scene(&mut net.server_world, "Forest")
        .unwrap();
    net.tick();

    let outcome = single_outcome(&mut net);
    assert_eq!(outcome.switch_id, switch_id);
    assert!(outcome.done.is_empty());
    assert_eq!(net.server.active_scene_name(), Some("Forest"));
}

#[test]
fn malformed_messages_to_the_server_become_error_events() {
    init_logging();
    let (mut net, c1, _c2) = network(None);

    net.inject_to_server(&c1, MessageChannel::SwitchSceneCompleted, &[1, 2, 3]);
    net.inject_to_server(&c1, MessageChannel::SwitchScene, &[0; 24]);

    let errors: Vec<_> = net.server.take_events().read::<ErrorEvent>().collect();
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        &errors[0],
        SceneServerError::MalformedMessage { from, channel: MessageChannel::SwitchSceneCompleted, .. }
            if *from == c1
    ));
    assert!(matches!(
        &errors[1],
        SceneServerError::UnexpectedChannel { from, channel: MessageChannel::SwitchScene }
            if *from == c1
    ));
    assert!(!net.server.is_switching());
}

#[test]
fn malformed_messages_to_a_client_become_error_events() {
    init_logging();
    let (mut net, c1, _c2) = network(None);
    let codec = SnapshotCodec::new(&scene_config());
    let unknown_scene = SwitchSceneMessage {
        scene_index: SceneIndex::new(42),
        switch_id: SwitchId::from_u128(7),
        snapshot: Vec::new(),
    }
    .to_bytes(&codec)
    .unwrap();

    let peer = net.peer_mut(&c1);
    peer.client
        .receive_message(&mut peer.world, MessageChannel::SwitchScene, &[0xFF; 3]);
    peer.client
        .receive_message(&mut peer.world, MessageChannel::SwitchScene, &unknown_scene);
    peer.client
        .receive_message(&mut peer.world, MessageChannel::SwitchSceneCompleted, &[0; 16]);

    assert!(!peer.client.is_switching());
    assert_eq!(peer.client.active_scene_name(), Some("Lobby"));
    assert_eq!(peer.world.loads_started, 0);

    let errors: Vec<_> = peer.client.take_events().read::<ClientErrorEvent>().collect();
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        &errors[0],
        SceneClientError::MalformedMessage {
            source: SnapshotError::Serde(_),
            ..
        }
    ));
    assert!(matches!(
        &errors[1],
        SceneClientError::UnexpectedChannel {
            channel: MessageChannel::SwitchSceneCompleted
        }
    ));

    // the unknown scene is acknowledged so the Server is not left waiting
    let acks: Vec<SwitchId> = net
        .bus
        .queued_for(&EndpointId::SERVER)
        .iter()
        .map(|envelope| SwitchCompletedMessage::from_bytes(&envelope.payload).unwrap().switch_id)
        .collect();
    assert_eq!(acks, vec![SwitchId::from_u128(7)]);
}

#[test]
fn client_missing_the_target_scene_does_not_stall_the_switch() {
    init_logging();
    let (mut net, c1, c2) = network(None);
    // knows the Lobby but none of the scenes after it
    let c3 = net.connect_with(
        3,
        ClientConfig {
            scenes: SceneConfig::with_scenes(["Lobby"]),
        },
    );
    net.deliver();

    let switch_id = net
        .server
        .switch_scene(&mut net.server_world, "Arena")
        .unwrap();
    assert!(net.settle(5));

    let outcome = single_outcome(&mut net);
    assert_eq!(outcome.switch_id, switch_id);
    assert_eq!(
        outcome.done.iter().copied().collect::<Vec<_>>(),
        vec![c1, c2, c3]
    );
    assert!(outcome.timed_out.is_empty());

    let peer = net.peer_mut(&c3);
    assert_eq!(peer.client.active_scene_name(), Some("Lobby"));
    assert_eq!(peer.world.loads_started, 0);
    assert!(peer.client.take_events().is_empty());
    assert!(net.server.has_scene_mismatch(SceneIndex::new(0)));
}

#[test]
fn clients_cannot_act_as_the_authority() {
    init_logging();
    let (mut net, c1, _c2) = network(None);
    let peer = net.peer_mut(&c1);

    assert!(matches!(
        peer.client.switch_scene("Arena"),
        Err(SceneClientError::NotAuthority { .. })
    ));
    assert!(matches!(
        peer.client.register_scene("Cave"),
        Err(SceneClientError::Registry(SceneRegistryError::NotAuthority { .. }))
    ));
    assert!(!peer.client.is_switching());
    assert!(!peer.client.scene_registry().contains("Cave"));
}

#[test]
fn newer_switch_supersedes_an_unfinished_one_on_a_client() {
    init_logging();
    let (mut net, c1, _c2) = network(None);
    let codec = SnapshotCodec::new(&scene_config());
    let first = SwitchId::from_u128(11);
    let second = SwitchId::from_u128(12);
    let message = |scene_index: u32, switch_id: SwitchId| {
        SwitchSceneMessage {
            scene_index: SceneIndex::new(scene_index),
            switch_id,
            snapshot: Vec::new(),
        }
        .to_bytes(&codec)
        .unwrap()
    };
    let to_arena = message(1, first);
    let to_forest = message(2, second);

    let peer = net.peer_mut(&c1);
    peer.client
        .receive_message(&mut peer.world, MessageChannel::SwitchScene, &to_arena);
    peer.client
        .receive_message(&mut peer.world, MessageChannel::SwitchScene, &to_forest);
    assert_eq!(peer.client.current_switch(), Some(second));

    peer.world.tick();
    peer.client.update(&mut peer.world);
    assert!(!peer.client.is_switching());
    assert_eq!(peer.client.active_scene_name(), Some("Forest"));

    let switched: Vec<_> = peer
        .client
        .take_events()
        .read::<ClientSceneSwitchedEvent>()
        .collect();
    assert_eq!(switched, vec![(second, SceneIndex::new(2))]);

    let acks: Vec<SwitchId> = net
        .bus
        .queued_for(&EndpointId::SERVER)
        .iter()
        .map(|envelope| SwitchCompletedMessage::from_bytes(&envelope.payload).unwrap().switch_id)
        .collect();
    assert_eq!(acks, vec![second]);
}

#[test]
fn runtime_registration_requires_opting_in() {
    init_logging();
    let (mut net, _c1, _c2) = network(None);
    assert!(matches!(
        net.server.register_scene("Cave"),
        Err(SceneServerError::Registry(
            SceneRegistryError::RuntimeChangesDisabled { .. }
        ))
    ));

    let config = ServerConfig {
        scenes: SceneConfig {
            allow_runtime_scene_changes: true,
            ..scene_config()
        },
        ..Default::default()
    };
    let mut net = TestNetwork::new(config, SceneContent::new());
    assert_eq!(net.server.register_scene("Cave").unwrap(), SceneIndex::new(3));
    assert!(matches!(
        net.server.register_scene("Arena"),
        Err(SceneServerError::Registry(SceneRegistryError::DuplicateName { .. }))
    ));

    net.start("Lobby");
    assert!(net.server.switch_scene(&mut net.server_world, "Cave").is_some());
    assert!(net.settle(3));
    assert_eq!(net.server.active_scene_name(), Some("Cave"));
}
