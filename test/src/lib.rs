
pub use local_transport::{Envelope, LocalBus};
pub use test_network::{TestNetwork, TestPeer};
pub use test_world::{ContentObject, ObjectState, SceneContent, SpawnState, TestObject, TestWorld, PLAYER_PREFAB};
