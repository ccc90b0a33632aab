mod scene_events;
pub use scene_events::{
    ClientSwitchedEvent, ErrorEvent, ExternalSwitchEvent, SceneEvent, SceneEvents,
    SceneSwitchedEvent, SwitchOutcome, SwitchStartedEvent,
};
