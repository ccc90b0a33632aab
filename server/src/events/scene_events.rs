use std::{collections::BTreeSet, vec::IntoIter};

use sceneshift_shared::{EndpointId, ExternalSwitch, SceneIndex, SwitchId};

use crate::SceneServerError;

/// Final state of a switch attempt, reported once per attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub switch_id: SwitchId,
    pub scene_index: SceneIndex,
    pub scene_name: String,
    /// Endpoints that acknowledged
    pub done: BTreeSet<EndpointId>,
    /// Endpoints that were still silent when the deadline passed
    pub timed_out: BTreeSet<EndpointId>,
}

pub struct SceneEvents {
    switch_starts: Vec<(SwitchId, SceneIndex)>,
    external_switches: Vec<ExternalSwitch>,
    client_switches: Vec<(EndpointId, SwitchId)>,
    scene_switches: Vec<SwitchOutcome>,
    errors: Vec<SceneServerError>,

    empty: bool,
}

impl SceneEvents {
    pub(crate) fn new() -> Self {
        Self {
            switch_starts: Vec::new(),
            external_switches: Vec::new(),
            client_switches: Vec::new(),
            scene_switches: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: SceneEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: SceneEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_switch_start(&mut self, switch_id: SwitchId, scene_index: SceneIndex) {
        self.switch_starts.push((switch_id, scene_index));
        self.empty = false;
    }

    pub(crate) fn push_external_switch(&mut self, external: ExternalSwitch) {
        self.external_switches.push(external);
        self.empty = false;
    }

    pub(crate) fn push_client_switch(&mut self, endpoint: &EndpointId, switch_id: SwitchId) {
        self.client_switches.push((*endpoint, switch_id));
        self.empty = false;
    }

    pub(crate) fn push_scene_switch(&mut self, outcome: SwitchOutcome) {
        self.scene_switches.push(outcome);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: SceneServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait SceneEvent {
    type Iter;

    fn iter(events: &mut SceneEvents) -> Self::Iter;

    fn has(events: &SceneEvents) -> bool;
}

// SwitchStartedEvent
pub struct SwitchStartedEvent;
impl SceneEvent for SwitchStartedEvent {
    type Iter = IntoIter<(SwitchId, SceneIndex)>;

    fn iter(events: &mut SceneEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.switch_starts);
        IntoIterator::into_iter(list)
    }

    fn has(events: &SceneEvents) -> bool {
        !events.switch_starts.is_empty()
    }
}

// ExternalSwitchEvent
pub struct ExternalSwitchEvent;
impl SceneEvent for ExternalSwitchEvent {
    type Iter = IntoIter<ExternalSwitch>;

    fn iter(events: &mut SceneEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.external_switches);
        IntoIterator::into_iter(list)
    }

    fn has(events: &SceneEvents) -> bool {
        !events.external_switches.is_empty()
    }
}

// ClientSwitchedEvent
pub struct ClientSwitchedEvent;
impl SceneEvent for ClientSwitchedEvent {
    type Iter = IntoIter<(EndpointId, SwitchId)>;

    fn iter(events: &mut SceneEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.client_switches);
        IntoIterator::into_iter(list)
    }

    fn has(events: &SceneEvents) -> bool {
        !events.client_switches.is_empty()
    }
}

// SceneSwitchedEvent
pub struct SceneSwitchedEvent;
impl SceneEvent for SceneSwitchedEvent {
    type Iter = IntoIter<SwitchOutcome>;

    fn iter(events: &mut SceneEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.scene_switches);
        IntoIterator::into_iter(list)
    }

    fn has(events: &SceneEvents) -> bool {
        !events.scene_switches.is_empty()
    }
}

// ErrorEvent
pub struct ErrorEvent;
impl SceneEvent for ErrorEvent {
    type Iter = IntoIter<SceneServerError>;

    fn iter(events: &mut SceneEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &SceneEvents) -> bool {
        !events.errors.is_empty()
    }
}
