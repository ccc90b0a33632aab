use std::vec::IntoIter;

use sceneshift_shared::{ExternalSwitch, SceneIndex, SwitchId};

use crate::SceneClientError;

pub struct ClientEvents {
    external_switches: Vec<ExternalSwitch>,
    scene_switches: Vec<(SwitchId, SceneIndex)>,
    errors: Vec<SceneClientError>,

    empty: bool,
}

impl ClientEvents {
    pub(crate) fn new() -> Self {
        Self {
            external_switches: Vec::new(),
            scene_switches: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ClientEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ClientEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_external_switch(&mut self, external: ExternalSwitch) {
        self.external_switches.push(external);
        self.empty = false;
    }

    pub(crate) fn push_scene_switch(&mut self, switch_id: SwitchId, scene_index: SceneIndex) {
        self.scene_switches.push((switch_id, scene_index));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: SceneClientError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait ClientEvent {
    type Iter;

    fn iter(events: &mut ClientEvents) -> Self::Iter;

    fn has(events: &ClientEvents) -> bool;
}

// ExternalSwitchEvent
pub struct ExternalSwitchEvent;
impl ClientEvent for ExternalSwitchEvent {
    type Iter = IntoIter<ExternalSwitch>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.external_switches);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.external_switches.is_empty()
    }
}

// SceneSwitchedEvent
pub struct SceneSwitchedEvent;
impl ClientEvent for SceneSwitchedEvent {
    type Iter = IntoIter<(SwitchId, SceneIndex)>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.scene_switches);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.scene_switches.is_empty()
    }
}

// ErrorEvent
pub struct ErrorEvent;
impl ClientEvent for ErrorEvent {
    type Iter = IntoIter<SceneClientError>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.errors.is_empty()
    }
}
