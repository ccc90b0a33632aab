use crate::{SceneIndex, SwitchId};

/// Where a participant stands in the scene switch state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchPhase {
    Idle,
    /// The built-in loader is tearing down and loading the target scene
    Loading,
    /// Application code owns the transition until `complete_switch` is called
    External,
    /// Snapshots are out, acknowledgements are being collected (Server only)
    AwaitingClients,
}

/// Process-wide flags for the switch in flight. At most one switch is active
/// at a time, and [`TransitionState::reset`] always returns to idle.
#[derive(Debug)]
pub struct TransitionState {
    phase: SwitchPhase,
    switch_id: SwitchId,
    next_scene: Option<(SceneIndex, String)>,
    active_scene: Option<SceneIndex>,
    migration_pending: bool,
}

impl TransitionState {
    pub fn new() -> Self {
        Self {
            phase: SwitchPhase::Idle,
            switch_id: SwitchId::EMPTY,
            next_scene: None,
            active_scene: None,
            migration_pending: false,
        }
    }

    pub fn begin(
        &mut self,
        switch_id: SwitchId,
        scene_index: SceneIndex,
        scene_name: &str,
        phase: SwitchPhase,
    ) {
        self.phase = phase;
        self.switch_id = switch_id;
        self.next_scene = Some((scene_index, scene_name.to_string()));
    }

    /// Returns to idle. Called on every exit path of a switch, so no flag
    /// can stay set after the switch ends.
    pub fn reset(&mut self) {
        self.phase = SwitchPhase::Idle;
        self.switch_id = SwitchId::EMPTY;
        self.next_scene = None;
        self.migration_pending = false;
    }

    pub fn phase(&self) -> SwitchPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: SwitchPhase) {
        self.phase = phase;
    }

    pub fn is_switching(&self) -> bool {
        self.phase != SwitchPhase::Idle
    }

    pub fn switch_id(&self) -> SwitchId {
        self.switch_id
    }

    pub fn next_scene_index(&self) -> Option<SceneIndex> {
        self.next_scene.as_ref().map(|(index, _)| *index)
    }

    pub fn next_scene_name(&self) -> Option<&str> {
        self.next_scene.as_ref().map(|(_, name)| name.as_str())
    }

    pub fn active_scene(&self) -> Option<SceneIndex> {
        self.active_scene
    }

    pub fn set_active_scene(&mut self, scene_index: SceneIndex) {
        self.active_scene = Some(scene_index);
    }

    pub fn migration_pending(&self) -> bool {
        self.migration_pending
    }

    pub fn set_migration_pending(&mut self, pending: bool) {
        self.migration_pending = pending;
    }
}

impl Default for TransitionState {
    fn default() -> Self {
        Self::new()
    }
}
