use crate::{SceneIndex, SwitchId};

/// A transition handed to application code in `SwitchMode::External`.
/// Application code loads `scene_name` itself, then passes `switch_id` back to
/// `complete_switch`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalSwitch {
    pub switch_id: SwitchId,
    pub scene_index: SceneIndex,
    pub scene_name: String,
}
