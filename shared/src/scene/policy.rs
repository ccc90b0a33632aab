use crate::SceneIndex;

/// Application hooks consulted by the switch state machine. The value each
/// hook returns is what the state machine acts on.
pub trait ScenePolicy {
    /// Whether a switch from the active scene (`None` if unknown) to
    /// `to` may begin
    fn is_switch_allowed(&self, _from: Option<&str>, _to: &str) -> bool {
        true
    }

    /// Whether a remote participant reporting `remote` is out of step with the
    /// local active scene
    fn has_scene_mismatch(&self, local: Option<SceneIndex>, remote: SceneIndex) -> bool {
        local != Some(remote)
    }
}

/// Allows every switch, reports a mismatch whenever indices differ
#[derive(Default)]
pub struct DefaultScenePolicy;

impl ScenePolicy for DefaultScenePolicy {}
