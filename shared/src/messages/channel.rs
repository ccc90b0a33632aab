use std::fmt;

/// The named channels scene switching travels on. The transport must deliver
/// both reliably and in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageChannel {
    /// Server to Client: target scene, switch id and object snapshot
    SwitchScene,
    /// Client to Server: acknowledgement of a finished switch
    SwitchSceneCompleted,
}

impl MessageChannel {
    pub const ALL: [MessageChannel; 2] = [
        MessageChannel::SwitchScene,
        MessageChannel::SwitchSceneCompleted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MessageChannel::SwitchScene => "SWITCH_SCENE",
            MessageChannel::SwitchSceneCompleted => "CLIENT_SWITCH_SCENE_COMPLETED",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.name() == name)
    }
}

impl fmt::Display for MessageChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
