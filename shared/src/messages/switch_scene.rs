use sceneshift_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

use crate::{ObjectRecord, SceneIndex, SnapshotCodec, SnapshotError, SwitchId};

/// Payload of [`MessageChannel::SwitchScene`](crate::MessageChannel::SwitchScene)
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchSceneMessage {
    pub scene_index: SceneIndex,
    pub switch_id: SwitchId,
    /// Objects the receiver must recreate, already filtered to what it may see
    pub snapshot: Vec<ObjectRecord>,
}

impl SwitchSceneMessage {
    pub fn write(
        &self,
        codec: &SnapshotCodec,
        writer: &mut dyn BitWrite,
    ) -> Result<(), SnapshotError> {
        self.scene_index.ser(writer);
        self.switch_id.ser(writer);
        codec.write(&self.snapshot, writer)
    }

    pub fn read(codec: &SnapshotCodec, reader: &mut BitReader) -> Result<Self, SnapshotError> {
        let scene_index = SceneIndex::de(reader)?;
        let switch_id = SwitchId::de(reader)?;
        let snapshot = codec.read(reader)?;

        Ok(Self {
            scene_index,
            switch_id,
            snapshot,
        })
    }

    pub fn to_bytes(&self, codec: &SnapshotCodec) -> Result<Box<[u8]>, SnapshotError> {
        let mut writer = BitWriter::new();
        self.write(codec, &mut writer)?;
        Ok(writer.to_bytes())
    }

    pub fn from_bytes(codec: &SnapshotCodec, bytes: &[u8]) -> Result<Self, SnapshotError> {
        let mut reader = BitReader::new(bytes);
        Self::read(codec, &mut reader)
    }
}

/// Payload of
/// [`MessageChannel::SwitchSceneCompleted`](crate::MessageChannel::SwitchSceneCompleted)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchCompletedMessage {
    pub switch_id: SwitchId,
}

impl SwitchCompletedMessage {
    pub fn new(switch_id: SwitchId) -> Self {
        Self { switch_id }
    }

    pub fn to_bytes(&self) -> Box<[u8]> {
        let mut writer = BitWriter::with_capacity(16);
        self.ser(&mut writer);
        writer.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerdeErr> {
        let mut reader = BitReader::new(bytes);
        Self::de(&mut reader)
    }
}

impl Serde for SwitchCompletedMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.switch_id.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            switch_id: SwitchId::de(reader)?,
        })
    }
}
