use sceneshift_serde::{BitReader, BitWrite, Serde};

use crate::{
    EndpointId, NetworkId, ObjectRecord, SceneConfig, SnapshotError, SyncMode, TemplateRef,
    Transform,
};

// player flag + network id + owner + parent flag + smallest template
const MIN_RECORD_BITS: usize = 1 + 64 + 64 + 1 + 64;

/// Encodes and decodes the object list carried by a scene switch.
///
/// Layout: a `u32` record count, then per record the player flag, network id,
/// owner, optional parent, the template in the configured [`SyncMode`] and,
/// with variable replication on, an optional length-prefixed field blob.
/// Both sides must be built from the same [`SceneConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotCodec {
    sync_mode: SyncMode,
    variable_replication: bool,
}

impl SnapshotCodec {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            sync_mode: config.sync_mode,
            variable_replication: config.variable_replication,
        }
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    pub fn variable_replication(&self) -> bool {
        self.variable_replication
    }

    /// Writes `records` in order. Nothing is written if any record is invalid.
    pub fn write(
        &self,
        records: &[ObjectRecord],
        writer: &mut dyn BitWrite,
    ) -> Result<(), SnapshotError> {
        let Ok(count) = u32::try_from(records.len()) else {
            return Err(SnapshotError::TooManyRecords {
                count: records.len(),
            });
        };
        for record in records {
            let actual = record.template.sync_mode();
            if actual != self.sync_mode {
                return Err(SnapshotError::TemplateMismatch {
                    network_id: record.network_id,
                    expected: self.sync_mode,
                    actual,
                });
            }
        }

        count.ser(writer);
        for record in records {
            self.write_record(record, writer);
        }
        Ok(())
    }

    /// Reads every record, in the order they were written
    pub fn read(&self, reader: &mut BitReader) -> Result<Vec<ObjectRecord>, SnapshotError> {
        let count = u32::de(reader)? as usize;

        // a forged count must not reserve more than the payload can hold
        let mut records = Vec::with_capacity(count.min(reader.bits_remaining() / MIN_RECORD_BITS));
        for _ in 0..count {
            records.push(self.read_record(reader)?);
        }
        Ok(records)
    }

    fn write_record(&self, record: &ObjectRecord, writer: &mut dyn BitWrite) {
        record.is_player_object.ser(writer);
        record.network_id.ser(writer);
        record.owner.ser(writer);
        record.parent.ser(writer);

        match &record.template {
            TemplateRef::Prefab {
                prefab_hash,
                transform,
            } => {
                prefab_hash.ser(writer);
                transform.ser(writer);
            }
            TemplateRef::SceneInstance { instance_id } => {
                instance_id.ser(writer);
            }
        }

        if self.variable_replication {
            record.field_data.ser(writer);
        }
    }

    fn read_record(&self, reader: &mut BitReader) -> Result<ObjectRecord, SnapshotError> {
        let is_player_object = bool::de(reader)?;
        let network_id = NetworkId::de(reader)?;
        let owner = EndpointId::de(reader)?;
        let parent = Option::<NetworkId>::de(reader)?;

        let template = match self.sync_mode {
            SyncMode::PrefabHash => TemplateRef::Prefab {
                prefab_hash: u64::de(reader)?,
                transform: Transform::de(reader)?,
            },
            SyncMode::SceneInstance => TemplateRef::SceneInstance {
                instance_id: u64::de(reader)?,
            },
        };

        let field_data = if self.variable_replication {
            Option::<Box<[u8]>>::de(reader)?
        } else {
            None
        };

        Ok(ObjectRecord {
            is_player_object,
            network_id,
            owner,
            parent,
            template,
            field_data,
        })
    }
}
