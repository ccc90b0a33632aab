use std::collections::{BTreeMap, HashMap};

use log::info;

use crate::{HostType, SceneConfig, SceneIndex, SceneRegistryError};

/// Bidirectional mapping between scene names and their network indices.
///
/// Entries are never mutated or removed once registered, so an index always
/// refers to the same scene on every participant that shares a
/// [`SceneConfig`].
pub struct SceneRegistry {
    allow_runtime_changes: bool,
    name_to_index: HashMap<String, SceneIndex>,
    index_to_name: BTreeMap<SceneIndex, String>,
}

impl SceneRegistry {
    /// Registers every scene of `config.scenes`, indexed by position
    pub fn new(config: &SceneConfig) -> Result<Self, SceneRegistryError> {
        let mut registry = Self {
            allow_runtime_changes: config.allow_runtime_scene_changes,
            name_to_index: HashMap::new(),
            index_to_name: BTreeMap::new(),
        };

        for (position, name) in config.scenes.iter().enumerate() {
            let Ok(index) = u32::try_from(position) else {
                return Err(SceneRegistryError::IndicesExhausted);
            };
            registry.insert(name, SceneIndex::new(index))?;
        }

        Ok(registry)
    }

    /// Registers `name` at runtime under the next free index
    pub fn register(
        &mut self,
        host: HostType,
        name: &str,
    ) -> Result<SceneIndex, SceneRegistryError> {
        self.check_runtime_registration(host, name)?;

        let index = match self.index_to_name.keys().next_back() {
            Some(last) => {
                let Some(next) = last.value().checked_add(1) else {
                    return Err(SceneRegistryError::IndicesExhausted);
                };
                SceneIndex::new(next)
            }
            None => SceneIndex::new(0),
        };

        self.insert(name, index)?;
        info!("registered scene `{}` at runtime with index {}", name, index);
        Ok(index)
    }

    /// Registers `name` at runtime under an explicit index
    pub fn register_with_index(
        &mut self,
        host: HostType,
        name: &str,
        index: SceneIndex,
    ) -> Result<(), SceneRegistryError> {
        self.check_runtime_registration(host, name)?;
        self.insert(name, index)?;
        info!("registered scene `{}` at runtime with index {}", name, index);
        Ok(())
    }

    pub fn index_of(&self, name: &str) -> Option<SceneIndex> {
        self.name_to_index.get(name).copied()
    }

    pub fn name_of(&self, index: &SceneIndex) -> Option<&str> {
        self.index_to_name.get(index).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.index_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_name.is_empty()
    }

    /// All registered scenes, ordered by index
    pub fn iter(&self) -> impl Iterator<Item = (SceneIndex, &str)> {
        self.index_to_name
            .iter()
            .map(|(index, name)| (*index, name.as_str()))
    }

    fn check_runtime_registration(
        &self,
        host: HostType,
        name: &str,
    ) -> Result<(), SceneRegistryError> {
        if !host.is_authority() {
            return Err(SceneRegistryError::NotAuthority {
                name: name.to_string(),
            });
        }
        if !self.allow_runtime_changes {
            return Err(SceneRegistryError::RuntimeChangesDisabled {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, index: SceneIndex) -> Result<(), SceneRegistryError> {
        if self.name_to_index.contains_key(name) {
            return Err(SceneRegistryError::DuplicateName {
                name: name.to_string(),
            });
        }
        if let Some(existing) = self.index_to_name.get(&index) {
            return Err(SceneRegistryError::DuplicateIndex {
                index,
                existing: existing.clone(),
            });
        }

        self.name_to_index.insert(name.to_string(), index);
        self.index_to_name.insert(index, name.to_string());
        Ok(())
    }
}
