use std::{collections::HashMap, hash::Hash};

use sceneshift_shared::EndpointId;

/// Per-endpoint visibility overrides for replicated objects. Objects without
/// an override fall back to the default the map was built with.
pub struct ObjectScopeMap<E: Copy + Eq + Hash> {
    visible_by_default: bool,
    overrides: HashMap<(EndpointId, E), bool>,
}

impl<E: Copy + Eq + Hash> ObjectScopeMap<E> {
    pub fn new(visible_by_default: bool) -> Self {
        Self {
            visible_by_default,
            overrides: HashMap::new(),
        }
    }

    pub fn is_visible(&self, endpoint: &EndpointId, object: &E) -> bool {
        self.overrides
            .get(&(*endpoint, *object))
            .copied()
            .unwrap_or(self.visible_by_default)
    }

    pub fn set(&mut self, endpoint: &EndpointId, object: &E, visible: bool) {
        self.overrides.insert((*endpoint, *object), visible);
    }

    /// Drops every override of `endpoint`
    pub fn remove_endpoint(&mut self, endpoint: &EndpointId) {
        self.overrides.retain(|(owner, _), _| owner != endpoint);
    }
}
