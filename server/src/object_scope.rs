use std::hash::Hash;

use sceneshift_shared::EndpointId;

use crate::SceneServer;

pub struct ObjectScopeRef<'s, E: Copy + Eq + Hash + 'static> {
    server: &'s SceneServer<E>,
    endpoint: EndpointId,
}

impl<'s, E: Copy + Eq + Hash + 'static> ObjectScopeRef<'s, E> {
    pub(crate) fn new(server: &'s SceneServer<E>, endpoint: &EndpointId) -> Self {
        Self {
            server,
            endpoint: *endpoint,
        }
    }

    /// Returns true if the object would be in this endpoint's snapshots
    pub fn has(&self, object: &E) -> bool {
        self.server.scope_has_object(&self.endpoint, object)
    }
}

pub struct ObjectScopeMut<'s, E: Copy + Eq + Hash + 'static> {
    server: &'s mut SceneServer<E>,
    endpoint: EndpointId,
}

impl<'s, E: Copy + Eq + Hash + 'static> ObjectScopeMut<'s, E> {
    pub(crate) fn new(server: &'s mut SceneServer<E>, endpoint: &EndpointId) -> Self {
        Self {
            server,
            endpoint: *endpoint,
        }
    }

    /// Returns true if the object would be in this endpoint's snapshots
    pub fn has(&self, object: &E) -> bool {
        self.server.scope_has_object(&self.endpoint, object)
    }

    /// Makes the object visible to this endpoint
    pub fn include(&mut self, object: &E) -> &mut Self {
        self.server.scope_set_object(&self.endpoint, object, true);

        self
    }

    /// Hides the object from this endpoint
    pub fn exclude(&mut self, object: &E) -> &mut Self {
        self.server.scope_set_object(&self.endpoint, object, false);

        self
    }

    /// Drops every override, so all objects follow the configured default
    pub fn clear(&mut self) -> &mut Self {
        self.server.scope_clear(&self.endpoint);

        self
    }
}
