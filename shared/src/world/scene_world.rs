use std::hash::Hash;

use crate::{SceneGraph, SpawnRegistry};

/// A world that is both a scene graph and a spawn registry. Implemented for
/// every such type, and object-safe so loaders can take `&mut dyn SceneWorld<E>`.
pub trait SceneWorld<E: Copy + Eq + Hash>: SceneGraph<E> + SpawnRegistry<E> {}

impl<E: Copy + Eq + Hash, W: SceneGraph<E> + SpawnRegistry<E>> SceneWorld<E> for W {}
