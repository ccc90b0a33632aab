//! Moves persistent objects around a destructive scene swap.
//!
//! Scene-graph parenting does not survive the swap, so both directions strip
//! the parent link. Parent/child relationships travel as data in snapshot
//! records instead and are reapplied by network id after recreation.

use std::hash::Hash;

use log::trace;

use crate::{SceneGraph, SceneRef, SceneTarget};

/// Detaches each object from its parent and moves it into the holding area
/// so it outlives the unload of the outgoing scene
pub fn migrate_out<E, G>(graph: &mut G, objects: &[E])
where
    E: Copy + Eq + Hash,
    G: SceneGraph<E> + ?Sized,
{
    for object in objects {
        unparent(graph, object);
        graph.move_object(object, SceneTarget::Holding);
    }
    trace!("migrated {} objects into holding", objects.len());
}

/// Detaches each object from its parent again (it may have been re-parented
/// while held) and moves it into `scene`
pub fn migrate_in<E, G>(graph: &mut G, objects: &[E], scene: &SceneRef)
where
    E: Copy + Eq + Hash,
    G: SceneGraph<E> + ?Sized,
{
    for object in objects {
        unparent(graph, object);
        graph.move_object(object, SceneTarget::Scene(*scene));
    }
    trace!("migrated {} objects into scene {:?}", objects.len(), scene);
}

fn unparent<E, G>(graph: &mut G, object: &E)
where
    E: Copy + Eq + Hash,
    G: SceneGraph<E> + ?Sized,
{
    if graph.parent(object).is_some() {
        graph.set_parent(object, None);
    }
}
