pub mod scene_graph;
pub mod scene_world;
pub mod spawn_registry;
