pub mod channel;
pub mod switch_scene;
