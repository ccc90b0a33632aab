mod client_config;
pub use client_config::ClientConfig;

mod scene_client;
pub use scene_client::SceneClient;
