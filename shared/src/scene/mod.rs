pub mod config;
pub mod error;
pub mod external;
pub mod loader;
pub mod migration;
pub mod policy;
pub mod registry;
pub mod transition;
