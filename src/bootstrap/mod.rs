//! Process bootstrap: configuration, logging and dependency wiring.

pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{default_config_path, load_config};
pub use wiring::{build_orchestrator, Overrides, ResolvedSettings};
