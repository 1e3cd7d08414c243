pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{connect, migrate, SqlitePortRepository};
pub use app::PortService;
pub use config::toml_config::TomlConfig;
pub use crate::core::{FileImporter, ImportSummary, Port, ShutdownSignal};
pub use utils::error::{PortsError, Result};
