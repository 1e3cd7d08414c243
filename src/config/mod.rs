pub mod toml_config;

pub const DEFAULT_SOURCE_FILE: &str = "./data/ports.json";
pub const DEFAULT_DATABASE: &str = ":memory:";

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::TomlConfig;
    use super::{DEFAULT_DATABASE, DEFAULT_SOURCE_FILE};
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_database_path, validate_file_extension, validate_path, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
    #[command(name = "json-ports")]
    #[command(about = "Stream a JSON ports file into a SQLite store")]
    pub struct CliConfig {
        /// JSON file with ports keyed by unloc [default: ./data/ports.json]
        #[arg(short, long)]
        pub file: Option<String>,

        /// SQLite database path [default: :memory:]
        #[arg(short, long)]
        pub database: Option<String>,

        /// TOML configuration file; explicit flags override its values
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log process CPU and memory around the import")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// 命令列有指定的值覆蓋 TOML 設定
        pub fn apply_overrides(&self, config: &mut TomlConfig) {
            if let Some(file) = &self.file {
                config.import.file = file.clone();
            }
            if let Some(database) = &self.database {
                config.database.path = database.clone();
            }
            if self.monitor {
                config.monitoring.get_or_insert_with(Default::default).enabled = true;
            }
            if self.json_logs {
                config.logging.get_or_insert_with(Default::default).json = true;
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn source_file(&self) -> &str {
            self.file.as_deref().unwrap_or(DEFAULT_SOURCE_FILE)
        }

        fn database_path(&self) -> &str {
            self.database.as_deref().unwrap_or(DEFAULT_DATABASE)
        }

        fn monitoring_enabled(&self) -> bool {
            self.monitor
        }

        fn json_logs(&self) -> bool {
            self.json_logs
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("file", self.source_file())?;
            validate_file_extension("file", self.source_file(), &["json"])?;
            validate_database_path("database", self.database_path())
        }
    }

}
