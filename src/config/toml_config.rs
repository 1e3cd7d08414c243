use crate::config::{DEFAULT_DATABASE, DEFAULT_SOURCE_FILE};
use crate::core::ConfigProvider;
use crate::utils::error::{PortsError, Result};
use crate::utils::validation::{
    validate_database_path, validate_file_extension, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub monitoring: Option<MonitoringConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    pub file: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_SOURCE_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PortsError::ConfigError {
            message: format!("failed to read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PortsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PORTS_DB})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PortsError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_file(&self) -> &str {
        &self.import.file
    }

    fn database_path(&self) -> &str {
        &self.database.path
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    fn json_logs(&self) -> bool {
        self.logging.as_ref().map(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("import.file", &self.import.file)?;
        validate_file_extension("import.file", &self.import.file, &["json"])?;
        validate_database_path("database.path", &self.database.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[import]
file = "./data/ports.json"

[database]
path = "./ports.db"

[monitoring]
enabled = true

[logging]
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source_file(), "./data/ports.json");
        assert_eq!(config.database_path(), "./ports.db");
        assert!(config.monitoring_enabled());
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.source_file(), DEFAULT_SOURCE_FILE);
        assert_eq!(config.database_path(), DEFAULT_DATABASE);
        assert!(!config.monitoring_enabled());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("JSON_PORTS_TEST_DB", "/tmp/ports-test.db");

        let toml_content = r#"
[database]
path = "${JSON_PORTS_TEST_DB}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.database_path(), "/tmp/ports-test.db");

        std::env::remove_var("JSON_PORTS_TEST_DB");
    }

    #[test]
    fn test_unset_env_var_is_left_as_is() {
        let toml_content = r#"
[database]
path = "${JSON_PORTS_SURELY_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.database_path(), "${JSON_PORTS_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[import]
file = "./data/ports.xml"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = TomlConfig::from_toml_str("[import\nfile = 1").unwrap_err();
        assert!(matches!(err, PortsError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let err = TomlConfig::from_file("./no/such/json-ports.toml").unwrap_err();
        assert!(matches!(err, PortsError::ConfigError { .. }));
        assert!(err.user_friendly_message().contains("no/such/json-ports.toml"));
        assert_eq!(
            err.recovery_suggestion(),
            "Check the command line flags and the TOML config file"
        );
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[import]
file = "./fixtures/ports.json"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.source_file(), "./fixtures/ports.json");
    }
}
