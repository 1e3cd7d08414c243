use crate::utils::error::{PortsError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    if path.contains('\0') {
        return Err(PortsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    match Path::new(file).extension().and_then(|ext| ext.to_str()) {
        Some(extension) if allowed_extensions.contains(&extension.to_ascii_lowercase().as_str()) => {
            Ok(())
        }
        Some(extension) => Err(PortsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(PortsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

/// `:memory:` 或檔案路徑
pub fn validate_database_path(field_name: &str, path: &str) -> Result<()> {
    if path == ":memory:" {
        return Ok(());
    }
    validate_path(field_name, path)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PortsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("import.file", "./data/ports.json").is_ok());
        assert!(validate_path("import.file", "").is_err());
        assert!(validate_path("import.file", "   ").is_err());
        assert!(validate_path("import.file", "ports\0.json").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("import.file", "ports.json", &["json"]).is_ok());
        assert!(validate_file_extension("import.file", "PORTS.JSON", &["json"]).is_ok());
        assert!(validate_file_extension("import.file", "ports.csv", &["json"]).is_err());
        assert!(validate_file_extension("import.file", "ports", &["json"]).is_err());
    }

    #[test]
    fn test_validate_database_path() {
        assert!(validate_database_path("database.path", ":memory:").is_ok());
        assert!(validate_database_path("database.path", "ports.db").is_ok());
        assert!(validate_database_path("database.path", "").is_err());
    }
}
