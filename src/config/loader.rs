//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{StorageBackend, VeilConfig};
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VeilConfig
/// 4. Applies environment variable overrides (VEIL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use veil::config::loader::load_config;
///
/// let config = load_config("veil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VeilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VeilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Parses configuration from TOML text, applying the same substitution,
/// overrides and validation as [`load_config`]
pub fn load_config_from_str(contents: &str) -> Result<VeilConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: VeilConfig = toml::from_str(&contents)
        .map_err(|e| VeilError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        VeilError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex"))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_regex();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comment lines are copied untouched
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VeilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using VEIL_* prefix
///
/// Environment variables follow the pattern: VEIL_<SECTION>_<KEY>
/// For example: VEIL_STORAGE_PATH, VEIL_ANONYMIZER_SAVE_MAPPINGS
fn apply_env_overrides(config: &mut VeilConfig) -> Result<()> {
    if let Ok(val) = std::env::var("VEIL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    config
        .anonymizer
        .apply_env_overrides()
        .map_err(|e| VeilError::Configuration(format!("{e:#}")))?;
    config
        .detection
        .apply_env_overrides()
        .map_err(|e| VeilError::Configuration(format!("{e:#}")))?;
    config
        .audit
        .apply_env_overrides()
        .map_err(|e| VeilError::Configuration(format!("{e:#}")))?;

    // Storage overrides
    if let Ok(val) = std::env::var("VEIL_STORAGE_BACKEND") {
        config.storage.backend = match val.to_lowercase().as_str() {
            "file" => StorageBackend::File,
            "memory" => StorageBackend::Memory,
            _ => {
                return Err(VeilError::Configuration(format!(
                    "Invalid VEIL_STORAGE_BACKEND: {val}"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("VEIL_STORAGE_PATH") {
        config.storage.path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("VEIL_STORAGE_RECOVER_CORRUPT_STATE") {
        config.storage.recover_corrupt_state = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("VEIL_TEST_STATE_DIR", "/var/lib/veil");
        let input = "path = \"${VEIL_TEST_STATE_DIR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "path = \"/var/lib/veil\"\n");
        std::env::remove_var("VEIL_TEST_STATE_DIR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("VEIL_TEST_MISSING_VAR");
        let input = "path = \"${VEIL_TEST_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("VEIL_TEST_COMMENTED_VAR");
        let input = "# path = \"${VEIL_TEST_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[anonymizer]
case_sensitive_terms = true

[storage]
backend = "memory"

[domain_specific_terms]
ORG = ["Acme Corp"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert!(config.anonymizer.case_sensitive_terms);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.domain_specific_terms["ORG"], vec!["Acme Corp"]);
    }
}
