//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::KilnConfig;
use std::path::Path;

/// Name of the configuration file within a project directory.
pub const CONFIG_FILE: &str = "kiln.toml";

/// Loads and validates `kiln.toml` from a project directory.
///
/// Relative paths in the file are resolved against `project_dir`.
pub fn load_config(project_dir: &Path) -> Result<KilnConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file at an explicit path.
///
/// Relative paths in the file are resolved against the file's directory.
pub fn load_config_file(path: &Path) -> Result<KilnConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config = load_config_from_str(&content)?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}

/// Parses and validates a `kiln.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies. Paths are left as
/// written.
pub fn load_config_from_str(content: &str) -> Result<KilnConfig, ConfigError> {
    let config: KilnConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
fn validate_config(config: &KilnConfig) -> Result<(), ConfigError> {
    if config.toolchain.version.trim().is_empty() {
        return Err(ConfigError::MissingField("toolchain.version".to_string()));
    }
    if config.toolchain.library_jar.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("toolchain.library_jar".to_string()));
    }
    if config.toolchain.compiler_jar.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("toolchain.compiler_jar".to_string()));
    }
    if config.engine.version.trim().is_empty() {
        return Err(ConfigError::MissingField("engine.version".to_string()));
    }
    if config.compile.max_errors == 0 {
        return Err(ConfigError::ValidationError(
            "compile.max_errors must be at least 1".to_string(),
        ));
    }
    for (dir_name, store_name) in &config.analysis.layout {
        if dir_name.is_empty() || store_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "analysis.layout entries must not be empty".to_string(),
            ));
        }
        if store_name.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(format!(
                "analysis store name '{store_name}' must not contain path separators"
            )));
        }
    }
    Ok(())
}
