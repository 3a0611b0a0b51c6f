use crate::config::types::Config;
use crate::ConfigError;
use std::path::Path;

/// Loads a configuration file from the given path
///
/// The result is not validated yet: command-line overrides may still be
/// applied on top of it before [`crate::config::validate`] runs.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text; missing keys take their defaults
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}
