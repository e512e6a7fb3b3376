use crate::config::types::{Config, ConfigOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Config file read when no path is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "validationConfig.json";

/// Parses a configuration file from the given path
///
/// The format is picked from the file extension: `.json` or `.toml`.
/// Missing keys take their default values; the result is not validated.
pub fn parse_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        other => Err(ConfigError::UnsupportedFormat(format!(
            "{} (extension {:?}, expected .json or .toml)",
            path.display(),
            other.unwrap_or("")
        ))),
    }
}

/// Loads, overrides and validates the configuration
///
/// # Arguments
///
/// * `path` - Explicit config file; when `None`, `validationConfig.json` in
///   the working directory is used if it exists, otherwise defaults apply
/// * `overrides` - Command-line values that take precedence over the file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitemap_link_validator::config::{load_config, ConfigOverrides};
///
/// let config = load_config(Some(Path::new("validationConfig.json")), ConfigOverrides::default()).unwrap();
/// println!("Validating {} with {} workers", config.site_url, config.workers);
/// ```
pub fn load_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                tracing::debug!("Using default config file {}", DEFAULT_CONFIG_FILE);
                parse_config_file(default_path)?
            } else {
                Config::default()
            }
        }
    };

    overrides.apply(&mut config);

    validate(&config)?;

    Ok(config)
}

/// Splits a comma-separated CLI value into trimmed, non-empty items
///
/// ```
/// use sitemap_link_validator::config::split_list;
///
/// assert_eq!(split_list("200, 2xx,,403"), vec!["200", "2xx", "403"]);
/// ```
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
