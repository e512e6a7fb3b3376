//! Configuration module
//!
//! This module handles loading, overriding, and validating the validator
//! configuration. Files may be JSON (`validationConfig.json`) or TOML.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_link_validator::config::{load_config, ConfigOverrides};
//!
//! let config = load_config(None, ConfigOverrides::default()).unwrap();
//! println!("Validator will use {} workers", config.workers);
//! ```

mod parser;
mod status;
mod types;
mod validation;

// Re-export types
pub use status::StatusMatcher;
pub use types::{Config, ConfigOverrides, DEFAULT_SUCCESS_STATUS_CODES, DEFAULT_WORKERS};
pub use validation::MAX_WORKERS;

// Re-export parser functions
pub use parser::{load_config, parse_config_file, split_list, DEFAULT_CONFIG_FILE};
