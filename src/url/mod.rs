//! URL handling module
//!
//! This module provides URL normalization, link resolution against the
//! site base URL, and ignore-pattern matching.

mod matcher;
mod normalize;

use thiserror::Error;

// Re-export main functions
pub use matcher::is_url_ignored;
pub use normalize::{normalize_url, resolve_link};

/// Reasons a string could not be turned into a checkable URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidUrl {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    Scheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}
