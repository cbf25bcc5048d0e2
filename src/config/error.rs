//! Errors raised while loading `postfilter.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// Why a filter config could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read filter config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    /// Malformed TOML, an unknown key or a value of the wrong type.
    #[error("invalid filter config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Well-formed, but a value breaks the page contract (e.g. an empty class name).
    #[error("invalid filter config value: {0}")]
    Validation(String),
}
