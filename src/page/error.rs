//! Page processing error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, parsing or rendering a listing page
#[derive(Debug, Error)]
pub enum PageError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("HTML parse error at position {position}")]
    Parse {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("failed to write rendered page: {0}")]
    Write(String),
}
