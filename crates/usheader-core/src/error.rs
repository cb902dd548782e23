//! Error taxonomy for header generation.
//!
//! Every variant is fatal for the current artifact: there is no retry and
//! no partial header. Conditions that only look recoverable (no grants
//! detected, missing repository) are handled by resolution policy instead.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for header generation.
pub type Result<T> = std::result::Result<T, HeaderError>;

#[derive(Debug, Error)]
pub enum HeaderError {
    /// The project manifest does not exist at the expected location.
    #[error("{} not found!", .path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("failed to read manifest {}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest {} is not valid JSON", .path.display())]
    ManifestInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read options file {}", .path.display())]
    OptionsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("options file {} is not valid JSON", .path.display())]
    OptionsInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid metadata override `{0}`: expected KEY=VALUE")]
    InvalidMetaPair(String),

    /// The JavaScript grammar could not be loaded into the parser.
    #[error("failed to initialize parser: {0}")]
    Parser(String),

    /// Source text is not syntactically valid. Positions are 1-based.
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("grant entries must be strings, got {0}")]
    InvalidGrant(serde_json::Value),

    #[error("field `{key}` holds a mapping; only `resource` may be a mapping")]
    UnsupportedValue { key: String },
}
