pub mod error;
pub mod header;
pub mod meta;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod util;

pub use pipeline::{
    HeaderSession, Resolution, generate_header, inspect, prepend_header, resolve_artifact,
};

pub const TOOL_NAME: &str = "usheader";

/// JSON schema version of inspection reports.
/// Bump only when the report shape changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";
