use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::header::serialize::HeaderLine;
use crate::meta::record::MetadataRecord;
use crate::pipeline::Resolution;

/// Inspection report for one artifact.
///
/// Output of `--format json`. Deterministic for identical inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub artifact: ArtifactInfo,
    pub grants: GrantsInfo,
    /// Resolved metadata in merge order.
    pub metadata: MetadataRecord,
    /// Header lines in emission order.
    pub lines: Vec<HeaderLine>,
    pub header: String,
}

impl Report {
    pub fn new(tool: ToolInfo, artifact: ArtifactInfo, resolution: Resolution) -> Self {
        let emitted = resolution
            .lines
            .iter()
            .filter(|l| l.key == "grant")
            .map(|l| l.value.clone())
            .collect();

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            artifact,
            grants: GrantsInfo {
                detected: resolution.detected_grants,
                emitted,
            },
            metadata: resolution.record,
            lines: resolution.lines,
            header: resolution.header,
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub commit: Option<String>,
}

/// Artifact metadata bound to this report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: ArtifactHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactHash {
    pub algorithm: String,
    pub value: String,
}

/// Grants before and after serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantsInfo {
    /// Raw scanner output, in document order with duplicates.
    pub detected: Vec<String>,
    /// `@grant` values as written to the header.
    pub emitted: Vec<String>,
}
