use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::report::model::{ArtifactHash, ArtifactInfo};

/// A bundled script loaded for header generation.
///
/// Holds the exact text that will be scanned and a fingerprint of it, so
/// a report can be tied back to the artifact it describes.
#[derive(Debug, Clone)]
pub struct ArtifactContext {
    /// Optional source path (informational only).
    pub path: Option<String>,

    /// Script text as read from disk.
    pub code: String,

    pub size_bytes: u64,

    pub hash_alg: String,

    /// Hex-encoded hash of the script bytes.
    pub hash_hex: String,
}

impl ArtifactContext {
    /// Build a context from in-memory script text.
    pub fn from_code(path: Option<String>, code: String) -> Self {
        let digest = Sha256::digest(code.as_bytes());

        Self {
            path,
            size_bytes: code.len() as u64,
            code,
            hash_alg: "sha256".to_string(),
            hash_hex: hex::encode(digest),
        }
    }

    /// Report-facing artifact metadata. Drops the script text.
    pub fn to_artifact(&self) -> ArtifactInfo {
        ArtifactInfo {
            path: self.path.clone(),
            size_bytes: self.size_bytes,
            hash: ArtifactHash {
                algorithm: self.hash_alg.clone(),
                value: self.hash_hex.clone(),
            },
        }
    }
}

/// Read a script artifact from disk.
///
/// The fingerprint depends only on the file contents; filesystem metadata
/// is ignored.
pub fn read_artifact(path: &Path) -> Result<ArtifactContext> {
    let code = fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact: {}", path.display()))?;

    Ok(ArtifactContext::from_code(
        Some(path.display().to_string()),
        code,
    ))
}
