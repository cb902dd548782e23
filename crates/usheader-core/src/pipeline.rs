//! End-to-end header generation.
//!
//! The pipeline is a pure function of (script text, manifest, options):
//!
//! 1. `source::scan`      → raw grant tokens
//! 2. `meta::resolve`     → merged metadata record
//! 3. `header::serialize` → ordered, sentinel-wrapped header text
//!
//! [`HeaderSession`] holds the manifest and options for one build so they
//! are loaded once and shared by every artifact of that build.

use std::path::Path;

use crate::error::Result;
use crate::header::serialize::{HeaderLine, header_lines, render_header};
use crate::meta::manifest::Manifest;
use crate::meta::options::HeaderOptions;
use crate::meta::record::MetadataRecord;
use crate::meta::resolve::resolve_metadata;
use crate::report::model::{Report, ToolInfo};
use crate::source::{read::read_artifact, scan::scan};

/// Everything the pipeline derived for one artifact.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Raw scanner output, duplicates included.
    pub detected_grants: Vec<String>,
    pub record: MetadataRecord,
    pub lines: Vec<HeaderLine>,
    pub header: String,
}

/// Run the full pipeline for one artifact.
pub fn resolve_artifact(
    code: &str,
    manifest: &Manifest,
    options: &HeaderOptions,
) -> Result<Resolution> {
    let detected_grants = scan(code)?;
    let record = resolve_metadata(manifest, &detected_grants, options)?;

    let repository_base = manifest.repository_base();
    let lines = header_lines(&record, repository_base.as_deref())?;
    let header = render_header(&lines);

    Ok(Resolution {
        detected_grants,
        record,
        lines,
        header,
    })
}

/// Header block for `code`.
pub fn generate_header(code: &str, manifest: &Manifest, options: &HeaderOptions) -> Result<String> {
    Ok(resolve_artifact(code, manifest, options)?.header)
}

/// `code` with its header prepended and separated by a blank line.
pub fn prepend_header(code: &str, manifest: &Manifest, options: &HeaderOptions) -> Result<String> {
    let header = generate_header(code, manifest, options)?;
    Ok(format!("{header}\n\n{code}"))
}

/// Manifest and options shared by all artifacts of one build.
#[derive(Debug, Clone)]
pub struct HeaderSession {
    manifest: Manifest,
    options: HeaderOptions,
}

impl HeaderSession {
    pub fn new(manifest: Manifest, options: HeaderOptions) -> Self {
        Self { manifest, options }
    }

    /// Load the manifest from `manifest_path`. A missing manifest is fatal.
    pub fn load(manifest_path: &Path, options: HeaderOptions) -> Result<Self> {
        Ok(Self::new(Manifest::load(manifest_path)?, options))
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn options(&self) -> &HeaderOptions {
        &self.options
    }

    pub fn resolve(&self, code: &str) -> Result<Resolution> {
        resolve_artifact(code, &self.manifest, &self.options)
    }

    pub fn header_for(&self, code: &str) -> Result<String> {
        generate_header(code, &self.manifest, &self.options)
    }

    /// Output artifact text: header, blank line, original code.
    pub fn apply(&self, code: &str) -> Result<String> {
        prepend_header(code, &self.manifest, &self.options)
    }
}

/// Read an artifact from disk and build an inspection report for it.
pub fn inspect(artifact_path: &Path, session: &HeaderSession, tool: ToolInfo) -> anyhow::Result<Report> {
    let artifact = read_artifact(artifact_path)?;
    let resolution = session.resolve(&artifact.code)?;

    Ok(Report::new(tool, artifact.to_artifact(), resolution))
}
