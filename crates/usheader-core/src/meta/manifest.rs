use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{HeaderError, Result};
use crate::meta::url::normalize_repository_url;

/// Conventional manifest location, relative to the project directory.
pub const DEFAULT_MANIFEST: &str = "package.json";

/// The subset of `package.json` that feeds the userscript header.
///
/// Top-level descriptive fields are kept as raw JSON because their shape
/// is not enforced by npm (e.g. `author` may be a string or an object).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: Option<Value>,
    pub version: Option<Value>,
    pub author: Option<Value>,
    pub description: Option<Value>,
    pub license: Option<Value>,
    pub homepage: Option<Value>,

    /// Published script file name, used for the default download URL.
    pub main: Option<String>,

    pub repository: Option<Repository>,

    /// Project-level header fields declared directly in the manifest.
    pub userscript_metadata: Option<Map<String, Value>>,
}

/// `repository` as npm allows it: a URL string or `{ type, url }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Repository {
    Url(String),
    Detailed { url: Option<String> },
    Other(Value),
}

impl Manifest {
    /// Load the manifest from `path`.
    ///
    /// A missing file is a configuration error naming the absolute path
    /// that was expected.
    pub fn load(path: &Path) -> Result<Self> {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        tracing::info!(path = %path.display(), "using manifest");

        if !path.exists() {
            return Err(HeaderError::ManifestNotFound { path });
        }

        let text = fs::read_to_string(&path).map_err(|source| HeaderError::ManifestRead {
            path: path.clone(),
            source,
        })?;

        Self::parse(&text, path)
    }

    /// Parse manifest JSON. `path` is only used for error reporting.
    pub fn parse(text: &str, path: impl Into<PathBuf>) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| HeaderError::ManifestInvalid {
            path: path.into(),
            source,
        })
    }

    /// Repository URL with `git+` / `.git` stripped, if one is declared.
    pub fn repository_base(&self) -> Option<String> {
        let url = match self.repository.as_ref()? {
            Repository::Url(url) => url.as_str(),
            Repository::Detailed { url } => url.as_deref()?,
            Repository::Other(_) => return None,
        };
        normalize_repository_url(url)
    }

    /// Value of a top-level descriptive field, ready for the header.
    ///
    /// `author` objects are rendered in npm person format.
    pub fn top_level(&self, field: &str) -> Option<Value> {
        let value = match field {
            "name" => self.name.as_ref(),
            "version" => self.version.as_ref(),
            "author" => return self.author.as_ref().and_then(person),
            "description" => self.description.as_ref(),
            "license" => self.license.as_ref(),
            "homepage" => self.homepage.as_ref(),
            _ => None,
        };
        value.cloned()
    }
}

/// `{ "name", "email", "url" }` → `name <email> (url)`.
fn person(value: &Value) -> Option<Value> {
    let Value::Object(fields) = value else {
        return Some(value.clone());
    };

    let part = |key: &str| fields.get(key).and_then(Value::as_str);
    let rendered: Vec<String> = [
        part("name").map(str::to_string),
        part("email").map(|e| format!("<{e}>")),
        part("url").map(|u| format!("({u})")),
    ]
    .into_iter()
    .flatten()
    .collect();

    (!rendered.is_empty()).then(|| Value::String(rendered.join(" ")))
}
