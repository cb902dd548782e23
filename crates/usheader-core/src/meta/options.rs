use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HeaderError, Result};

/// Caller-supplied header options.
///
/// `meta` is an open mapping of header fields. Its fields win over
/// everything derived from the manifest or the scan, except `grant`,
/// whose entries are appended to the detected grants instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl HeaderOptions {
    /// Load options from a JSON file shaped like `{ "meta": { ... } }`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| HeaderError::OptionsRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| HeaderError::OptionsInvalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set one override from a `KEY=VALUE` pair.
    ///
    /// `VALUE` is parsed as JSON when it is valid JSON (`true`, `["a","b"]`,
    /// `null`) and taken as a plain string otherwise.
    pub fn set_pair(&mut self, pair: &str) -> Result<()> {
        let (key, raw) = pair
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| HeaderError::InvalidMetaPair(pair.to_string()))?;

        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

        self.meta
            .get_or_insert_with(Map::new)
            .insert(key.trim().to_string(), value);
        Ok(())
    }
}
