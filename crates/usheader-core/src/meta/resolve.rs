//! Metadata resolution.
//!
//! Merges three sources into one [`MetadataRecord`], in this order:
//!
//!   1. the manifest's `userscriptMetadata` block
//!   2. top-level manifest fields and repository-derived URLs (fill gaps only)
//!   3. grants detected by the scanner (`none` when there are none)
//!   4. caller overrides (grants appended, every other field overwrites)
//!
//! The `none` seed is applied before caller grants are appended. A caller
//! that adds grants to a script without detected API usage therefore gets
//! `none` alongside its own grants.

use serde_json::{Map, Value};

use crate::error::{HeaderError, Result};
use crate::meta::manifest::Manifest;
use crate::meta::options::HeaderOptions;
use crate::meta::record::MetadataRecord;

/// Manifest fields copied into the header when not already set.
pub const INHERITED_FIELDS: [&str; 6] = [
    "name",
    "version",
    "author",
    "description",
    "license",
    "homepage",
];

/// Grant used when nothing else is requested.
pub const GRANT_NONE: &str = "none";

/// Build the metadata record for one artifact.
///
/// `scan_result` is the raw scanner output; duplicates are kept here and
/// collapsed by the serializer. `overrides` is never modified.
pub fn resolve_metadata(
    manifest: &Manifest,
    scan_result: &[String],
    overrides: &HeaderOptions,
) -> Result<MetadataRecord> {
    let mut record =
        MetadataRecord::from_map(manifest.userscript_metadata.clone().unwrap_or_default());

    let mut grant = match record.get("grant") {
        Some(value) => grant_tokens(value)?,
        None => Vec::new(),
    };

    for field in INHERITED_FIELDS {
        if record.is_set(field) {
            continue;
        }
        if let Some(value) = manifest.top_level(field) {
            record.set(field, value);
        }
    }

    if let Some(base) = manifest.repository_base() {
        if !record.is_set("downloadURL") {
            if let Some(main) = manifest.main.as_deref() {
                record.set(
                    "downloadURL",
                    Value::String(format!("{base}/releases/latest/download/{main}")),
                );
            }
        }
        if !record.is_set("updateURL") {
            if let Some(download) = record.get("downloadURL").cloned() {
                record.set("updateURL", download);
            }
        }
    }

    grant.extend(scan_result.iter().cloned());

    if grant.is_empty() {
        grant.push(GRANT_NONE.to_string());
    }

    let empty = Map::new();
    let meta = overrides.meta.as_ref().unwrap_or(&empty);

    if let Some(extra) = meta.get("grant") {
        grant.extend(grant_tokens(extra)?);
    }

    tracing::debug!(grants = ?grant, "resolved grants");
    record.set(
        "grant",
        Value::Array(grant.into_iter().map(Value::String).collect()),
    );

    for (key, value) in meta {
        if key != "grant" {
            record.set(key.clone(), value.clone());
        }
    }

    Ok(record)
}

/// Grant entries from a metadata value.
///
/// Accepts a list of strings or a single string; `null` and an empty list
/// contribute nothing.
fn grant_tokens(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(HeaderError::InvalidGrant(other.clone())),
            })
            .collect(),
        other => Err(HeaderError::InvalidGrant(other.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(value: Value) -> Manifest {
        serde_json::from_value(value).expect("valid manifest")
    }

    fn options(meta: Value) -> HeaderOptions {
        serde_json::from_value(json!({ "meta": meta })).expect("valid options")
    }

    fn project() -> Manifest {
        manifest(json!({
            "name": "demo",
            "version": "1.2.3",
            "author": "Jane",
            "description": "A demo script",
            "license": "MIT",
            "homepage": "https://example.com/demo",
            "main": "demo.user.js",
            "repository": "git+https://github.com/a/b.git"
        }))
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn copies_top_level_manifest_fields() {
        let r = resolve_metadata(&project(), &[], &HeaderOptions::default()).unwrap();

        assert_eq!(r.get("name"), Some(&json!("demo")));
        assert_eq!(r.get("version"), Some(&json!("1.2.3")));
        assert_eq!(r.get("author"), Some(&json!("Jane")));
        assert_eq!(r.get("description"), Some(&json!("A demo script")));
        assert_eq!(r.get("license"), Some(&json!("MIT")));
        assert_eq!(r.get("homepage"), Some(&json!("https://example.com/demo")));
    }

    #[test]
    fn derives_download_and_update_urls_from_repository() {
        let r = resolve_metadata(&project(), &[], &HeaderOptions::default()).unwrap();

        let url = json!("https://github.com/a/b/releases/latest/download/demo.user.js");
        assert_eq!(r.get("downloadURL"), Some(&url));
        assert_eq!(r.get("updateURL"), Some(&url));
    }

    #[test]
    fn update_url_follows_declared_download_url() {
        let m = manifest(json!({
            "main": "demo.user.js",
            "repository": "https://github.com/a/b",
            "userscriptMetadata": { "downloadURL": "https://cdn.example/demo.user.js" }
        }));

        let r = resolve_metadata(&m, &[], &HeaderOptions::default()).unwrap();

        assert_eq!(r.get("downloadURL"), Some(&json!("https://cdn.example/demo.user.js")));
        assert_eq!(r.get("updateURL"), Some(&json!("https://cdn.example/demo.user.js")));
    }

    #[test]
    fn no_repository_means_no_download_urls() {
        let m = manifest(json!({ "name": "demo", "main": "demo.user.js" }));
        let r = resolve_metadata(&m, &[], &HeaderOptions::default()).unwrap();

        assert!(r.get("downloadURL").is_none());
        assert!(r.get("updateURL").is_none());
    }

    #[test]
    fn manifest_block_wins_over_top_level_fields() {
        let m = manifest(json!({
            "name": "package-name",
            "userscriptMetadata": { "name": "Pretty Name", "namespace": "https://example.com" }
        }));

        let r = resolve_metadata(&m, &[], &HeaderOptions::default()).unwrap();

        assert_eq!(r.get("name"), Some(&json!("Pretty Name")));
        assert_eq!(r.get("namespace"), Some(&json!("https://example.com")));
    }

    #[test]
    fn empty_scan_seeds_none() {
        let r = resolve_metadata(&project(), &[], &HeaderOptions::default()).unwrap();
        assert_eq!(r.grants(), vec!["none"]);
    }

    #[test]
    fn scan_result_is_kept_raw() {
        let scan = tokens(&["GM.getValue", "GM.setValue", "GM.getValue"]);
        let r = resolve_metadata(&project(), &scan, &HeaderOptions::default()).unwrap();

        assert_eq!(r.grants(), vec!["GM.getValue", "GM.setValue", "GM.getValue"]);
    }

    #[test]
    fn none_is_seeded_before_override_grants() {
        let opts = options(json!({ "grant": ["GM.setValue", "GM.getValue", "GM.setValue"] }));
        let r = resolve_metadata(&project(), &[], &opts).unwrap();

        assert_eq!(
            r.grants(),
            vec!["none", "GM.setValue", "GM.getValue", "GM.setValue"]
        );
    }

    #[test]
    fn override_grants_append_to_scan_result() {
        let opts = options(json!({ "grant": ["GM_info"] }));
        let r = resolve_metadata(&project(), &tokens(&["unsafeWindow"]), &opts).unwrap();

        assert_eq!(r.grants(), vec!["unsafeWindow", "GM_info"]);
    }

    #[test]
    fn empty_override_grant_does_not_clear_grants() {
        let opts = options(json!({ "grant": [] }));
        let r = resolve_metadata(&project(), &[], &opts).unwrap();

        assert_eq!(r.grants(), vec!["none"]);
    }

    #[test]
    fn overrides_win_over_manifest() {
        let opts = options(json!({
            "version": "9.9.9",
            "downloadURL": "https://cdn.example/x.user.js",
            "noframes": true
        }));

        let r = resolve_metadata(&project(), &[], &opts).unwrap();

        assert_eq!(r.get("version"), Some(&json!("9.9.9")));
        assert_eq!(r.get("downloadURL"), Some(&json!("https://cdn.example/x.user.js")));
        assert_eq!(r.get("noframes"), Some(&json!(true)));
        // updateURL was derived before overrides were merged.
        assert_eq!(
            r.get("updateURL"),
            Some(&json!("https://github.com/a/b/releases/latest/download/demo.user.js"))
        );
    }

    #[test]
    fn null_override_removes_field_from_output() {
        let opts = options(json!({ "license": null }));
        let r = resolve_metadata(&project(), &[], &opts).unwrap();

        assert!(!r.is_set("license"));
    }

    #[test]
    fn overrides_are_not_modified() {
        let opts = options(json!({ "grant": ["GM.setValue"], "name": "x" }));
        let before = opts.clone();

        resolve_metadata(&project(), &[], &opts).unwrap();
        let again = resolve_metadata(&project(), &[], &opts).unwrap();

        assert_eq!(opts, before);
        assert_eq!(again.grants(), vec!["none", "GM.setValue"]);
    }

    #[test]
    fn manifest_block_grants_precede_scan_result() {
        let m = manifest(json!({ "userscriptMetadata": { "grant": ["GM_log"] } }));
        let r = resolve_metadata(&m, &tokens(&["GM.info"]), &HeaderOptions::default()).unwrap();

        assert_eq!(r.grants(), vec!["GM_log", "GM.info"]);
    }

    #[test]
    fn non_string_grant_is_rejected() {
        let opts = options(json!({ "grant": [1] }));
        let err = resolve_metadata(&project(), &[], &opts).unwrap_err();

        assert!(matches!(err, HeaderError::InvalidGrant(_)));
    }

    #[test]
    fn caller_fields_keep_insertion_order() {
        let opts = options(json!({ "zeta": "1", "alpha": "2" }));
        let r = resolve_metadata(&Manifest::default(), &[], &opts).unwrap();

        let keys: Vec<&str> = r.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["grant", "zeta", "alpha"]);
    }
}
