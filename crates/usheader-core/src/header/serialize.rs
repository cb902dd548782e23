use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HeaderError, Result};
use crate::header::order::sort_by_priority;
use crate::meta::record::{MetaValue, MetadataRecord};
use crate::meta::url::resolve_url;
use crate::util::deterministic::{dedupe_structural, display_form, sort_by_display};

pub const HEADER_OPEN: &str = "// ==UserScript==";
pub const HEADER_CLOSE: &str = "// ==/UserScript==";

/// Column width of the `@tag` name before its value.
pub const TAG_WIDTH: usize = 14;

/// One `// @key value` line of the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLine {
    pub key: String,
    pub value: String,
}

impl HeaderLine {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }

    /// Render with the tag padded to [`TAG_WIDTH`]. Trailing whitespace is
    /// trimmed, so bare flags end right after the tag.
    pub fn render(&self) -> String {
        format!(
            "// @{:<width$}{}",
            self.key,
            self.value,
            width = TAG_WIDTH
        )
        .trim_end()
        .to_string()
    }
}

/// Expand a record into header lines in emission order.
///
/// Fields are stably sorted by tag priority, then expanded by value type:
///
/// - `null`            → no line
/// - boolean           → bare tag (also for `false`)
/// - string / number   → one line
/// - `resource` object → `name url` per entry, URLs resolved
/// - `require` list    → one line per URL, resolved, order kept
/// - other lists       → deduplicated, sorted, one line per element
///
/// Relative URLs resolve against `repository_base`.
pub fn header_lines(
    record: &MetadataRecord,
    repository_base: Option<&str>,
) -> Result<Vec<HeaderLine>> {
    let mut entries: Vec<(&str, &Value)> = record.iter().collect();
    sort_by_priority(&mut entries);

    let mut lines = Vec::new();
    for (key, value) in entries {
        expand(key, value, repository_base, &mut lines)?;
    }
    Ok(lines)
}

fn expand(
    key: &str,
    value: &Value,
    repository_base: Option<&str>,
    lines: &mut Vec<HeaderLine>,
) -> Result<()> {
    match MetaValue::from(value) {
        MetaValue::Absent => {}
        MetaValue::Flag(_) => lines.push(HeaderLine::new(key, "")),
        MetaValue::Text(text) => lines.push(HeaderLine::new(key, text)),

        MetaValue::Map(resources) if key == "resource" => {
            for (name, url) in resources.iter().filter(|(_, url)| !url.is_null()) {
                let url = resolve_url(&display_form(url), repository_base);
                lines.push(HeaderLine::new(key, format!("{name} {url}")));
            }
        }
        MetaValue::Map(_) => {
            return Err(HeaderError::UnsupportedValue {
                key: key.to_string(),
            });
        }

        MetaValue::List(urls) if key == "require" => {
            for url in urls.iter().filter(|url| !url.is_null()) {
                lines.push(HeaderLine::new(
                    key,
                    resolve_url(&display_form(url), repository_base),
                ));
            }
        }
        MetaValue::List(items) => {
            let mut unique = dedupe_structural(items);
            sort_by_display(&mut unique);
            lines.extend(unique.iter().map(|v| HeaderLine::new(key, display_form(v))));
        }
    }
    Ok(())
}

/// Serialize a record into the sentinel-wrapped header block.
pub fn serialize_header(record: &MetadataRecord, repository_base: Option<&str>) -> Result<String> {
    Ok(render_header(&header_lines(record, repository_base)?))
}

/// Join rendered lines and wrap them in the header sentinels.
pub fn render_header(lines: &[HeaderLine]) -> String {
    let body: Vec<String> = lines.iter().map(HeaderLine::render).collect();
    format!("{HEADER_OPEN}\n{}\n{HEADER_CLOSE}", body.join("\n"))
}
