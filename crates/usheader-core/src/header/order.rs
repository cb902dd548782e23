//! Emission order of header tags.

/// Known tags, in the order they appear in a generated header.
pub const PRIORITY_ORDER: &[&str] = &[
    "name",
    "namespace",
    "copyright",
    "version",
    "author",
    "description",
    "homepage",
    "homepageURL",
    "website",
    "source",
    "icon",
    "iconURL",
    "defaulticon",
    "icon64",
    "icon64URL",
    "updateURL",
    "downloadURL",
    "supportURL",
    "license",
    "include",
    "match",
    "exclude",
    "exclude-match",
    "require",
    "resource",
    "connect",
    "run-at",
    "run-in",
    "sandbox",
    "inject-into",
    "tag",
    "grant",
    "antifeature",
    "webRequest",
    "noframes",
    "unwrap",
    "nocompat",
];

/// Position of `key` in [`PRIORITY_ORDER`].
///
/// Unknown keys map to `None`, which orders before every known key.
pub fn priority(key: &str) -> Option<usize> {
    PRIORITY_ORDER.iter().position(|k| *k == key)
}

/// Stable sort of `(key, value)` pairs by tag priority.
///
/// Unknown keys come first and keep their relative order.
pub fn sort_by_priority<K: AsRef<str>, V>(entries: &mut [(K, V)]) {
    entries.sort_by_key(|(key, _)| priority(key.as_ref()));
}
