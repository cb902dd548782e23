use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::source::syntax::{Identifier, SyntaxTree, Visitor};

/// `window` members that need an explicit grant.
static WINDOW_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(close|focus|onurlchange)$").expect("static regex"));

/// Legacy `GM_*` API globals.
static GM_GLOBAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^GM_.+$").expect("static regex"));

/// Collects grant tokens from identifier occurrences.
///
/// Recognition is purely syntactic:
///
/// - `GM.<member>`                      → `GM.<member>`
/// - `window.<close|focus|onurlchange>` → `window.<member>`
/// - `unsafeWindow` or `GM_<anything>`  → the name itself
///
/// The member rule and the bare-name rule are checked independently for
/// each identifier. Tokens are recorded in document order, duplicates
/// included.
#[derive(Debug, Default)]
pub struct GrantCollector {
    tokens: Vec<String>,
}

impl GrantCollector {
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    fn record(&mut self, token: String, line: usize) {
        tracing::trace!(%token, line, "grant detected");
        self.tokens.push(token);
    }
}

impl Visitor for GrantCollector {
    fn identifier(&mut self, ident: Identifier<'_>) {
        let name = ident.name;

        match ident.member_of {
            Some("GM") => self.record(format!("GM.{name}"), ident.line),
            Some("window") if WINDOW_MEMBER.is_match(name) => {
                self.record(format!("window.{name}"), ident.line)
            }
            _ => {}
        }

        if name == "unsafeWindow" || GM_GLOBAL.is_match(name) {
            self.record(name.to_string(), ident.line);
        }
    }

    fn exit(&mut self) {
        tracing::debug!(grants = self.tokens.len(), "source scan complete");
    }
}

/// Scan script text for grant-relevant API usage.
///
/// Returns tokens unordered and possibly duplicated; an empty vector
/// means nothing was recognized. Invalid source is an error.
pub fn scan(source: &str) -> Result<Vec<String>> {
    let tree = SyntaxTree::parse(source)?;

    let mut collector = GrantCollector::default();
    tree.walk(&mut collector);

    Ok(collector.into_tokens())
}
