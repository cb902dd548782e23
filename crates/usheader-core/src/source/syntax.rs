//! Syntax-tree access for bundled scripts.
//!
//! Parsing is delegated to tree-sitter's JavaScript grammar. This module
//! only exposes what the grant scanner needs: a single depth-first walk
//! that reports identifier-like nodes together with their property-access
//! context, followed by one completion callback.

use tree_sitter::{Node, Parser, Tree};

use crate::error::{HeaderError, Result};

/// Node kinds the grammar uses for names.
///
/// tree-sitter splits what is a single identifier node in ESTree into
/// several kinds depending on position (member, shorthand, label).
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "statement_identifier",
];

/// One identifier occurrence in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier<'src> {
    pub name: &'src str,

    /// Name of the object when this identifier is the member of a
    /// non-computed property access on a plain identifier (`object.name`).
    pub member_of: Option<&'src str>,

    /// 1-based source line.
    pub line: usize,
}

/// Callbacks for [`SyntaxTree::walk`].
pub trait Visitor {
    /// Called once per identifier node, in document order.
    fn identifier(&mut self, ident: Identifier<'_>);

    /// Called exactly once after the whole tree has been visited.
    fn exit(&mut self) {}
}

/// A successfully parsed script.
pub struct SyntaxTree<'src> {
    source: &'src str,
    tree: Tree,
}

impl<'src> SyntaxTree<'src> {
    /// Parse `source` as JavaScript.
    ///
    /// tree-sitter recovers from errors, so a tree with any error or
    /// missing node is rejected here to keep invalid input fatal.
    pub fn parse(source: &'src str) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| HeaderError::Parser(e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| HeaderError::Parser("parser returned no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let at = first_error(root).unwrap_or(root);
            let pos = at.start_position();
            return Err(HeaderError::Syntax {
                line: pos.row + 1,
                column: pos.column + 1,
            });
        }

        Ok(Self { source, tree })
    }

    /// Depth-first, pre-order traversal of the whole tree.
    ///
    /// Iterative on a tree cursor, so deeply nested bundles cannot
    /// overflow the stack.
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        let mut cursor = self.tree.walk();

        loop {
            let node = cursor.node();
            if IDENTIFIER_KINDS.contains(&node.kind()) {
                if let Some(ident) = self.identifier(node) {
                    visitor.identifier(ident);
                }
            }

            if cursor.goto_first_child() {
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    visitor.exit();
                    return;
                }
            }
        }
    }

    fn text(&self, node: Node<'_>) -> Option<&'src str> {
        self.source.get(node.byte_range())
    }

    fn identifier(&self, node: Node<'_>) -> Option<Identifier<'src>> {
        Some(Identifier {
            name: self.text(node)?,
            member_of: self.member_object(node),
            line: node.start_position().row + 1,
        })
    }

    /// Object name for `object.member` when `node` is the member.
    fn member_object(&self, node: Node<'_>) -> Option<&'src str> {
        let parent = node.parent()?;
        if parent.kind() != "member_expression" {
            return None;
        }
        if parent.child_by_field_name("property")? != node {
            return None;
        }

        let object = parent.child_by_field_name("object")?;
        if object.kind() != "identifier" {
            return None;
        }
        self.text(object)
    }
}

/// First error or missing node in document order.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }

        // Only descend into subtrees that contain the error.
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
