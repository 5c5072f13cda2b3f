//! Tree-sitter backed concrete nodes
//!
//! Leaves of the tree-sitter tree play the role of tokens: a node starts at
//! its first leaf and stops at its last one. Fields and accessors are looked
//! up in the grammar's [`FieldTable`].

use super::table::{FieldTable, Slot};
use crate::model::{TokenValue, Value};
use crate::node::{ConcreteNode, Interval, Raw, Token};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use tree_sitter::{Node, Tree};

/// A source file parsed by a tree-sitter grammar
pub struct ParsedSource {
    tree: Tree,
    source: String,
}

impl ParsedSource {
    pub(crate) fn new(tree: Tree, source: String) -> Self {
        Self { tree, source }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether tree-sitter had to recover from syntax errors
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn root<'t>(&'t self, table: &'t FieldTable) -> SitterNode<'t> {
        SitterNode::new(self.tree.root_node(), &self.source, table)
    }
}

impl fmt::Debug for ParsedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedSource")
            .field("root", &self.tree.root_node().kind())
            .field("len", &self.source.len())
            .finish()
    }
}

/// A tree-sitter node seen through its grammar's field table
#[derive(Clone, Copy)]
pub struct SitterNode<'t> {
    node: Node<'t>,
    source: &'t str,
    table: &'t FieldTable,
}

impl<'t> SitterNode<'t> {
    pub fn new(node: Node<'t>, source: &'t str, table: &'t FieldTable) -> Self {
        Self { node, source, table }
    }

    /// The underlying tree-sitter node
    pub fn inner(&self) -> Node<'t> {
        self.node
    }

    fn wrap(&self, node: Node<'t>) -> Self {
        Self { node, ..*self }
    }

    fn slice(&self, node: &Node<'t>) -> &'t str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Column in characters; tree-sitter reports bytes
    fn char_column(&self, node: &Node<'t>) -> usize {
        let start = node.start_byte();
        let byte_column = node.start_position().column;
        self.source
            .get(start.saturating_sub(byte_column)..start)
            .map_or(byte_column, |prefix| prefix.chars().count())
    }

    fn token(&self, leaf: Node<'t>) -> Token {
        let line = leaf.start_position().row + 1;
        let column = self.char_column(&leaf);
        if leaf.start_byte() == leaf.end_byte() && leaf.end_byte() >= self.source.len() {
            Token::end_of_input(line, column)
        } else {
            Token::new(line, column, self.slice(&leaf))
        }
    }

    fn value(&self, node: Node<'t>) -> Value {
        Value::Token(TokenValue {
            kind: node.kind().to_string(),
            text: self.slice(&node).to_string(),
            interval: interval(&node),
        })
    }

    fn field_children(&self, name: &str, tokens: bool) -> Vec<Node<'t>> {
        let mut cursor = self.node.walk();
        let children: Vec<_> = self
            .node
            .children_by_field_name(name, &mut cursor)
            .filter(|child| tokens || child.is_named())
            .collect();
        children
    }

    /// Named children not attached to any field, restricted to `kinds`
    fn unlabelled_children(&self, kinds: &BTreeSet<String>) -> Vec<Node<'t>> {
        let mut children = Vec::new();
        let mut cursor = self.node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if child.is_named() && cursor.field_name().is_none() && kinds.contains(child.kind()) {
                    children.push(child);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        children
    }

    fn shape(&self, nodes: Vec<Node<'t>>, multiple: bool, tokens: bool) -> Raw<Self> {
        match (multiple, tokens) {
            (true, true) => Raw::Values(nodes.into_iter().map(|n| self.value(n)).collect()),
            (false, true) => Raw::Value(nodes.into_iter().next().map(|n| self.value(n))),
            (true, false) => Raw::Nodes(nodes.into_iter().map(|n| self.wrap(n)).collect()),
            (false, false) => Raw::Node(nodes.into_iter().next().map(|n| self.wrap(n))),
        }
    }
}

fn interval(node: &Node<'_>) -> Interval {
    Interval::new(node.start_byte(), node.end_byte())
}

fn first_leaf(node: Node<'_>) -> Node<'_> {
    let mut leaf = node;
    while let Some(child) = leaf.child(0) {
        leaf = child;
    }
    leaf
}

fn last_leaf(node: Node<'_>) -> Node<'_> {
    let mut leaf = node;
    while let Some(child) = leaf.child_count().checked_sub(1).and_then(|i| leaf.child(i)) {
        leaf = child;
    }
    leaf
}

impl ConcreteNode for SitterNode<'_> {
    fn rule(&self) -> &str {
        self.node.kind()
    }

    fn start(&self) -> Option<Token> {
        Some(self.token(first_leaf(self.node)))
    }

    /// Nodes that matched nothing have no stop token
    fn stop(&self) -> Option<Token> {
        if self.node.start_byte() == self.node.end_byte() {
            return None;
        }
        Some(self.token(last_leaf(self.node)))
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.slice(&self.node))
    }

    fn source_interval(&self) -> Interval {
        interval(&self.node)
    }

    fn accessor(&self, name: &str) -> Option<Raw<Self>> {
        match self.table.accessor(self.node.kind(), name)? {
            Slot::Text => Some(Raw::Value(Some(self.value(self.node)))),
            Slot::Children { kinds, multiple } => {
                Some(self.shape(self.unlabelled_children(kinds), *multiple, false))
            }
            Slot::Field { .. } => None,
        }
    }

    fn field(&self, name: &str) -> Option<Raw<Self>> {
        match self.table.field(self.node.kind(), name)? {
            Slot::Field { multiple, tokens } => {
                Some(self.shape(self.field_children(name, *tokens), *multiple, *tokens))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for SitterNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.node.kind(), interval(&self.node))
    }
}
