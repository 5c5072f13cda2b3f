//! Concrete node capability
//!
//! The adapter never sees grammar-specific node types. Every concrete parse
//! tree implements [`ConcreteNode`], which exposes token metadata and a
//! name-keyed lookup of accessors and fields returning a [`Raw`] shape.

use crate::model::{TokenValue, Value};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A `[start, end)` offset span in the original source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// A lexical token bounding a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// 1-based line
    pub line: usize,
    /// 0-based character offset within the line
    pub column: usize,
    pub text: String,
    /// Set on the end-of-input marker
    pub eof: bool,
}

impl Token {
    pub fn new(line: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            column,
            text: text.into(),
            eof: false,
        }
    }

    /// The end-of-input marker at a position
    pub fn end_of_input(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            text: String::new(),
            eof: true,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.eof {
            write!(f, "[<EOF>,{}:{}]", self.line, self.column)
        } else {
            write!(f, "['{}',{}:{}]", self.text, self.line, self.column)
        }
    }
}

/// What a node holds under an accessor or field name
#[derive(Debug, Clone)]
pub enum Raw<N> {
    Value(Option<Value>),
    Values(Vec<Value>),
    Node(Option<N>),
    Nodes(Vec<N>),
}

impl<N> Raw<N> {
    /// Short shape name used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            Raw::Value(_) => "a value",
            Raw::Values(_) => "a list of values",
            Raw::Node(_) => "a node",
            Raw::Nodes(_) => "a list of nodes",
        }
    }
}

/// A concrete, grammar-specific parse-tree node
///
/// `accessor` and `field` return `None` when the node's rule has no slot of
/// that name. A slot that exists but holds nothing is `Some(Raw::Value(None))`
/// or `Some(Raw::Node(None))`.
pub trait ConcreteNode: Clone + fmt::Debug {
    /// Identifier of the grammar rule this node was built by
    fn rule(&self) -> &str;

    /// First token covered by the node
    fn start(&self) -> Option<Token>;

    /// Last token covered by the node; `None` for nodes that matched nothing
    fn stop(&self) -> Option<Token>;

    /// Source text covered by the node
    fn text(&self) -> Cow<'_, str>;

    fn source_interval(&self) -> Interval;

    /// Computed accessor lookup
    fn accessor(&self, name: &str) -> Option<Raw<Self>>;

    /// Stored field lookup
    fn field(&self, name: &str) -> Option<Raw<Self>>;

    /// The node seen as a property value
    fn to_value(&self) -> Value {
        Value::Token(TokenValue {
            kind: self.rule().to_string(),
            text: self.text().into_owned(),
            interval: self.source_interval(),
        })
    }
}
